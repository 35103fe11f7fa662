// tests/integration/test_helpers.rs

//! Test helpers and utilities for integration tests

use super::fixtures::{constants, populate_jvm};
use beangate::config::Config;
use beangate::core::handler::Router;
use beangate::core::protocol::Response;
use beangate::core::provider::{MemoryEndpoint, MemoryProvider};
use beangate::core::state::ServerState;
use beangate::server::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_test_writer()
        .try_init();
}

/// TestContext routes request lines against in-process endpoints without a socket.
pub struct TestContext {
    pub provider: Arc<MemoryProvider>,
    pub state: Arc<ServerState>,
    pub app: Arc<MemoryEndpoint>,
    router: Router,
}

impl TestContext {
    /// Creates a context with the JVM fixture registered under `APP_URL`.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        init_tracing();
        let provider = Arc::new(MemoryProvider::new());
        let app = provider.register(constants::APP_URL);
        populate_jvm(&app);

        let state = ServerState::new(config, provider.clone());
        let addr: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let router = Router::new(state.clone(), addr);
        Self {
            provider,
            state,
            app,
            router,
        }
    }

    /// Sends one request line and returns the response.
    pub async fn send(&self, line: &str) -> Response {
        self.router.handle_line(line).await
    }

    /// Sends one request line and returns the response as wire lines.
    pub async fn send_lines(&self, line: &str) -> Vec<String> {
        self.send(line).await.lines()
    }
}

/// A gateway served over TCP on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub provider: Arc<MemoryProvider>,
    pub state: Arc<ServerState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with_config(Config::default()).await
    }

    pub async fn start_with_config(mut config: Config) -> Self {
        init_tracing();
        config.host = "127.0.0.1".to_string();
        config.port = 0;

        let provider = Arc::new(MemoryProvider::new());
        populate_jvm(&provider.register(constants::APP_URL));
        populate_jvm(&provider.register(constants::OTHER_URL));

        let server = Server::bind(config, provider.clone()).await.unwrap();
        let addr = server.local_addr().unwrap();
        let state = server.state();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.run_until(async move {
            shutdown_rx.await.ok();
        }));

        Self {
            addr,
            provider,
            state,
            shutdown_tx: Some(shutdown_tx),
            handle,
        }
    }

    pub async fn client(&self) -> TestClient {
        TestClient::connect(self.addr).await
    }

    /// Stops the server and waits for its shutdown sequence to complete.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        (&mut self.handle).await.unwrap().unwrap();
    }
}

/// A line-oriented protocol client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        }
    }

    /// Writes raw bytes, allowing several requests in one write.
    pub async fn write_raw(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).await.unwrap();
        self.writer.flush().await.unwrap();
    }

    pub async fn send(&mut self, line: &str) {
        self.write_raw(format!("{line}\n").as_bytes()).await;
    }

    /// Half-closes the connection; the server still answers what it has read.
    pub async fn shutdown_write(&mut self) {
        self.writer.shutdown().await.unwrap();
    }

    /// Reads one line, or `None` once the server has closed the connection.
    pub async fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line).await {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches('\n').to_string()),
        }
    }

    /// Reads one complete response. `values` is the number of payload lines expected
    /// after `OK`; an `ERR` response always has exactly two more lines.
    pub async fn read_response(&mut self, values: usize) -> Vec<String> {
        let status = self.read_line().await.expect("connection closed");
        let extra = if status == "ERR" { 2 } else { values };
        let mut lines = vec![status];
        for _ in 0..extra {
            lines.push(self.read_line().await.expect("connection closed"));
        }
        lines
    }
}
