// src/server/mod.rs

use crate::config::Config;
use crate::core::provider::{JolokiaProvider, RemoteProvider};
use crate::core::state::ServerState;
use anyhow::Result;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

mod connection_loop;
mod context;
mod initialization;
mod metrics_server;
mod spawner;

use context::ServerContext;

/// A bound gateway that has not started accepting connections yet.
pub struct Server {
    ctx: ServerContext,
}

impl Server {
    /// Binds the listener and builds the shared state around `provider`.
    pub async fn bind(config: Config, provider: Arc<dyn RemoteProvider>) -> Result<Self> {
        let ctx = initialization::setup(config, provider).await?;
        Ok(Self { ctx })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.ctx.listener.local_addr()?)
    }

    pub fn state(&self) -> Arc<ServerState> {
        self.ctx.state.clone()
    }

    /// Serves clients until SIGINT, SIGTERM, or `shutdown` completes.
    pub async fn run_until(mut self, shutdown: impl Future<Output = ()>) -> Result<()> {
        spawner::spawn_all(&mut self.ctx);
        connection_loop::run(self.ctx, shutdown).await
    }
}

/// The main server startup function, serving Jolokia endpoints until a signal arrives.
pub async fn run(config: Config) -> Result<()> {
    let provider = Arc::new(JolokiaProvider::new(&config.provider)?);
    let server = Server::bind(config, provider).await?;
    server.run_until(std::future::pending()).await
}
