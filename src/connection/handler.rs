// src/connection/handler.rs

//! Defines the `ConnectionHandler` which manages the full lifecycle of a client connection.
//!
//! Requests on one connection are pipelined: each line is dispatched as soon as it is
//! read, up to `max_pipelined_requests` at a time, while responses are written strictly
//! in the order the requests arrived.

use super::guard::ConnectionGuard;
use crate::core::GatewayError;
use crate::core::handler::Router;
use crate::core::protocol::{LineCodec, Response};
use crate::core::state::ServerState;
use futures::stream::FuturesOrdered;
use futures::{SinkExt, StreamExt};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpStream;
use tokio::sync::{Semaphore, broadcast};
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

/// Manages the full lifecycle of a client connection.
pub struct ConnectionHandler {
    framed: Framed<TcpStream, LineCodec>,
    addr: SocketAddr,
    state: Arc<ServerState>,
    session_id: u64,
    router: Router,
    shutdown_rx: broadcast::Receiver<()>,
    global_shutdown_rx: broadcast::Receiver<()>,
}

impl ConnectionHandler {
    pub fn new(
        socket: TcpStream,
        addr: SocketAddr,
        state: Arc<ServerState>,
        session_id: u64,
        shutdown_rx: broadcast::Receiver<()>,
        global_shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        let codec = LineCodec::new(state.config.max_line_length);
        Self {
            framed: Framed::new(socket, codec),
            router: Router::new(state.clone(), addr),
            addr,
            state,
            session_id,
            shutdown_rx,
            global_shutdown_rx,
        }
    }

    /// The main event loop for the connection.
    ///
    /// Reading stops at end of input or on a framing error; responses still owed to the
    /// client are written before the connection closes.
    pub async fn run(&mut self) -> Result<(), GatewayError> {
        let _guard = ConnectionGuard::new(self.state.clone(), self.session_id, self.addr);
        let max_in_flight = self.state.config.max_pipelined_requests;
        let mut in_flight = FuturesOrdered::new();
        let mut reading = true;

        loop {
            if !reading && in_flight.is_empty() {
                break;
            }
            tokio::select! {
                biased;
                _ = self.global_shutdown_rx.recv() => {
                    info!("Connection handler for {} received global shutdown signal.", self.addr);
                    break;
                }
                _ = self.shutdown_rx.recv() => {
                    info!("Connection handler for {} received kill signal.", self.addr);
                    break;
                }
                Some(response) = in_flight.next(), if !in_flight.is_empty() => {
                    debug!("Session {}: Sending response: {:?}", self.session_id, response);
                    self.framed.send(response).await?;
                }
                result = self.framed.next(), if reading && in_flight.len() < max_in_flight => {
                    match result {
                        Some(Ok(line)) => {
                            debug!("Session {}: Received line: {}", self.session_id, line);
                            self.touch_client();
                            in_flight.push_back(dispatch(
                                self.router.clone(),
                                self.state.workers.clone(),
                                line,
                            ));
                        }
                        Some(Err(GatewayError::LineTooLong(limit))) => {
                            warn!(
                                "Closing connection from {}: request line exceeds {} bytes",
                                self.addr, limit
                            );
                            reading = false;
                        }
                        Some(Err(e)) => {
                            if is_normal_disconnect(&e) {
                                debug!("Connection from {} closed by peer: {}", self.addr, e);
                            } else {
                                warn!("Connection error for {}: {}", self.addr, e);
                            }
                            reading = false;
                        }
                        None => {
                            debug!("Connection from {} closed by peer.", self.addr);
                            reading = false;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Updates the client's last activity time.
    fn touch_client(&self) {
        if let Some(mut entry) = self.state.clients.get_mut(&self.session_id) {
            entry.0.last_command_time = Instant::now();
        }
    }
}

/// Executes one request line once a worker permit is available.
fn dispatch(
    router: Router,
    workers: Arc<Semaphore>,
    line: String,
) -> impl Future<Output = Response> + Send {
    async move {
        let _permit = match workers.acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                return Response::from(GatewayError::Internal(
                    "worker pool has been shut down".into(),
                ));
            }
        };
        router.handle_line(&line).await
    }
}

/// Helper function to check for non-critical disconnection errors.
fn is_normal_disconnect(e: &GatewayError) -> bool {
    matches!(e, GatewayError::Io(arc_err) if matches!(
        arc_err.kind(),
        std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionAborted
    ))
}
