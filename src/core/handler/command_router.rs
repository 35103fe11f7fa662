// src/core/handler/command_router.rs

//! The central component for routing request lines to their handlers.
//!
//! The `Router` is stateless per request: it parses a line into a `Command`, runs the
//! matching action against the shared `ServerState`, and always produces a `Response`.
//! No failure path escapes as an error; protocol, connection and I/O failures all
//! become `ERR` responses.

use super::actions;
use crate::core::commands::Command;
use crate::core::metrics;
use crate::core::protocol::Response;
use crate::core::state::ServerState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, debug, info_span};

/// Routes request lines for one client connection.
#[derive(Clone)]
pub struct Router {
    state: Arc<ServerState>,
    addr: SocketAddr,
}

impl Router {
    pub fn new(state: Arc<ServerState>, addr: SocketAddr) -> Self {
        Self { state, addr }
    }

    /// Parses and executes one request line.
    pub async fn handle_line(&self, line: &str) -> Response {
        match Command::parse(line) {
            Ok(command) => self.route(command).await,
            Err(e) => {
                debug!("Rejected request from {}: {}", self.addr, e);
                self.state.stats.increment_total_commands();
                metrics::COMMANDS_PROCESSED_TOTAL
                    .with_label_values(&["invalid"])
                    .inc();
                Response::from(e)
            }
        }
    }

    /// Executes a parsed command and records its latency.
    pub async fn route(&self, command: Command) -> Response {
        let command_name = command.name();
        let span = info_span!(
            "command",
            name = %command_name,
            endpoint = %command.endpoint(),
            client.addr = %self.addr,
        );

        async move {
            let start_time = Instant::now();
            self.state.stats.increment_total_commands();
            metrics::COMMANDS_PROCESSED_TOTAL
                .with_label_values(&[command_name])
                .inc();

            let response = match command {
                Command::Get(cmd) => actions::get::handle_get(&self.state, cmd).await,
                Command::Close(cmd) => actions::close::handle_close(&self.state, cmd).await,
            };

            let latency = start_time.elapsed();
            metrics::COMMAND_LATENCY_SECONDS.observe(latency.as_secs_f64());
            debug!(
                "{} answered {} in {:?}",
                command_name,
                if response.is_ok() { "OK" } else { "ERR" },
                latency
            );
            response
        }
        .instrument(span)
        .await
    }
}
