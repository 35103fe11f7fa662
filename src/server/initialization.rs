// src/server/initialization.rs

//! Handles server initialization: shared state setup and binding the listener.

use super::context::ServerContext;
use crate::config::Config;
use crate::core::provider::RemoteProvider;
use crate::core::state::ServerState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Initializes all server components before starting the main loop.
pub async fn setup(config: Config, provider: Arc<dyn RemoteProvider>) -> Result<ServerContext> {
    log_startup_info(&config);

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr()))?;
    info!("Gateway listening on {}", listener.local_addr()?);

    let state = ServerState::new(config, provider);
    info!("Server state initialized.");

    Ok(ServerContext::new(state, listener))
}

fn log_startup_info(config: &Config) {
    info!(
        "Serving requests with {} workers, at most {} clients and {} pipelined requests per client.",
        config.workers, config.max_clients, config.max_pipelined_requests
    );
    info!(
        "Provider timeouts: connect {} ms, request {} ms.",
        config.provider.connect_timeout_ms, config.provider.request_timeout_ms
    );
}
