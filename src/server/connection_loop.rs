// src/server/connection_loop.rs

//! Contains the main server loop for accepting connections and handling graceful shutdown.

use super::context::ServerContext;
use crate::connection::ConnectionHandler;
use crate::core::metrics;
use crate::core::state::ClientInfo;
use anyhow::{Context, Result};
use std::future::Future;
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Accepts connections until a signal, the `shutdown` future, or a failed background
/// task ends the loop, then shuts everything down in order.
pub async fn run(mut ctx: ServerContext, shutdown: impl Future<Output = ()>) -> Result<()> {
    let mut session_id_counter: u64 = 0;
    let mut client_tasks = JoinSet::new();

    let mut sigint =
        signal(SignalKind::interrupt()).context("Failed to register SIGINT handler")?;
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to register SIGTERM handler")?;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            _ = sigint.recv() => {
                info!("SIGINT received, initiating graceful shutdown.");
                break;
            }
            _ = sigterm.recv() => {
                info!("SIGTERM received, initiating graceful shutdown.");
                break;
            }
            _ = &mut shutdown => {
                info!("Shutdown requested, initiating graceful shutdown.");
                break;
            }

            Some(res) = ctx.background_tasks.join_next() => {
                match res {
                    Ok(Ok(())) => warn!("A background task finished unexpectedly without an error."),
                    Ok(Err(e)) => { error!("CRITICAL: Background task failed: {:#}. Shutting down.", e); break; }
                    Err(e) => { error!("CRITICAL: Background task panicked: {:?}. Shutting down.", e); break; }
                }
            },

            res = ctx.listener.accept() => {
                let (socket, addr) = match res {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                        continue;
                    }
                };
                let Ok(permit) = ctx.connection_permits.clone().try_acquire_owned() else {
                    warn!("Rejecting connection from {}: max_clients reached.", addr);
                    continue;
                };
                info!("Accepted new connection from: {}", addr);
                ctx.state.stats.increment_total_connections();
                metrics::CONNECTIONS_RECEIVED_TOTAL.inc();
                metrics::CONNECTED_CLIENTS.inc();

                session_id_counter = session_id_counter.wrapping_add(1);
                let session_id = session_id_counter;
                let state_clone = ctx.state.clone();

                let (conn_shutdown_tx, conn_shutdown_rx) = broadcast::channel(1);
                let global_shutdown_rx = ctx.shutdown_tx.subscribe();
                state_clone
                    .clients
                    .insert(session_id, (ClientInfo::new(addr, session_id), conn_shutdown_tx));

                client_tasks.spawn(async move {
                    let _permit = permit;
                    let mut handler = ConnectionHandler::new(
                        socket,
                        addr,
                        state_clone,
                        session_id,
                        conn_shutdown_rx,
                        global_shutdown_rx,
                    );
                    if let Err(e) = handler.run().await {
                        warn!("Connection from {} terminated unexpectedly: {}", addr, e);
                    }
                });
            },

            Some(res) = client_tasks.join_next() => {
                if let Err(e) = res
                    && e.is_panic()
                {
                    error!("A client handler panicked: {e:?}");
                }
            },
        }
    }

    info!("Shutting down. Sending signal to all tasks.");
    if ctx.shutdown_tx.send(()).is_err() {
        info!("No tasks were listening for the shutdown signal.");
    }

    if tokio::time::timeout(Duration::from_secs(5), async {
        while client_tasks.join_next().await.is_some() {}
    })
    .await
    .is_err()
    {
        warn!("Timed out waiting for client connections to close; aborting them.");
        client_tasks.shutdown().await;
    }
    info!("All client connections closed.");

    info!("Closing {} cached endpoint connection(s)...", ctx.state.cache.len());
    ctx.state.cache.drain_all().await;

    info!("Waiting for background tasks to finish...");
    if tokio::time::timeout(Duration::from_secs(10), async {
        while ctx.background_tasks.join_next().await.is_some() {}
    })
    .await
    .is_err()
    {
        warn!("Timed out waiting for background tasks to finish cleanly.");
    };
    info!("Server shutdown complete.");
    Ok(())
}
