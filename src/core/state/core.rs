// src/core/state/core.rs

//! Defines the central `ServerState` struct, holding all shared gateway-wide state.

use super::client::ClientMap;
use super::stats::StatsState;
use crate::config::Config;
use crate::core::endpoint::ConnectionCache;
use crate::core::provider::RemoteProvider;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// The central struct holding all shared state.
///
/// Wrapped in an `Arc` and passed to every connection handler. The connection cache
/// starts empty and is drained when the server shuts down.
pub struct ServerState {
    /// The validated configuration the gateway was started with.
    pub config: Arc<Config>,
    /// One lazily connected holder per remote endpoint.
    pub cache: ConnectionCache,
    /// Bounds the number of requests executing at the same time.
    pub workers: Arc<Semaphore>,
    /// Currently connected clients, keyed by session id.
    pub clients: ClientMap,
    pub stats: StatsState,
}

impl ServerState {
    pub fn new(config: Config, provider: Arc<dyn RemoteProvider>) -> Arc<Self> {
        Arc::new(Self {
            workers: Arc::new(Semaphore::new(config.workers)),
            config: Arc::new(config),
            cache: ConnectionCache::new(provider),
            clients: ClientMap::default(),
            stats: StatsState::new(),
        })
    }
}
