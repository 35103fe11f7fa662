// src/core/endpoint/holder.rs

//! Defines `ConnectionHolder`, which owns the lazily established session with one
//! remote endpoint.

use crate::core::GatewayError;
use crate::core::metrics;
use crate::core::provider::{ProviderHandle, RemoteProvider};
use crate::core::value::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

/// The connection state of a holder.
///
/// `Disconnected -> Connected` happens at most once. `Closed` is terminal: a closed
/// holder is discarded and a reconnect goes through a fresh holder.
enum HolderState {
    Disconnected,
    Connected(Arc<dyn ProviderHandle>),
    Closed,
}

/// The per-endpoint session owner.
///
/// Fetches share a read guard on the state, so reads on one endpoint run in parallel
/// while connect and close take the write guard. The first caller to find the holder
/// disconnected connects under the write guard; concurrent callers queue behind it and
/// find the state already `Connected` when they re-check.
pub struct ConnectionHolder {
    endpoint: String,
    provider: Arc<dyn RemoteProvider>,
    state: RwLock<HolderState>,
}

impl ConnectionHolder {
    pub fn new(endpoint: impl Into<String>, provider: Arc<dyn RemoteProvider>) -> Self {
        Self {
            endpoint: endpoint.into(),
            provider,
            state: RwLock::new(HolderState::Disconnected),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn is_connected(&self) -> bool {
        matches!(*self.state.read().await, HolderState::Connected(_))
    }

    pub async fn is_closed(&self) -> bool {
        matches!(*self.state.read().await, HolderState::Closed)
    }

    /// Ensures the holder is connected, establishing the session if needed.
    pub async fn connect(&self) -> Result<(), GatewayError> {
        self.connected().await.map(drop)
    }

    /// Reads `attribute` from `bean` through the endpoint session. The read guard is
    /// held for the whole remote call so that a concurrent close waits for it.
    pub async fn fetch_attribute(&self, bean: &str, attribute: &str) -> Result<Value, GatewayError> {
        let guard = self.connected().await?;
        let HolderState::Connected(handle) = &*guard else {
            return Err(GatewayError::Internal(format!(
                "Holder for '{}' lost its session while guarded",
                self.endpoint
            )));
        };
        Ok(handle.get_attribute(bean, attribute).await?)
    }

    /// Closes the session if one is open and marks the holder as closed. Closing an
    /// already closed or never connected holder does nothing.
    pub async fn close(&self) {
        let mut state = self.state.write().await;
        let previous = std::mem::replace(&mut *state, HolderState::Closed);
        if let HolderState::Connected(handle) = previous {
            if let Err(e) = handle.close().await {
                warn!("IO error while closing connection to {}: {}", self.endpoint, e);
            }
            info!("Closed connection to {}", self.endpoint);
        }
    }

    /// Returns a read guard over a `Connected` state.
    async fn connected(&self) -> Result<RwLockReadGuard<'_, HolderState>, GatewayError> {
        let state = self.state.read().await;
        if matches!(*state, HolderState::Connected(_)) {
            return Ok(state);
        }
        if matches!(*state, HolderState::Closed) {
            return Err(GatewayError::HolderClosed(self.endpoint.clone()));
        }
        drop(state);

        let mut state = self.state.write().await;
        if matches!(*state, HolderState::Closed) {
            return Err(GatewayError::HolderClosed(self.endpoint.clone()));
        }
        // Another caller may have connected while we waited for the write guard.
        if matches!(*state, HolderState::Disconnected) {
            debug!("Connecting to {}", self.endpoint);
            metrics::ENDPOINT_CONNECT_ATTEMPTS_TOTAL.inc();
            match self.provider.connect(&self.endpoint).await {
                Ok(handle) => {
                    info!("Connected to {}", self.endpoint);
                    *state = HolderState::Connected(handle);
                }
                Err(e) => {
                    metrics::ENDPOINT_CONNECT_FAILURES_TOTAL.inc();
                    warn!("Connection to {} failed: {}", self.endpoint, e);
                    return Err(GatewayError::ConnectionFailed(e.to_string()));
                }
            }
        }
        Ok(state.downgrade())
    }
}

impl fmt::Debug for ConnectionHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHolder")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
