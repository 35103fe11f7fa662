// src/core/endpoint/cache.rs

//! Defines `ConnectionCache`, the process-wide map from endpoint URL to
//! `ConnectionHolder`.

use super::holder::ConnectionHolder;
use crate::core::metrics;
use crate::core::provider::RemoteProvider;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Maps endpoint URLs to their holders.
///
/// Only insertion and removal touch the map; connecting happens inside the holder, so
/// a slow endpoint never blocks lookups for the others.
pub struct ConnectionCache {
    holders: DashMap<String, Arc<ConnectionHolder>>,
    provider: Arc<dyn RemoteProvider>,
}

impl ConnectionCache {
    pub fn new(provider: Arc<dyn RemoteProvider>) -> Self {
        Self {
            holders: DashMap::new(),
            provider,
        }
    }

    /// Returns the holder for `endpoint`, creating it on first use. Concurrent callers
    /// for the same endpoint always receive the same holder.
    pub fn get_or_create(&self, endpoint: &str) -> Arc<ConnectionHolder> {
        if let Some(holder) = self.holders.get(endpoint) {
            return holder.value().clone();
        }
        let holder = self
            .holders
            .entry(endpoint.to_string())
            .or_insert_with(|| {
                debug!("Creating connection holder for {}", endpoint);
                Arc::new(ConnectionHolder::new(endpoint, self.provider.clone()))
            })
            .value()
            .clone();
        metrics::CACHED_ENDPOINTS.set(self.holders.len() as f64);
        holder
    }

    pub fn get(&self, endpoint: &str) -> Option<Arc<ConnectionHolder>> {
        self.holders.get(endpoint).map(|h| h.value().clone())
    }

    /// Removes and closes the holder for `endpoint`. Does nothing if there is none.
    pub async fn evict(&self, endpoint: &str) {
        let removed = self.holders.remove(endpoint);
        metrics::CACHED_ENDPOINTS.set(self.holders.len() as f64);
        if let Some((_, holder)) = removed {
            holder.close().await;
        }
    }

    /// Removes `holder` if it is still the cached holder for its endpoint, then closes
    /// it. A newer holder created in the meantime is left in place.
    pub async fn invalidate(&self, holder: &Arc<ConnectionHolder>) {
        self.holders
            .remove_if(holder.endpoint(), |_, cached| Arc::ptr_eq(cached, holder));
        metrics::CACHED_ENDPOINTS.set(self.holders.len() as f64);
        holder.close().await;
    }

    /// Closes and removes every holder. Used at shutdown.
    pub async fn drain_all(&self) {
        let endpoints: Vec<String> = self.holders.iter().map(|e| e.key().clone()).collect();
        if endpoints.is_empty() {
            return;
        }
        info!("Closing {} cached endpoint connection(s).", endpoints.len());
        for endpoint in endpoints {
            self.evict(&endpoint).await;
        }
    }

    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }
}
