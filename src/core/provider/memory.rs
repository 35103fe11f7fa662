// src/core/provider/memory.rs

//! An in-process `RemoteProvider`.
//!
//! Endpoints, beans and attribute values are registered programmatically. Each endpoint
//! counts its connect attempts and open sessions and can be told to refuse connections
//! or to fail individual attribute reads, which makes the provider suitable for
//! embedding the gateway and for exercising its failure handling.

use super::{ProviderError, ProviderHandle, RemoteProvider};
use crate::core::value::Value;
use async_trait::async_trait;
use dashmap::DashMap;
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// A registry of in-process endpoints, keyed by URL.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    endpoints: DashMap<String, Arc<MemoryEndpoint>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the endpoint registered under `url`, creating an empty one if needed.
    pub fn register(&self, url: &str) -> Arc<MemoryEndpoint> {
        self.endpoints
            .entry(url.to_string())
            .or_insert_with(|| Arc::new(MemoryEndpoint::default()))
            .clone()
    }

    pub fn endpoint(&self, url: &str) -> Option<Arc<MemoryEndpoint>> {
        self.endpoints.get(url).map(|e| e.value().clone())
    }

    /// Removes an endpoint; later connects to its URL are refused.
    pub fn unregister(&self, url: &str) {
        self.endpoints.remove(url);
    }
}

#[async_trait]
impl RemoteProvider for MemoryProvider {
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn ProviderHandle>, ProviderError> {
        let Some(target) = self.endpoint(endpoint) else {
            return Err(ProviderError::Connect(format!(
                "Connection refused: no endpoint at '{endpoint}'"
            )));
        };
        target.connect_attempts.fetch_add(1, Ordering::SeqCst);

        let delay = *target.connect_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if target.refuse_connections.load(Ordering::SeqCst) {
            return Err(ProviderError::Connect(format!(
                "Connection refused by '{endpoint}'"
            )));
        }

        target.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MemorySession {
            endpoint: target,
            closed: AtomicBool::new(false),
        }))
    }
}

/// The beans of one in-process endpoint together with its fault switches.
#[derive(Debug, Default)]
pub struct MemoryEndpoint {
    beans: RwLock<HashMap<String, IndexMap<String, Value>>>,
    faults: Mutex<HashMap<(String, String), ProviderError>>,
    connect_delay: Mutex<Option<Duration>>,
    refuse_connections: AtomicBool,
    connect_attempts: AtomicUsize,
    open_sessions: AtomicUsize,
}

impl MemoryEndpoint {
    pub fn set_attribute(&self, bean: &str, attribute: &str, value: impl Into<Value>) {
        self.beans
            .write()
            .entry(bean.to_string())
            .or_default()
            .insert(attribute.to_string(), value.into());
    }

    /// Makes every read of `bean`/`attribute` fail with `error` until cleared.
    pub fn inject_fault(&self, bean: &str, attribute: &str, error: ProviderError) {
        self.faults
            .lock()
            .insert((bean.to_string(), attribute.to_string()), error);
    }

    pub fn clear_faults(&self) {
        self.faults.lock().clear();
    }

    pub fn refuse_connections(&self, refuse: bool) {
        self.refuse_connections.store(refuse, Ordering::SeqCst);
    }

    /// Delays every connect attempt, widening the window for concurrent first use.
    pub fn set_connect_delay(&self, delay: Option<Duration>) {
        *self.connect_delay.lock() = delay;
    }

    pub fn connect_attempts(&self) -> usize {
        self.connect_attempts.load(Ordering::SeqCst)
    }

    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }
}

struct MemorySession {
    endpoint: Arc<MemoryEndpoint>,
    closed: AtomicBool,
}

#[async_trait]
impl ProviderHandle for MemorySession {
    async fn get_attribute(&self, bean: &str, attribute: &str) -> Result<Value, ProviderError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ProviderError::Io("Session has been closed".to_string()));
        }
        if let Some(fault) = self
            .endpoint
            .faults
            .lock()
            .get(&(bean.to_string(), attribute.to_string()))
        {
            return Err(fault.clone());
        }

        let beans = self.endpoint.beans.read();
        let attributes = beans
            .get(bean)
            .ok_or_else(|| ProviderError::Attribute(format!("InstanceNotFoundException: {bean}")))?;
        attributes.get(attribute).cloned().ok_or_else(|| {
            ProviderError::Attribute(format!(
                "AttributeNotFoundException: No such attribute: {attribute}"
            ))
        })
    }

    async fn close(&self) -> Result<(), ProviderError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.endpoint.open_sessions.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
