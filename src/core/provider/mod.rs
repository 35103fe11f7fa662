// src/core/provider/mod.rs

//! The remote-management capability the gateway proxies to.
//!
//! A `RemoteProvider` opens sessions to endpoints identified by URL; a session
//! (`ProviderHandle`) reads named attributes from named beans. The gateway never
//! depends on a particular wire protocol: the shipped implementation speaks Jolokia
//! (JMX over HTTP), and `MemoryProvider` serves in-process endpoints.

use crate::core::value::Value;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub mod jolokia;
pub mod memory;

pub use jolokia::JolokiaProvider;
pub use memory::{MemoryEndpoint, MemoryProvider};

/// Failures reported by providers, classified by what they imply for the connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The endpoint could not be reached or refused the handshake.
    #[error("{0}")]
    Connect(String),
    /// The bean or attribute is unknown or unreadable. The connection stays usable.
    #[error("{0}")]
    Attribute(String),
    /// The channel to the endpoint failed. The connection must be discarded.
    #[error("{0}")]
    Io(String),
}

/// An established session with one endpoint.
#[async_trait]
pub trait ProviderHandle: Send + Sync {
    /// Reads `attribute` from the bean named `bean`.
    async fn get_attribute(&self, bean: &str, attribute: &str) -> Result<Value, ProviderError>;

    /// Releases the session.
    async fn close(&self) -> Result<(), ProviderError>;
}

/// Opens sessions with remote management endpoints.
#[async_trait]
pub trait RemoteProvider: Send + Sync {
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn ProviderHandle>, ProviderError>;
}
