// src/core/mod.rs

//! The central module containing the core logic and data structures of the gateway.

pub mod commands;
pub mod endpoint;
pub mod errors;
pub mod handler;
pub mod metrics;
pub mod path;
pub mod protocol;
pub mod provider;
pub mod state;
pub mod value;

pub use commands::Command;
pub use errors::GatewayError;
pub use protocol::Response;
pub use value::Value;
