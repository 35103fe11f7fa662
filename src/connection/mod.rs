// src/connection/mod.rs

//! Manages the lifecycle of a single client TCP connection: line framing, pipelined
//! request execution, and in-order response delivery.

mod guard;
mod handler;

pub use guard::ConnectionGuard;
pub use handler::ConnectionHandler;
