// src/core/state/mod.rs

//! Defines the central `ServerState` struct and its components.

mod client;
mod core;
mod stats;

pub use client::*;
pub use core::ServerState;
pub use stats::StatsState;
