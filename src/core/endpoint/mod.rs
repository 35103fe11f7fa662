// src/core/endpoint/mod.rs

//! Connection management for remote endpoints: one lazily connected holder per
//! endpoint URL, shared through a cache.

mod cache;
mod holder;

pub use cache::ConnectionCache;
pub use holder::ConnectionHolder;
