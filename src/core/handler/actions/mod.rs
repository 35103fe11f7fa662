// src/core/handler/actions/mod.rs

// The router will access them via `actions::module::function`.
pub mod close;
pub mod get;
