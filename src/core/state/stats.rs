// src/core/state/stats.rs

//! Contains state definitions and logic for gateway statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Holds gateway-wide counters.
#[derive(Debug, Default)]
pub struct StatsState {
    /// The total number of connections accepted since startup.
    total_connections: AtomicU64,
    /// The total number of request lines processed since startup.
    total_commands: AtomicU64,
    /// The total number of attributes answered with the `N/A` sentinel.
    total_unavailable: AtomicU64,
}

impl StatsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_total_connections(&self) {
        self.total_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_total_connections(&self) -> u64 {
        self.total_connections.load(Ordering::Relaxed)
    }

    pub fn increment_total_commands(&self) {
        self.total_commands.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_total_commands(&self) -> u64 {
        self.total_commands.load(Ordering::Relaxed)
    }

    pub fn increment_total_unavailable(&self) {
        self.total_unavailable.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_total_unavailable(&self) -> u64 {
        self.total_unavailable.load(Ordering::Relaxed)
    }
}
