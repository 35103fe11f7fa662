// src/core/metrics.rs

//! Defines and registers Prometheus metrics for gateway monitoring.
//!
//! This module uses `lazy_static` to ensure that metrics are registered only once
//! globally for the entire application lifecycle.

use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Gauge, Histogram, TextEncoder, register_counter, register_counter_vec,
    register_gauge, register_histogram,
};

lazy_static! {
    // --- Gauges ---
    /// The number of clients currently connected to the gateway.
    pub static ref CONNECTED_CLIENTS: Gauge =
        register_gauge!("beangate_connected_clients", "Number of currently connected clients.").unwrap();
    /// The number of endpoints with a cached connection holder.
    pub static ref CACHED_ENDPOINTS: Gauge =
        register_gauge!("beangate_cached_endpoints", "Number of endpoints held in the connection cache.").unwrap();

    // --- Counters ---
    /// The total number of request lines processed, labeled by command.
    pub static ref COMMANDS_PROCESSED_TOTAL: CounterVec =
        register_counter_vec!("beangate_commands_processed_total", "Total number of commands processed.", &["command"]).unwrap();
    /// The total number of client connections accepted since startup.
    pub static ref CONNECTIONS_RECEIVED_TOTAL: Counter =
        register_counter!("beangate_connections_received_total", "Total number of client connections received.").unwrap();
    /// The total number of connect calls issued to remote endpoints.
    pub static ref ENDPOINT_CONNECT_ATTEMPTS_TOTAL: Counter =
        register_counter!("beangate_endpoint_connect_attempts_total", "Total number of connection attempts to remote endpoints.").unwrap();
    /// The total number of failed connect calls.
    pub static ref ENDPOINT_CONNECT_FAILURES_TOTAL: Counter =
        register_counter!("beangate_endpoint_connect_failures_total", "Total number of failed connection attempts to remote endpoints.").unwrap();
    /// The total number of attributes answered with the N/A sentinel.
    pub static ref ATTRIBUTE_FAILURES_TOTAL: Counter =
        register_counter!("beangate_attribute_failures_total", "Total number of attributes that could not be resolved.").unwrap();
    /// The total number of GET requests aborted by a channel-level error.
    pub static ref REMOTE_IO_ERRORS_TOTAL: Counter =
        register_counter!("beangate_remote_io_errors_total", "Total number of I/O errors on endpoint connections.").unwrap();

    // --- Histograms ---
    /// A histogram of request processing latencies.
    pub static ref COMMAND_LATENCY_SECONDS: Histogram =
        register_histogram!("beangate_command_latency_seconds", "Latency of command processing in seconds.").unwrap();
}

/// Gathers all registered metrics and encodes them in the Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder.encode_to_string(&metric_families).unwrap_or_default()
}
