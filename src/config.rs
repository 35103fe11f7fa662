// src/config.rs

//! Manages gateway configuration: loading from TOML, applying defaults, and validation.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Timeouts applied by the remote provider to every endpoint it talks to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Upper bound on the connect handshake, in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Upper bound on a single attribute read, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ProviderConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_connect_timeout_ms() -> u64 {
    5000
}
fn default_request_timeout_ms() -> u64 {
    10_000
}

/// Configuration for the Prometheus metrics exporter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// If true, an HTTP server will be started to expose Prometheus metrics.
    #[serde(default)]
    pub enabled: bool,
    /// The port for the Prometheus metrics server.
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

fn default_metrics_port() -> u16 {
    9713
}

/// The raw, deserialized form of the TOML file.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_workers")]
    workers: usize,
    #[serde(default = "default_max_clients")]
    max_clients: usize,
    #[serde(default = "default_max_line_length")]
    max_line_length: usize,
    #[serde(default = "default_max_pipelined_requests")]
    max_pipelined_requests: usize,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    provider: ProviderConfig,
    #[serde(default)]
    metrics: MetricsConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    2713
}
fn default_workers() -> usize {
    50
}
fn default_max_clients() -> usize {
    10_000
}
fn default_max_line_length() -> usize {
    1024 * 1024
}
fn default_max_pipelined_requests() -> usize {
    64
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Represents the final, validated gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Maximum number of requests executing at the same time across all clients.
    pub workers: usize,
    pub max_clients: usize,
    /// Longest accepted request line in bytes; longer lines close the client.
    pub max_line_length: usize,
    /// Maximum number of requests in flight on a single client connection.
    pub max_pipelined_requests: usize,
    pub log_level: String,
    pub provider: ProviderConfig,
    pub metrics: MetricsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
            max_clients: default_max_clients(),
            max_line_length: default_max_line_length(),
            max_pipelined_requests: default_max_pipelined_requests(),
            log_level: default_log_level(),
            provider: ProviderConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Config {
            host: raw.host,
            port: raw.port,
            workers: raw.workers,
            max_clients: raw.max_clients,
            max_line_length: raw.max_line_length,
            max_pipelined_requests: raw.max_pipelined_requests,
            log_level: raw.log_level,
            provider: raw.provider,
            metrics: raw.metrics,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file and validates it.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        Self::from_toml_str(&contents).with_context(|| format!("Invalid config file '{path}'"))
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let raw_config: RawConfig =
            toml::from_str(contents).context("Failed to parse TOML configuration")?;
        let config = Config::from(raw_config);
        config.validate()?;
        Ok(config)
    }

    /// The `host:port` address the listener binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates the configuration to ensure logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("port cannot be 0"));
        }
        if self.host.trim().is_empty() {
            return Err(anyhow!("host cannot be empty"));
        }
        if self.workers == 0 {
            return Err(anyhow!("workers cannot be 0"));
        }
        if self.max_clients == 0 {
            return Err(anyhow!("max_clients cannot be 0"));
        }
        if self.max_line_length == 0 {
            return Err(anyhow!("max_line_length cannot be 0"));
        }
        if self.max_pipelined_requests == 0 {
            return Err(anyhow!("max_pipelined_requests cannot be 0"));
        }
        if self.provider.connect_timeout_ms == 0 || self.provider.request_timeout_ms == 0 {
            return Err(anyhow!("provider timeouts must be greater than 0"));
        }

        if self.metrics.enabled {
            if self.metrics.port == 0 {
                return Err(anyhow!("metrics.port cannot be 0"));
            }
            if self.metrics.port == self.port {
                return Err(anyhow!(
                    "metrics.port cannot be the same as the main server port"
                ));
            }
        }
        Ok(())
    }
}
