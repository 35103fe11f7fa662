// src/core/provider/jolokia.rs

//! A `RemoteProvider` for Jolokia agents, which expose JMX beans over HTTP/JSON.
//!
//! Endpoint URLs are agent base URLs such as `http://app01:8778/jolokia`. The handshake
//! is a `GET <base>/version`; attribute reads are `read` requests posted to the base URL.

use super::{ProviderError, ProviderHandle, RemoteProvider};
use crate::config::ProviderConfig;
use crate::core::value::Value;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// The status Jolokia reports in the body of a successful request.
const JOLOKIA_OK: u16 = 200;

/// The envelope of every Jolokia reply.
#[derive(Deserialize, Debug)]
struct JolokiaReply {
    status: u16,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_type: Option<String>,
}

impl JolokiaReply {
    fn error_message(&self) -> String {
        match (&self.error_type, &self.error) {
            (Some(kind), Some(msg)) => format!("{}: {}", short_type_name(kind), msg),
            (None, Some(msg)) => msg.clone(),
            (Some(kind), None) => short_type_name(kind).to_string(),
            (None, None) => format!("Jolokia request failed with status {}", self.status),
        }
    }
}

#[derive(Serialize, Debug)]
struct ReadRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    mbean: &'a str,
    attribute: &'a str,
}

/// Connects to Jolokia agents with a shared HTTP client.
#[derive(Debug, Clone)]
pub struct JolokiaProvider {
    client: reqwest::Client,
}

impl JolokiaProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build the HTTP client for the Jolokia provider")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RemoteProvider for JolokiaProvider {
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn ProviderHandle>, ProviderError> {
        let base = Url::parse(endpoint).map_err(|e| {
            ProviderError::Connect(format!("Invalid endpoint URL '{endpoint}': {e}"))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ProviderError::Connect(format!(
                "Unsupported endpoint scheme '{}' in '{}'",
                base.scheme(),
                endpoint
            )));
        }

        let version_url = child_url(&base, "version").map_err(ProviderError::Connect)?;
        let response = self
            .client
            .get(version_url)
            .send()
            .await
            .map_err(|e| ProviderError::Connect(describe(&e)))?;
        if !response.status().is_success() {
            return Err(ProviderError::Connect(format!(
                "Handshake with '{}' failed with HTTP status {}",
                endpoint,
                response.status()
            )));
        }
        let reply: JolokiaReply = response
            .json()
            .await
            .map_err(|e| ProviderError::Connect(describe(&e)))?;
        if reply.status != JOLOKIA_OK {
            return Err(ProviderError::Connect(reply.error_message()));
        }
        debug!(
            "Connected to Jolokia agent {} at '{}'",
            reply.value.get("agent").unwrap_or(&serde_json::Value::Null),
            endpoint
        );

        Ok(Arc::new(JolokiaSession {
            client: self.client.clone(),
            base,
        }))
    }
}

/// A session with one Jolokia agent. HTTP is connectionless, so the session is just
/// the agent URL and the shared client.
struct JolokiaSession {
    client: reqwest::Client,
    base: Url,
}

#[async_trait]
impl ProviderHandle for JolokiaSession {
    async fn get_attribute(&self, bean: &str, attribute: &str) -> Result<Value, ProviderError> {
        let request = ReadRequest {
            kind: "read",
            mbean: bean,
            attribute,
        };
        let response = self
            .client
            .post(self.base.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Io(describe(&e)))?;
        if !response.status().is_success() {
            return Err(ProviderError::Io(format!(
                "Agent '{}' answered with HTTP status {}",
                self.base,
                response.status()
            )));
        }
        let reply: JolokiaReply = response
            .json()
            .await
            .map_err(|e| ProviderError::Io(describe(&e)))?;
        if reply.status != JOLOKIA_OK {
            return Err(ProviderError::Attribute(reply.error_message()));
        }
        Ok(Value::from(reply.value))
    }

    async fn close(&self) -> Result<(), ProviderError> {
        debug!("Released Jolokia session for '{}'", self.base);
        Ok(())
    }
}

/// Appends one path segment to the agent base URL.
fn child_url(base: &Url, segment: &str) -> Result<Url, String> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| format!("Endpoint URL '{base}' cannot be used as a base"))?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}

/// Flattens a `reqwest` error and its sources into one message.
fn describe(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    let mut source: Option<&(dyn StdError + 'static)> = e.source();
    while let Some(err) = source {
        msg.push_str(": ");
        msg.push_str(&err.to_string());
        source = err.source();
    }
    msg
}

/// `javax.management.InstanceNotFoundException` -> `InstanceNotFoundException`.
fn short_type_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
