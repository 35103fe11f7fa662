// src/core/handler/actions/get.rs

//! Handles `GET`: reads each requested attribute through the endpoint's holder and
//! resolves the rest of its path.

use crate::core::GatewayError;
use crate::core::commands::{AttributeQuery, Get, ValueFormat};
use crate::core::endpoint::ConnectionHolder;
use crate::core::metrics;
use crate::core::path::resolve;
use crate::core::protocol::{ErrorCode, NOT_AVAILABLE, Response};
use crate::core::state::ServerState;
use crate::core::value::Value;
use std::sync::Arc;
use tracing::warn;

pub async fn handle_get(state: &ServerState, cmd: Get) -> Response {
    let mut holder = match connected_holder(state, &cmd.endpoint).await {
        Ok(holder) => holder,
        Err(e) => return Response::from(e),
    };

    let mut values = Vec::with_capacity(cmd.queries.len());
    for query in &cmd.queries {
        let mut result = fetch_one(&holder, query).await;
        if let Err(GatewayError::HolderClosed(_)) = result {
            // Closed by a concurrent CLOSE or by another request's I/O failure.
            holder = match connected_holder(state, &cmd.endpoint).await {
                Ok(fresh) => fresh,
                Err(e) => return Response::from(e),
            };
            result = fetch_one(&holder, query).await;
        }
        match result {
            Ok(value) => match render(&value, &cmd.format) {
                Some(line) => values.push(line),
                None => {
                    warn!(
                        "Value of '{}' on bean '{}' does not fit format '{}'",
                        query.raw_path,
                        query.bean,
                        cmd.format.as_str()
                    );
                    metrics::ATTRIBUTE_FAILURES_TOTAL.inc();
                    state.stats.increment_total_unavailable();
                    values.push(NOT_AVAILABLE.to_string());
                }
            },
            Err(e) if e.is_item_level() => {
                warn!(
                    "Error on {} for bean '{}' getting attribute '{}': {}",
                    cmd.endpoint, query.bean, query.raw_path, e
                );
                metrics::ATTRIBUTE_FAILURES_TOTAL.inc();
                state.stats.increment_total_unavailable();
                values.push(NOT_AVAILABLE.to_string());
            }
            Err(e) => {
                // Partial results are discarded along with the connection.
                warn!("IO error on connection {}: {}", cmd.endpoint, e);
                metrics::REMOTE_IO_ERRORS_TOTAL.inc();
                state.cache.invalidate(&holder).await;
                return Response::error(ErrorCode::IoError, e.detail());
            }
        }
    }
    Response::Ok(values)
}

/// Returns a connected holder for `endpoint`. A holder closed between lookup and use
/// has already left the cache, so a single retry obtains a fresh one.
async fn connected_holder(
    state: &ServerState,
    endpoint: &str,
) -> Result<Arc<ConnectionHolder>, GatewayError> {
    let holder = state.cache.get_or_create(endpoint);
    match holder.connect().await {
        Ok(()) => Ok(holder),
        Err(GatewayError::HolderClosed(_)) => {
            let fresh = state.cache.get_or_create(endpoint);
            fresh.connect().await?;
            Ok(fresh)
        }
        Err(e) => Err(e),
    }
}

async fn fetch_one(holder: &ConnectionHolder, query: &AttributeQuery) -> Result<Value, GatewayError> {
    let path = query.path.as_ref().map_err(Clone::clone)?;
    let root = holder.fetch_attribute(&query.bean, path.attribute()).await?;
    resolve(&root, path.rest())
}

/// Renders one value through the request's format. `None` if the format rejects it.
fn render(value: &Value, format: &ValueFormat) -> Option<String> {
    if value.is_null() {
        return Some(NOT_AVAILABLE.to_string());
    }
    format.apply(&value.render())
}
