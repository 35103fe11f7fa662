// src/core/handler/actions/close.rs

use crate::core::commands::Close;
use crate::core::protocol::Response;
use crate::core::state::ServerState;
use tracing::debug;

/// Handles `CLOSE`: evicts and closes the cached holder. Closing an endpoint that was
/// never used is not an error.
pub async fn handle_close(state: &ServerState, cmd: Close) -> Response {
    if state.cache.get(&cmd.endpoint).is_none() {
        debug!("CLOSE for {} which has no cached connection.", cmd.endpoint);
    }
    state.cache.evict(&cmd.endpoint).await;
    Response::ok()
}
