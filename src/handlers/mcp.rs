use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

/// POST /mcp - JSON-RPC entry point for MCP clients.
///
/// The dispatcher decides the HTTP status: 200 on success, 400 for unknown
/// methods and tools, 500 when a backend fails.
pub async fn mcp_handler(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> Response {
    let start = std::time::Instant::now();
    let outcome = state.dispatcher.dispatch(body).await;

    tracing::debug!(
        status = outcome.status.as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "MCP request handled"
    );

    (outcome.status, Json(outcome.response)).into_response()
}
