use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub backends: BackendStatus,
}

#[derive(Serialize)]
pub struct BackendStatus {
    pub mcp: bool,
    pub rest: bool,
    pub prefer_mcp_first: bool,
}

/// GET /health - Liveness probe, plus which backends are configured.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        backends: BackendStatus {
            mcp: state.mcp.is_configured(),
            rest: state.rest.is_configured(),
            prefer_mcp_first: state.config.prefer_mcp_first,
        },
    })
}
