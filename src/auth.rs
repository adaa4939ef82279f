//! Bearer-token check for the MCP endpoint.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Reject requests whose `Authorization: Bearer` token does not match
/// `BRIDGE_AUTH_KEY`. Without a configured key every request is refused.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let expected = state
        .config
        .auth_key
        .as_deref()
        .ok_or(AppError::AuthNotConfigured)?;

    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or(AppError::Unauthorized)?;

    if token != expected {
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}

/// Credentials from an `Authorization` value. The scheme is matched in any case.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
