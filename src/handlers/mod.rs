pub mod health;
pub mod mcp;
pub mod query;

pub use health::health_handler;
pub use mcp::mcp_handler;
pub use query::query_handler;

use crate::auth::require_bearer;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Build the HTTP router. `/mcp` sits behind bearer authentication.
pub fn router(state: Arc<AppState>) -> Router {
    let mcp: Router<Arc<AppState>> = Router::new()
        .route("/mcp", post(mcp_handler))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_bearer,
        ));

    Router::new()
        .merge(mcp)
        .route("/health", get(health_handler))
        .route("/query", get(query_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
