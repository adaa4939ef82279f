use crate::backend::types::truncate_chars;
use crate::error::Result;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Most hits returned by `/query`.
pub const MAX_QUERY_RESULTS: usize = 20;

/// Snippet budget for `/query` results, in characters.
pub const QUERY_SNIPPET_CHARS: usize = 240;

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub query: String,
    /// Total hits before truncation.
    pub count: usize,
    pub results: Vec<QueryHit>,
}

#[derive(Debug, Serialize)]
pub struct QueryHit {
    pub path: String,
    pub snippet: String,
    pub score: Option<f64>,
}

/// GET /query?q= - Unified search over plain HTTP.
///
/// Backend failures surface as 502.
pub async fn query_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<QueryResponse>> {
    let hits = state.search.search(&params.q).await?;
    let count = hits.len();

    let results = hits
        .into_iter()
        .take(MAX_QUERY_RESULTS)
        .map(|hit| QueryHit {
            path: hit.path,
            snippet: truncate_chars(&hit.snippet, QUERY_SNIPPET_CHARS),
            score: hit.score,
        })
        .collect();

    tracing::info!(query = %params.q, count, "Query completed");

    Ok(Json(QueryResponse {
        query: params.q,
        count,
        results,
    }))
}
