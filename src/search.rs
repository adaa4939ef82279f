//! Unified search over the two backends.
//!
//! With `prefer_mcp_first` set, the upstream MCP server is tried first and
//! the REST plugin is the fallback. Without it only REST is consulted; there
//! is no MCP fallback in that direction.

use crate::backend::types::CanonicalHit;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// A backend able to answer a free-text note search.
#[async_trait]
pub trait NoteSearch: Send + Sync {
    /// Short label used in logs and metrics.
    fn backend_name(&self) -> &'static str;

    async fn search(&self, query: &str) -> Result<Vec<CanonicalHit>>;
}

pub struct SearchFacade {
    mcp: Arc<dyn NoteSearch>,
    rest: Arc<dyn NoteSearch>,
    prefer_mcp_first: bool,
}

impl SearchFacade {
    pub fn new(mcp: Arc<dyn NoteSearch>, rest: Arc<dyn NoteSearch>, prefer_mcp_first: bool) -> Self {
        Self {
            mcp,
            rest,
            prefer_mcp_first,
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<CanonicalHit>> {
        let mut mcp_error = None;

        if self.prefer_mcp_first {
            match self.mcp.search(query).await {
                Ok(hits) => return Ok(hits),
                Err(e) => {
                    tracing::warn!(
                        backend = self.mcp.backend_name(),
                        error = %e,
                        "Primary search backend failed, falling back"
                    );
                    metrics::counter!("search_fallbacks_total").increment(1);
                    mcp_error = Some(e);
                }
            }
        }

        match self.rest.search(query).await {
            Ok(hits) => Ok(hits),
            Err(rest_error) => match mcp_error {
                Some(mcp_error) => Err(AppError::CombinedFailure {
                    mcp: mcp_error.to_string(),
                    rest: rest_error.to_string(),
                }),
                None => Err(rest_error),
            },
        }
    }
}
