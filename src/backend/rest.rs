//! Adapter for the note application's local REST plugin.
//!
//! Route names, verbs and field names differ between plugin versions, so
//! every operation walks a fixed, ordered list of candidate routes and stops
//! at the first one that answers in a recognized way. Misses are logged and
//! skipped while candidates remain. Exhausting them is an error for read and
//! write, and an empty result for list.

use crate::backend::normalize::{
    content_from_json, hit_from_item, paths_from_listing, search_items, write_result,
};
use crate::backend::transport::{HttpRequest, HttpTransport};
use crate::backend::types::{truncate_chars, CanonicalHit, CanonicalWriteResult};
use crate::error::{AppError, Result};
use crate::search::NoteSearch;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;

pub const DEFAULT_CONTEXT_LENGTH: usize = 120;

const SEARCH_ROUTE: &str = "/search/simple/";

const WRITE_ROUTES: [(WriteVerb, &str); 6] = [
    (WriteVerb::Post, "/file"),
    (WriteVerb::Put, "/file"),
    (WriteVerb::Post, "/vault/file"),
    (WriteVerb::Put, "/vault/file"),
    (WriteVerb::Post, "/write"),
    (WriteVerb::Put, "/write"),
];

const LIST_ROUTES: [&str; 4] = ["/list", "/files", "/vault/list", "/vault/files"];

/// Longest slice of an unexpected response body kept in logs.
const LOGGED_BODY_CHARS: usize = 200;

#[derive(Debug, Clone, Copy)]
enum WriteVerb {
    Post,
    Put,
}

impl WriteVerb {
    fn method(self) -> Method {
        match self {
            WriteVerb::Post => Method::POST,
            WriteVerb::Put => Method::PUT,
        }
    }
}

pub struct RestBackend {
    base_url: Option<String>,
    api_key: Option<String>,
    transport: Arc<dyn HttpTransport>,
}

impl RestBackend {
    pub fn new(
        base_url: Option<String>,
        api_key: Option<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            base_url,
            api_key,
            transport,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    fn base_url(&self) -> Result<&str> {
        self.base_url
            .as_deref()
            .ok_or_else(|| AppError::NotConfigured("Obsidian REST URL".to_string()))
    }

    fn request(&self, method: Method, url: String) -> HttpRequest {
        HttpRequest::new(method, url).bearer(self.api_key.as_deref())
    }

    /// Full-text search through the plugin's simple search route.
    pub async fn search(&self, query: &str, context_length: usize) -> Result<Vec<CanonicalHit>> {
        let url = format!("{}{}", self.base_url()?, SEARCH_ROUTE);
        let request = self
            .request(Method::POST, url)
            .query("query", query)
            .query("contextLength", context_length.to_string());

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(AppError::Upstream(format!(
                "REST search returned HTTP {}: {}",
                response.status,
                truncate_chars(&response.body, LOGGED_BODY_CHARS)
            )));
        }

        let payload = response.parse_json().ok_or_else(|| {
            AppError::Upstream("REST search returned a non-JSON body".to_string())
        })?;
        let hits: Vec<CanonicalHit> = search_items(&payload).iter().map(hit_from_item).collect();

        tracing::debug!(query, hits = hits.len(), "REST search completed");
        Ok(hits)
    }

    /// Read a note by vault-relative path.
    pub async fn read(&self, path: &str) -> Result<String> {
        let base = self.base_url()?;
        let encoded = encode_path(path);
        let candidates = [
            format!("{base}/vault/{encoded}"),
            format!("{base}/vault/{path}"),
            format!("{base}/file/{encoded}"),
            format!("{base}/file/{path}"),
        ];

        for url in &candidates {
            let response = match self.transport.send(self.request(Method::GET, url.clone())).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::debug!(route = %url, error = %e, "REST read candidate failed");
                    record_miss("read");
                    continue;
                }
            };

            match response.status {
                200 if response.is_json() => match response.parse_json() {
                    Some(payload) => return Ok(content_from_json(&payload)),
                    None => {
                        tracing::warn!(route = %url, "REST read returned malformed JSON");
                        record_miss("read");
                    }
                },
                200 => return Ok(response.body),
                404 => {
                    tracing::debug!(route = %url, "REST read candidate not found");
                    record_miss("read");
                }
                status => {
                    tracing::warn!(
                        route = %url,
                        status,
                        body = %truncate_chars(&response.body, LOGGED_BODY_CHARS),
                        "Unexpected status from REST read candidate"
                    );
                    record_miss("read");
                }
            }
        }

        Err(AppError::NotFound(format!(
            "REST read not found for path '{}' - tried all endpoints",
            path
        )))
    }

    /// Create or overwrite a note.
    pub async fn write(&self, path: &str, content: &str) -> Result<CanonicalWriteResult> {
        let base = self.base_url()?;
        let body = json!({ "path": path, "content": content });

        for (verb, route) in WRITE_ROUTES {
            let url = format!("{base}{route}");
            let request = self.request(verb.method(), url).json(body.clone());

            match self.transport.send(request).await {
                Ok(response) if matches!(response.status, 200 | 201 | 204) => {
                    tracing::info!(path, route, method = %verb.method(), "REST write accepted");
                    return Ok(write_result(response.parse_json(), path));
                }
                Ok(response) => {
                    tracing::debug!(route, status = response.status, "REST write candidate rejected");
                    record_miss("write");
                }
                Err(e) => {
                    tracing::debug!(route, error = %e, "REST write candidate failed");
                    record_miss("write");
                }
            }
        }

        Err(AppError::NotFound(format!(
            "REST write not found for path '{}' - tried all endpoints",
            path
        )))
    }

    /// List note paths, optionally under `dir`. Best effort: never fails.
    pub async fn list_files(&self, dir: Option<&str>) -> Vec<String> {
        let Some(base) = self.base_url.as_deref() else {
            tracing::warn!("REST listing skipped: Obsidian REST URL not configured");
            return Vec::new();
        };
        let dir = dir.filter(|d| !d.is_empty());

        for route in LIST_ROUTES {
            let mut request = self.request(Method::GET, format!("{base}{route}"));
            if let Some(dir) = dir {
                request = request.query("dir", dir);
            }

            match self.transport.send(request).await {
                Ok(response) if response.status == 200 => {
                    if let Some(paths) = response.parse_json().as_ref().and_then(paths_from_listing) {
                        tracing::debug!(route, count = paths.len(), "REST listing resolved");
                        return paths;
                    }
                    record_miss("list");
                }
                Ok(response) => {
                    tracing::debug!(route, status = response.status, "REST listing candidate rejected");
                    record_miss("list");
                }
                Err(e) => {
                    tracing::debug!(route, error = %e, "REST listing candidate failed");
                    record_miss("list");
                }
            }
        }

        Vec::new()
    }
}

#[async_trait]
impl NoteSearch for RestBackend {
    fn backend_name(&self) -> &'static str {
        "rest"
    }

    async fn search(&self, query: &str) -> Result<Vec<CanonicalHit>> {
        RestBackend::search(self, query, DEFAULT_CONTEXT_LENGTH).await
    }
}

/// Percent-encode each path segment, keeping the `/` separators.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn record_miss(operation: &'static str) {
    metrics::counter!("rest_candidate_misses_total", "operation" => operation).increment(1);
}
