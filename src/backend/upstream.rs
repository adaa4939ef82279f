//! Adapter for an upstream MCP server reached over JSON-RPC.
//!
//! The upstream's search tool name is not known in advance; it is discovered
//! from `tools/list` on every search.

use crate::backend::normalize::{hit_from_item, unwrap_tool_result};
use crate::backend::transport::{HttpRequest, HttpTransport};
use crate::backend::types::CanonicalHit;
use crate::error::{AppError, Result};
use crate::search::NoteSearch;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

pub struct UpstreamMcp {
    endpoint_url: Option<String>,
    transport: Arc<dyn HttpTransport>,
}

impl UpstreamMcp {
    pub fn new(endpoint_url: Option<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            endpoint_url,
            transport,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint_url.is_some()
    }

    /// Issue one JSON-RPC call and return its `result` member.
    ///
    /// A missing `result` yields an empty object.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let endpoint = self
            .endpoint_url
            .as_deref()
            .ok_or_else(|| AppError::NotConfigured("MCP endpoint".to_string()))?;

        let id = Uuid::new_v4().to_string();
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!(%id, method, "Calling upstream MCP");
        metrics::counter!("mcp_requests_total", "method" => method.to_string()).increment(1);

        let response = self
            .transport
            .send(HttpRequest::post(endpoint).json(payload))
            .await?;
        if !response.is_success() {
            return Err(AppError::Upstream(format!(
                "MCP endpoint returned HTTP {}",
                response.status
            )));
        }

        let mut envelope = response.parse_json().ok_or_else(|| {
            AppError::Upstream("MCP endpoint returned a non-JSON body".to_string())
        })?;
        if let Some(error) = envelope.get("error") {
            tracing::error!(endpoint, %error, "Upstream MCP returned an error");
            return Err(AppError::Upstream(format!("MCP error: {}", error)));
        }

        Ok(envelope
            .get_mut("result")
            .map(Value::take)
            .unwrap_or_else(|| json!({})))
    }

    /// The upstream tool catalog; empty when the server lists none.
    pub async fn tool_list(&self) -> Result<Vec<Value>> {
        let result = self.call("tools/list", json!({})).await?;
        Ok(result
            .get("tools")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    /// Search through the first upstream tool whose name mentions "search".
    pub async fn search(&self, query: &str) -> Result<Vec<CanonicalHit>> {
        let tools = self.tool_list().await?;
        let tool_name = search_tool_name(&tools).ok_or(AppError::NoSearchTool)?;

        tracing::debug!(tool = %tool_name, query, "Invoking upstream search tool");
        let result = self
            .call(
                "tools/call",
                json!({ "name": tool_name, "arguments": { "query": query } }),
            )
            .await?;

        Ok(unwrap_tool_result(result).iter().map(hit_from_item).collect())
    }
}

#[async_trait]
impl NoteSearch for UpstreamMcp {
    fn backend_name(&self) -> &'static str {
        "mcp"
    }

    async fn search(&self, query: &str) -> Result<Vec<CanonicalHit>> {
        UpstreamMcp::search(self, query).await
    }
}

/// First tool, in catalog order, whose name contains "search" in any case.
fn search_tool_name(tools: &[Value]) -> Option<String> {
    tools.iter().find_map(|tool| {
        tool.get("name")
            .and_then(Value::as_str)
            .filter(|name| name.to_lowercase().contains("search"))
            .map(str::to_string)
    })
}
