//! Routes inbound JSON-RPC calls to the note operations.
//!
//! Search goes through the [`SearchFacade`]; read, write and list always go
//! to the REST backend. Every failure is turned into a JSON-RPC error
//! envelope here, paired with the HTTP status the endpoint should answer with.

use crate::backend::rest::RestBackend;
use crate::backend::types::CanonicalFileRecord;
use crate::error::{AppError, Result};
use crate::protocol::envelope::{JsonRpcRequest, JsonRpcResponse};
use crate::protocol::tools::{ToolCatalog, ToolKind};
use crate::search::SearchFacade;
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

/// A JSON-RPC response plus the HTTP status it travels with.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub status: StatusCode,
    pub response: JsonRpcResponse,
}

impl DispatchOutcome {
    fn success(id: Value, result: Value) -> Self {
        Self {
            status: StatusCode::OK,
            response: JsonRpcResponse::success(id, result),
        }
    }

    fn failure(id: Value, err: &AppError) -> Self {
        Self {
            status: err.rpc_status(),
            response: JsonRpcResponse::from_app_error(id, err),
        }
    }
}

pub struct Dispatcher {
    catalog: ToolCatalog,
    rest: Arc<RestBackend>,
    search: Arc<SearchFacade>,
}

impl Dispatcher {
    pub fn new(catalog: ToolCatalog, rest: Arc<RestBackend>, search: Arc<SearchFacade>) -> Self {
        Self {
            catalog,
            rest,
            search,
        }
    }

    /// Handle one raw JSON-RPC body. Never fails.
    pub async fn dispatch(&self, body: Value) -> DispatchOutcome {
        let request: JsonRpcRequest = match serde_json::from_value(body.clone()) {
            Ok(request) => request,
            Err(e) => {
                let err = AppError::InvalidRequest(e.to_string());
                tracing::warn!(error = %err, "Rejecting malformed JSON-RPC envelope");
                return DispatchOutcome::failure(JsonRpcRequest::fallback_id(&body), &err);
            }
        };

        let id = request.id.clone();
        match self.handle(request).await {
            Ok(result) => DispatchOutcome::success(id, result),
            Err(err) => {
                if err.rpc_status().is_server_error() {
                    tracing::error!(error = %err, "JSON-RPC call failed");
                } else {
                    tracing::warn!(error = %err, "JSON-RPC call rejected");
                }
                DispatchOutcome::failure(id, &err)
            }
        }
    }

    async fn handle(&self, request: JsonRpcRequest) -> Result<Value> {
        let method = request.method.unwrap_or_default();
        let params = request.params.unwrap_or(Value::Null);

        match method.as_str() {
            "tools/list" => Ok(json!({ "tools": self.catalog.descriptors() })),
            "tools/call" => self.call_tool(&params).await,
            "ping" | "mcp.ping" => Ok(json!({ "ok": true })),
            _ => Err(AppError::UnknownMethod(method)),
        }
    }

    async fn call_tool(&self, params: &Value) -> Result<Value> {
        let name = params.get("name").and_then(Value::as_str).unwrap_or_default();
        let args = params.get("arguments").unwrap_or(&Value::Null);
        let kind = self
            .catalog
            .resolve(name)
            .ok_or_else(|| AppError::UnknownTool(name.to_string()))?;

        tracing::info!(tool = name, "Tool call");
        let outcome = self.run_tool(kind, args).await;
        let label = if outcome.is_ok() { "ok" } else { "error" };
        metrics::counter!("tool_calls_total", "tool" => kind.suffix(), "outcome" => label)
            .increment(1);
        outcome
    }

    async fn run_tool(&self, kind: ToolKind, args: &Value) -> Result<Value> {
        match kind {
            ToolKind::Search => {
                let query = string_arg(args, "query");
                let hits = self.search.search(&query).await?;
                Ok(json!({ "items": hits }))
            }
            ToolKind::Read => {
                let path = string_arg(args, "path");
                let content = self.rest.read(&path).await?;
                let record = CanonicalFileRecord { path, content };
                Ok(json!(record))
            }
            ToolKind::Write => {
                let path = string_arg(args, "path");
                let content = string_arg(args, "content");
                let result = self.rest.write(&path, &content).await?;
                Ok(json!(result))
            }
            ToolKind::ListFiles => {
                let dir = args.get("dir").and_then(Value::as_str);
                let files = self.rest.list_files(dir).await;
                Ok(json!({ "files": files }))
            }
        }
    }
}

/// String argument by key, empty when absent or not a string.
fn string_arg(args: &Value, key: &str) -> String {
    args.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
