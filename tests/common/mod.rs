//! In-process stand-ins for the REST plugin and the upstream MCP server.
#![allow(dead_code)]

use async_trait::async_trait;
use notebridge::backend::{HttpRequest, HttpResponse, HttpTransport};
use notebridge::{AppState, Config, Result};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub const REST_URL: &str = "https://vault.test:27124";
pub const MCP_URL: &str = "http://mcp.test/rpc";
pub const AUTH_KEY: &str = "test-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McpMode {
    /// Every call answers HTTP 503.
    Down,
    /// `tools/list` has no tool mentioning search.
    NoSearchTool,
    /// A `vault_search` tool returning one hit.
    Working,
}

/// A note vault reachable through the REST routes the plugin really serves,
/// plus a scripted upstream MCP server.
pub struct FakeBackends {
    notes: Mutex<BTreeMap<String, String>>,
    mcp_mode: McpMode,
    rest_down: bool,
    log: Mutex<Vec<String>>,
}

impl FakeBackends {
    pub fn new(mcp_mode: McpMode) -> Self {
        Self {
            notes: Mutex::new(BTreeMap::new()),
            mcp_mode,
            rest_down: false,
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn with_rest_down(mut self) -> Self {
        self.rest_down = true;
        self
    }

    pub fn with_note(self, path: &str, content: &str) -> Self {
        self.notes
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
        self
    }

    pub fn note(&self, path: &str) -> Option<String> {
        self.notes.lock().unwrap().get(path).cloned()
    }

    /// `METHOD url` for every request received, in order.
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn handle_mcp(&self, request: &HttpRequest) -> HttpResponse {
        let method = request
            .json
            .as_ref()
            .and_then(|body| body.get("method"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        let result = match (self.mcp_mode, method) {
            (McpMode::Down, _) => return HttpResponse::text(503, "unavailable"),
            (McpMode::NoSearchTool, "tools/list") => json!({"tools": [{"name": "read_note"}]}),
            (McpMode::Working, "tools/list") => {
                json!({"tools": [{"name": "read_note"}, {"name": "vault_search"}]})
            }
            (McpMode::Working, "tools/call") => json!({"result": [
                {"path": "mcp/hit.md", "snippet": "from mcp", "score": 9.0}
            ]}),
            _ => {
                return HttpResponse::from_json(
                    200,
                    &json!({"jsonrpc": "2.0", "id": "1", "error": {"code": -32601, "message": "no such method"}}),
                )
            }
        };

        HttpResponse::from_json(200, &json!({"jsonrpc": "2.0", "id": "1", "result": result}))
    }

    fn handle_rest(&self, request: &HttpRequest, route: &str) -> HttpResponse {
        if self.rest_down {
            return HttpResponse::text(503, "plugin offline");
        }

        match (request.method.as_str(), route) {
            ("POST", "/search/simple/") => {
                let query = request.query_value("query").unwrap_or_default().to_lowercase();
                let hits: Vec<Value> = self
                    .notes
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|(_, body)| body.to_lowercase().contains(&query))
                    .map(|(path, body)| {
                        json!({
                            "filename": path,
                            "score": 1.0,
                            "matches": [{"match": {"start": 0, "end": 1}, "context": body}]
                        })
                    })
                    .collect();
                HttpResponse::from_json(200, &Value::Array(hits))
            }
            ("POST", "/vault/file") => {
                let body = request.json.clone().unwrap_or(Value::Null);
                let path = body["path"].as_str().unwrap_or_default().to_string();
                let content = body["content"].as_str().unwrap_or_default().to_string();
                self.notes.lock().unwrap().insert(path, content);
                HttpResponse::from_json(200, &json!({"created": true}))
            }
            ("POST", "/file") => HttpResponse::empty(405),
            ("GET", "/vault/files") => {
                let dir = request.query_value("dir").unwrap_or_default();
                let files: Vec<Value> = self
                    .notes
                    .lock()
                    .unwrap()
                    .keys()
                    .filter(|path| path.starts_with(dir))
                    .map(|path| json!({"path": path}))
                    .collect();
                HttpResponse::from_json(200, &json!({"files": files}))
            }
            ("GET", route) if route.starts_with("/vault/") => {
                let raw = &route["/vault/".len()..];
                let path = urlencoding::decode(raw)
                    .map(|p| p.into_owned())
                    .unwrap_or_else(|_| raw.to_string());
                match self.note(&path) {
                    Some(content) => HttpResponse::text(200, content),
                    None => HttpResponse::text(404, "Not Found"),
                }
            }
            _ => HttpResponse::empty(404),
        }
    }
}

#[async_trait]
impl HttpTransport for FakeBackends {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.log
            .lock()
            .unwrap()
            .push(format!("{} {}", request.method, request.url));

        if request.url == MCP_URL {
            return Ok(self.handle_mcp(&request));
        }
        match request.url.strip_prefix(REST_URL) {
            Some(route) => Ok(self.handle_rest(&request, route)),
            None => Ok(HttpResponse::empty(404)),
        }
    }
}

pub fn test_config() -> Config {
    Config {
        app_name: "arcology".to_string(),
        mcp_endpoint_url: Some(MCP_URL.to_string()),
        rest_url: Some(REST_URL.to_string()),
        rest_api_key: Some("vault-key".to_string()),
        auth_key: Some(AUTH_KEY.to_string()),
        ..Config::default()
    }
}

pub fn test_state(backends: Arc<FakeBackends>) -> Arc<AppState> {
    Arc::new(AppState::with_transport(test_config(), backends))
}
