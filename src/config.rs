use std::env;
use std::time::Duration;

/// Tool-name prefix used when `APP_NAME` is unset.
pub const DEFAULT_APP_NAME: &str = "arcology";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Prefix for the qualified tool names (`<app>.search`, ...).
    pub app_name: String,
    /// Upstream MCP JSON-RPC endpoint. `None` disables the MCP backend.
    pub mcp_endpoint_url: Option<String>,
    /// Base URL of the Obsidian Local REST API plugin.
    pub rest_url: Option<String>,
    /// Bearer token sent to the REST backend.
    pub rest_api_key: Option<String>,
    /// Verify TLS certificates on outbound calls. Off by default because the
    /// REST plugin ships a self-signed certificate.
    pub verify_ssl: bool,
    /// Try the upstream MCP server before the REST backend for search.
    pub prefer_mcp_first: bool,
    /// Bearer token inbound callers must present on `/mcp`.
    pub auth_key: Option<String>,
    /// Single timeout bounding every outbound call.
    pub http_timeout_secs: u64,
    pub shutdown_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset and URLs lose their trailing `/`.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let url = |key: &str| var(key).map(|v| v.trim().trim_end_matches('/').to_string());

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()?,
            app_name: var("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            mcp_endpoint_url: url("MCP_ENDPOINT_URL"),
            rest_url: url("OBSIDIAN_REST_URL"),
            rest_api_key: var("OBSIDIAN_API_KEY"),
            verify_ssl: parse_bool(var("OBSIDIAN_VERIFY_SSL").as_deref(), false),
            prefer_mcp_first: parse_bool(var("MCP_FIRST").as_deref(), true),
            auth_key: var("BRIDGE_AUTH_KEY"),
            http_timeout_secs: var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|| "25".to_string())
                .parse()?,
            shutdown_timeout_secs: var("SHUTDOWN_TIMEOUT")
                .unwrap_or_else(|| "5".to_string())
                .parse()?,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            app_name: DEFAULT_APP_NAME.to_string(),
            mcp_endpoint_url: None,
            rest_url: None,
            rest_api_key: None,
            verify_ssl: false,
            prefer_mcp_first: true,
            auth_key: None,
            http_timeout_secs: 25,
            shutdown_timeout_secs: 5,
        }
    }
}

/// `1`, `true`, `yes` and `on` (any case) are true; anything else is false.
fn parse_bool(raw: Option<&str>, default: bool) -> bool {
    match raw {
        None => default,
        Some(v) => matches!(
            v.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
    }
}
