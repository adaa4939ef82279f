use crate::backend::{HttpTransport, ReqwestTransport, RestBackend, UpstreamMcp};
use crate::config::Config;
use crate::error::Result;
use crate::protocol::{Dispatcher, ToolCatalog};
use crate::search::SearchFacade;
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// Everything here is read-only after startup; the only shared resource is
/// the pooled HTTP transport inside the adapters.
pub struct AppState {
    pub config: Arc<Config>,
    pub rest: Arc<RestBackend>,
    pub mcp: Arc<UpstreamMcp>,
    pub search: Arc<SearchFacade>,
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Build state with the production `reqwest` transport.
    pub fn new(config: Config) -> Result<Self> {
        let transport = ReqwestTransport::from_config(&config)?;
        tracing::info!(
            timeout_secs = config.http_timeout_secs,
            verify_ssl = config.verify_ssl,
            "HTTP transport initialized"
        );
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Build state around any transport; tests pass in-process doubles.
    pub fn with_transport(config: Config, transport: Arc<dyn HttpTransport>) -> Self {
        let rest = Arc::new(RestBackend::new(
            config.rest_url.clone(),
            config.rest_api_key.clone(),
            Arc::clone(&transport),
        ));
        let mcp = Arc::new(UpstreamMcp::new(
            config.mcp_endpoint_url.clone(),
            transport,
        ));
        let search = Arc::new(SearchFacade::new(
            mcp.clone(),
            rest.clone(),
            config.prefer_mcp_first,
        ));
        let dispatcher = Dispatcher::new(
            ToolCatalog::new(config.app_name.clone()),
            Arc::clone(&rest),
            Arc::clone(&search),
        );

        tracing::info!(
            rest = rest.is_configured(),
            mcp = mcp.is_configured(),
            prefer_mcp_first = config.prefer_mcp_first,
            app = %config.app_name,
            "Backends configured"
        );

        Self {
            config: Arc::new(config),
            rest,
            mcp,
            search,
            dispatcher,
        }
    }
}
