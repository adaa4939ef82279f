use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Default JSON-RPC error code for application failures.
pub const JSONRPC_SERVER_ERROR: i64 = -32000;
/// JSON-RPC code for an envelope that is not a valid request object.
pub const JSONRPC_INVALID_REQUEST: i64 = -32600;

#[derive(Error, Debug)]
pub enum AppError {
    /// A backend URL required by the operation is missing.
    #[error("{0} not configured.")]
    NotConfigured(String),

    /// Backend reachable but it answered with an error or a bad status.
    #[error("{0}")]
    Upstream(String),

    /// Network failure or timeout.
    #[error("transport error: {0}")]
    Transport(String),

    /// Every candidate route was tried without success.
    #[error("{0}")]
    NotFound(String),

    #[error("No MCP search tool found.")]
    NoSearchTool,

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Both search backends failed.
    #[error("MCP failed: {mcp}; REST failed: {rest}")]
    CombinedFailure { mcp: String, rest: String },

    #[error("Missing bearer token")]
    Unauthorized,

    #[error("Invalid bearer token")]
    Forbidden,

    #[error("Server missing bridge auth key")]
    AuthNotConfigured,
}

impl AppError {
    /// HTTP status used when the error leaves through the JSON-RPC endpoint.
    ///
    /// Caller mistakes are 400, auth failures keep their own status and
    /// everything raised by a backend is 500.
    pub fn rpc_status(&self) -> StatusCode {
        match self {
            AppError::UnknownMethod(_) | AppError::UnknownTool(_) | AppError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP status used by the plain HTTP routes, where backend failures
    /// surface as a bad gateway.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotConfigured(_)
            | AppError::Upstream(_)
            | AppError::Transport(_)
            | AppError::NoSearchTool
            | AppError::CombinedFailure { .. } => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AuthNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            _ => self.rpc_status(),
        }
    }

    pub fn rpc_code(&self) -> i64 {
        match self {
            AppError::InvalidRequest(_) => JSONRPC_INVALID_REQUEST,
            _ => JSONRPC_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Transport(format!("request timed out: {}", err))
        } else {
            AppError::Transport(err.to_string())
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
