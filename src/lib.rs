//! Notebridge - MCP bridge for note search, read, write and listing
//!
//! Exposes four note tools to MCP JSON-RPC clients and satisfies them
//! against either an upstream MCP server or the note application's local
//! REST plugin, hiding backend outages and response-shape drift.

pub mod auth;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod search;
pub mod state;

// Re-export key types for convenience
pub use backend::{CanonicalFileRecord, CanonicalHit, CanonicalWriteResult, HttpTransport};
pub use config::Config;
pub use error::{AppError, Result};
pub use handlers::router;
pub use protocol::{Dispatcher, ToolCatalog};
pub use search::{NoteSearch, SearchFacade};
pub use state::AppState;
