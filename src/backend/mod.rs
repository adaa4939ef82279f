//! Backend adapters and the canonical records they produce.
//!
//! Two backends can serve notes: the note application's local REST plugin
//! ([`rest`]) and an upstream MCP server ([`upstream`]). Both speak through
//! the same injected [`transport::HttpTransport`].

pub mod normalize;
pub mod rest;
pub mod transport;
pub mod types;
pub mod upstream;

#[cfg(test)]
pub(crate) mod testing;

pub use rest::RestBackend;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{CanonicalFileRecord, CanonicalHit, CanonicalWriteResult};
pub use upstream::UpstreamMcp;
