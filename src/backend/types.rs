//! Canonical records produced by the backend adapters.
//!
//! Whatever shape a backend answers with, callers only ever see these types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single search hit.
///
/// `path` is empty when the backend gave no usable location. Snippets are
/// not length-limited here; callers cut them to their own display budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalHit {
    pub path: String,
    pub snippet: String,
    pub score: Option<f64>,
}

impl CanonicalHit {
    pub fn new(path: impl Into<String>, snippet: impl Into<String>, score: Option<f64>) -> Self {
        Self {
            path: path.into(),
            snippet: snippet.into(),
            score,
        }
    }
}

/// Result of reading a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalFileRecord {
    pub path: String,
    pub content: String,
}

/// Result of writing a note.
///
/// Fields the backend returned beyond `ok` and `path` are passed through
/// untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalWriteResult {
    pub ok: bool,
    pub path: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Truncate `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
