//! Terminal rendering for `notebridge query`.

use crate::backend::types::{truncate_chars, CanonicalHit};
use std::fmt::Write;

/// Snippet budget per printed hit, in characters.
pub const CLI_SNIPPET_CHARS: usize = 220;

/// Render up to `limit` hits as a markdown list.
pub fn render_results(term: &str, hits: &[CanonicalHit], limit: usize) -> String {
    let mut out = format!("### Results for `{}` (showing up to {})\n\n", term, limit);

    for (i, hit) in hits.iter().take(limit).enumerate() {
        let path = if hit.path.is_empty() { "unknown" } else { hit.path.as_str() };
        let score = hit
            .score
            .map(|s| format!(" _(score {})_", s))
            .unwrap_or_default();
        let snippet = hit.snippet.trim().replace('\n', " ");

        let _ = writeln!(
            out,
            "{}. **{}**{}\n    - {}\n",
            i + 1,
            path,
            score,
            truncate_chars(&snippet, CLI_SNIPPET_CHARS)
        );
    }

    out
}
