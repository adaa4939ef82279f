//! Normalization of loosely structured backend payloads.
//!
//! Neither backend has a fixed response schema: field names move between
//! plugin versions and MCP servers nest their results differently. Each
//! helper here walks an ordered list of candidate keys and keeps the first
//! usable value, so the untyped `Value` never leaves the adapter layer.

use crate::backend::types::{truncate_chars, CanonicalHit, CanonicalWriteResult};
use serde_json::{Map, Value};

/// Where a search item may keep its note path, in priority order.
/// `file` comes early as a plain string; `file.path` last for the object form.
const HIT_PATH_KEYS: &[&str] = &[
    "path",
    "file",
    "filePath",
    "notePath",
    "filename",
    "fileData.path",
    "document.path",
    "id",
    "file.path",
];

const HIT_SNIPPET_KEYS: &[&str] = &["snippet", "preview", "context", "text"];

const MATCH_SNIPPET_KEYS: &[&str] = &["text", "preview", "context"];

/// Keys echoed into the diagnostic snippet when nothing better exists.
const DIAGNOSTIC_KEYS: &[&str] = &[
    "path", "file", "filePath", "notePath", "snippet", "preview", "text",
];

const DIAGNOSTIC_SNIPPET_CHARS: usize = 240;

/// Secondary wrappers probed when `results` yields nothing.
const RESULT_LIST_KEYS: &[&str] = &["items", "files", "data", "result"];

const LISTING_LIST_KEYS: &[&str] = &["files", "items"];

const LISTING_PATH_KEYS: &[&str] = &["path", "file.path", "id"];

const READ_CONTENT_KEYS: &[&str] = &["content", "text", "body"];

/// Follow a dotted key path (`"fileData.path"`) through nested objects.
pub fn lookup<'a>(value: &'a Value, dotted: &str) -> Option<&'a Value> {
    dotted
        .split('.')
        .try_fold(value, |current, key| current.as_object()?.get(key))
}

/// First candidate key holding a non-empty string (or a number).
pub fn first_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| lookup(value, key).and_then(non_empty_text))
}

/// Value of the first candidate key that is present, whatever it holds.
fn pick<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| lookup(value, key))
}

fn non_empty_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Loose truthiness: null, false, zero and empty containers are all "absent".
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Locate the list of raw hits inside a search response.
///
/// A bare array is used as is. Otherwise `results` wins when it is a
/// non-empty list, then the first of the secondary wrappers that is a list.
pub fn search_items(payload: &Value) -> &[Value] {
    match payload {
        Value::Array(items) => items,
        Value::Object(map) => {
            if let Some(Value::Array(items)) = map.get("results") {
                if !items.is_empty() {
                    return items;
                }
            }
            RESULT_LIST_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array))
                .map(Vec::as_slice)
                .unwrap_or(&[])
        }
        _ => &[],
    }
}

/// Map one raw search item into a canonical hit.
pub fn hit_from_item(item: &Value) -> CanonicalHit {
    if let Value::String(path) = item {
        return CanonicalHit::new(path.clone(), String::new(), None);
    }

    let path = first_text(item, HIT_PATH_KEYS).unwrap_or_default();
    let snippet = first_text(item, HIT_SNIPPET_KEYS)
        .or_else(|| first_match_snippet(item))
        .unwrap_or_else(|| diagnostic_snippet(item));
    let score = item.get("score").and_then(score_value);

    CanonicalHit::new(path, snippet.trim(), score)
}

/// Numeric score, also accepting numbers sent as strings.
fn score_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn first_match_snippet(item: &Value) -> Option<String> {
    let first = item.get("matches")?.as_array()?.first()?;
    first_text(first, MATCH_SNIPPET_KEYS)
}

/// Compact JSON of whichever diagnostic keys the item carries, in key order.
fn diagnostic_snippet(item: &Value) -> String {
    let fields: Vec<String> = DIAGNOSTIC_KEYS
        .iter()
        .filter_map(|key| {
            item.get(*key)
                .map(|value| format!("{}: {}", Value::String(key.to_string()), value))
        })
        .collect();
    truncate_chars(&format!("{{{}}}", fields.join(", ")), DIAGNOSTIC_SNIPPET_CHARS)
}

/// Note body from a JSON read response, or the pretty-printed payload.
pub fn content_from_json(payload: &Value) -> String {
    first_text(payload, READ_CONTENT_KEYS)
        .unwrap_or_else(|| serde_json::to_string_pretty(payload).unwrap_or_default())
}

/// Build a write result from an accepted response body.
///
/// Anything other than a JSON object counts as an empty body. `ok` defaults
/// to true and `path` to the requested path.
pub fn write_result(body: Option<Value>, requested_path: &str) -> CanonicalWriteResult {
    let mut fields = match body {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    let ok = match fields.remove("ok") {
        Some(Value::Bool(ok)) => ok,
        _ => true,
    };
    let path = match fields.remove("path") {
        Some(Value::String(path)) => path,
        _ => requested_path.to_string(),
    };

    CanonicalWriteResult {
        ok,
        path,
        extra: fields,
    }
}

/// Paths from a listing response.
///
/// A bare array is authoritative, even when empty. An object is searched for
/// a `files`/`items` list and yields `None` when that produces nothing, which
/// tells the caller to keep probing.
pub fn paths_from_listing(payload: &Value) -> Option<Vec<String>> {
    match payload {
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        Value::Object(map) => {
            let items = LISTING_LIST_KEYS.iter().find_map(|key| {
                map.get(*key)
                    .and_then(Value::as_array)
                    .filter(|items| !items.is_empty())
            })?;
            let paths: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) if !s.is_empty() => Some(s.clone()),
                    other => pick(other, LISTING_PATH_KEYS).and_then(non_empty_text),
                })
                .collect();
            (!paths.is_empty()).then_some(paths)
        }
        _ => None,
    }
}

/// Unwrap an MCP `tools/call` result into a list of raw hits.
///
/// Tries `result.result`, then `result.data`, then the result itself; an
/// object carrying `items` yields that value and a non-list is wrapped.
pub fn unwrap_tool_result(result: Value) -> Vec<Value> {
    let inner = ["result", "data"]
        .iter()
        .find_map(|key| result.get(*key).filter(|v| is_truthy(v)).cloned())
        .unwrap_or(result);

    let inner = match inner {
        Value::Object(mut map) if map.contains_key("items") => {
            map.remove("items").unwrap_or(Value::Null)
        }
        other => other,
    };

    match inner {
        Value::Array(items) => items,
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hits(payload: &Value) -> Vec<CanonicalHit> {
        search_items(payload).iter().map(hit_from_item).collect()
    }

    #[test]
    fn test_every_wrapper_yields_the_same_hits() {
        let raw = json!([{"path": "Magic/Boros.md", "snippet": "red white aggro", "score": 1.5}]);
        let expected = hits(&raw);
        assert_eq!(expected.len(), 1);

        for key in ["results", "items", "files", "data", "result"] {
            let wrapped = json!({ key: raw.clone() });
            assert_eq!(hits(&wrapped), expected, "wrapper {key}");
        }
    }

    #[test]
    fn test_empty_results_fall_through_to_secondary_keys() {
        let payload = json!({"results": [], "data": [{"path": "b.md", "snippet": "s"}]});
        let found = hits(&payload);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, "b.md");
    }

    #[test]
    fn test_first_list_wrapper_wins() {
        let payload = json!({"items": "not a list", "files": [{"path": "f.md"}], "data": [{"path": "d.md"}]});
        assert_eq!(hits(&payload)[0].path, "f.md");
    }

    #[test]
    fn test_non_list_payload_yields_nothing() {
        assert!(hits(&json!({"message": "nope"})).is_empty());
        assert!(hits(&json!("text")).is_empty());
    }

    #[test]
    fn test_nested_paths_resolve() {
        let file_data = hit_from_item(&json!({"fileData": {"path": "nested/one.md"}, "snippet": "x"}));
        assert_eq!(file_data.path, "nested/one.md");

        let document = hit_from_item(&json!({"document": {"path": "nested/two.md"}, "snippet": "x"}));
        assert_eq!(document.path, "nested/two.md");

        let file_object = hit_from_item(&json!({"file": {"path": "nested/three.md"}, "snippet": "x"}));
        assert_eq!(file_object.path, "nested/three.md");
    }

    #[test]
    fn test_path_priority_and_empty_values() {
        let hit = hit_from_item(&json!({"path": "", "filename": "Notes/x.md", "id": "ignored"}));
        assert_eq!(hit.path, "Notes/x.md");

        let by_id = hit_from_item(&json!({"id": 42, "snippet": "s"}));
        assert_eq!(by_id.path, "42");

        let unknown = hit_from_item(&json!({"snippet": "s"}));
        assert_eq!(unknown.path, "");
    }

    #[test]
    fn test_snippet_from_first_match() {
        let item = json!({
            "filename": "Magic/Boros.md",
            "score": 0.25,
            "matches": [{"match": {"start": 3, "end": 8}, "context": "  the boros legion  "}]
        });
        let hit = hit_from_item(&item);
        assert_eq!(hit.snippet, "the boros legion");
        assert_eq!(hit.score, Some(0.25));
    }

    #[test]
    fn test_diagnostic_snippet_when_nothing_else() {
        let item = json!({"filePath": "a.md", "other": "skip me"});
        let hit = hit_from_item(&item);
        assert_eq!(hit.path, "a.md");
        assert_eq!(hit.snippet, r#"{"filePath": "a.md"}"#);
    }

    #[test]
    fn test_diagnostic_snippet_is_bounded() {
        let long = "x".repeat(1000);
        let hit = hit_from_item(&json!({"path": long}));
        assert_eq!(hit.snippet.chars().count(), DIAGNOSTIC_SNIPPET_CHARS);
    }

    #[test]
    fn test_string_items_are_paths() {
        assert_eq!(hit_from_item(&json!("a/b.md")).path, "a/b.md");
    }

    #[test]
    fn test_content_from_json_prefers_content_then_text_then_body() {
        assert_eq!(content_from_json(&json!({"content": "c", "text": "t"})), "c");
        assert_eq!(content_from_json(&json!({"content": "", "text": "t"})), "t");
        assert_eq!(content_from_json(&json!({"body": "b"})), "b");

        let fallback = content_from_json(&json!({"tags": ["x"]}));
        assert!(fallback.contains("\"tags\""));
        assert!(fallback.contains('\n'));
    }

    #[test]
    fn test_write_result_backfills_ok_and_path() {
        let result = write_result(Some(json!({"created": true})), "a.md");
        assert!(result.ok);
        assert_eq!(result.path, "a.md");
        assert_eq!(result.extra.get("created"), Some(&json!(true)));

        let empty = write_result(None, "b.md");
        assert!(empty.ok);
        assert_eq!(empty.path, "b.md");

        let listed = write_result(Some(json!([1, 2])), "c.md");
        assert!(listed.ok);
        assert!(listed.extra.is_empty());
    }

    #[test]
    fn test_write_result_keeps_backend_values() {
        let result = write_result(Some(json!({"ok": false, "path": "moved.md"})), "a.md");
        assert!(!result.ok);
        assert_eq!(result.path, "moved.md");
    }

    #[test]
    fn test_listing_bare_array_is_authoritative() {
        assert_eq!(
            paths_from_listing(&json!(["a.md", 7])),
            Some(vec!["a.md".to_string(), "7".to_string()])
        );
        assert_eq!(paths_from_listing(&json!([])), Some(vec![]));
    }

    #[test]
    fn test_listing_object_shapes() {
        let payload = json!({"files": [
            {"path": "a.md"},
            {"file": {"path": "b.md"}},
            {"id": "c.md"},
            "d.md",
            {"path": ""},
            {"name": "ignored"}
        ]});
        assert_eq!(
            paths_from_listing(&payload),
            Some(vec!["a.md".into(), "b.md".into(), "c.md".into(), "d.md".into()])
        );

        let items = json!({"files": [], "items": [{"path": "e.md"}]});
        assert_eq!(paths_from_listing(&items), Some(vec!["e.md".into()]));

        assert_eq!(paths_from_listing(&json!({"files": [{"name": "x"}]})), None);
        assert_eq!(paths_from_listing(&json!({"status": "ok"})), None);
    }

    #[test]
    fn test_score_accepts_numeric_strings() {
        assert_eq!(hit_from_item(&json!({"path": "a", "score": "0.5"})).score, Some(0.5));
        assert_eq!(hit_from_item(&json!({"path": "a", "score": 3})).score, Some(3.0));
        assert_eq!(hit_from_item(&json!({"path": "a", "score": "high"})).score, None);
        assert_eq!(hit_from_item(&json!({"path": "a", "score": null})).score, None);
    }

    #[test]
    fn test_listing_uses_first_present_key_even_when_empty() {
        let payload = json!({"files": [
            {"path": "", "id": "c.md"},
            {"file": {"path": null}, "id": "d.md"},
            {"path": "e.md"}
        ]});
        assert_eq!(paths_from_listing(&payload), Some(vec!["e.md".to_string()]));
    }

    #[test]
    fn test_unwrap_tool_result_layers() {
        assert_eq!(
            unwrap_tool_result(json!({"result": [{"path": "a"}]})),
            vec![json!({"path": "a"})]
        );
        assert_eq!(
            unwrap_tool_result(json!({"result": [], "data": {"items": [{"path": "b"}]}})),
            vec![json!({"path": "b"})]
        );
        assert_eq!(
            unwrap_tool_result(json!({"items": [{"path": "c"}, {"path": "d"}]})).len(),
            2
        );
        assert_eq!(
            unwrap_tool_result(json!({"path": "single.md"})),
            vec![json!({"path": "single.md"})]
        );
    }
}
