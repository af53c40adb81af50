//! Safe JSON handling — tolerant parsing, recursive repair, and the
//! unquote/unescape utility for JSON blobs embedded in environment-style
//! values.
//!
//! Upstream producers are untrusted: a payload may be malformed at the top
//! level or carry individually broken nested fields. [`parse_safely`] never
//! fails, and [`normalize`] drops an offending child (object key or array
//! element) while keeping its siblings, so one bad field never loses the
//! whole record.

use serde_json::{Map, Value};

/// Nesting depth beyond which a branch is dropped instead of walked further.
/// Keeps adversarially deep input from exhausting the stack.
pub(crate) const MAX_DEPTH: usize = 64;

/// Parse an arbitrary string as JSON, returning an empty object on any
/// syntax failure. Successful parses are passed through [`normalize`].
pub fn parse_safely(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => normalize(value),
        Err(err) => {
            tracing::warn!(error = %err, "payload is not valid JSON, substituting empty object");
            Value::Object(Map::new())
        }
    }
}

/// Recursively walk a JSON value, rebuilding objects and arrays and dropping
/// any child that cannot be processed. Primitive and null leaves pass
/// through unchanged. Idempotent: normalizing an already-normalized value
/// returns an equal value.
pub fn normalize(value: Value) -> Value {
    normalize_at(value, 0).unwrap_or(Value::Null)
}

/// `None` means "drop this branch"; only the depth guard triggers it today,
/// but callers keep siblings regardless of why a child was dropped.
fn normalize_at(value: Value, depth: usize) -> Option<Value> {
    if depth > MAX_DEPTH {
        tracing::debug!(depth, "dropping branch beyond depth limit");
        return None;
    }
    match value {
        Value::Object(entries) => {
            let mut repaired = Map::new();
            for (key, child) in entries {
                if let Some(child) = normalize_at(child, depth + 1) {
                    repaired.insert(key, child);
                }
            }
            Some(Value::Object(repaired))
        }
        Value::Array(items) => Some(Value::Array(
            items
                .into_iter()
                .filter_map(|item| normalize_at(item, depth + 1))
                .collect(),
        )),
        leaf => Some(leaf),
    }
}

/// Remove a single layer of enclosing double quotes and reverse
/// string-escaping. Used when a JSON blob arrives embedded as an escaped
/// string in an environment-style value. Not part of the recursive walk.
pub fn unquote_and_unescape(raw: &str) -> String {
    let inner = raw.strip_prefix('"').unwrap_or(raw);
    let inner = inner.strip_suffix('"').unwrap_or(inner);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        // Malformed escape: keep it verbatim.
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
