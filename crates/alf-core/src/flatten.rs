//! Metadata flattener — collapses an arbitrary JSON subtree into a flat
//! `dotted.path → string` map.
//!
//! Objects recurse with `base.key`, arrays with `base.index`, primitives
//! become their canonical textual form, and nulls contribute nothing. JSON
//! has no cycles, so only depth needs guarding: a branch past the limit
//! contributes nothing rather than failing.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::json::MAX_DEPTH;

/// Flatten `value` under `base_key` (may be empty for top-level keys).
pub fn flatten(base_key: &str, value: &Value) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    flatten_into(base_key, value, 0, &mut out);
    out
}

fn flatten_into(key: &str, value: &Value, depth: usize, out: &mut BTreeMap<String, String>) {
    if depth > MAX_DEPTH {
        tracing::debug!(key, "skipping flatten branch beyond depth limit");
        return;
    }
    match value {
        Value::Null => {}
        Value::String(text) => {
            out.insert(key.to_string(), text.clone());
        }
        Value::Bool(flag) => {
            out.insert(key.to_string(), flag.to_string());
        }
        Value::Number(number) => {
            out.insert(key.to_string(), number.to_string());
        }
        Value::Object(entries) => {
            for (child_key, child) in entries {
                flatten_into(&join(key, child_key), child, depth + 1, out);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(&join(key, &index.to_string()), item, depth + 1, out);
            }
        }
    }
}

fn join(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{base}.{segment}")
    }
}
