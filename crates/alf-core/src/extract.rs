//! Deep metadata extractor — resolves operator-configured dotted path
//! specifiers against a raw event and flattens each hit into metadata.
//!
//! This is the opt-in escape hatch for schema variants the engine has no
//! prior knowledge of: operators name the nested fields they care about
//! (e.g. `identity.authorization`) and get them back as flat keys. A
//! specifier that fails to resolve is skipped silently — no error, no
//! placeholder.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::flatten::flatten;

/// Source-side field names remapped to their canonical metadata keys so that
/// opted-in fields land beside the fixed getter-derived ones.
static RENAMED_KEYS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "operationName" => "activity_type",
    "level" => "severity",
    "resourceId" => "resource_id",
};

/// Split a comma-separated specifier list into trimmed, non-empty paths.
pub fn parse_specifiers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|spec| !spec.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve each specifier against `record` and flatten the hits.
pub fn extract(record: &Value, specifiers: &[String]) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for spec in specifiers {
        let base = RENAMED_KEYS
            .get(spec.as_str())
            .copied()
            .unwrap_or(spec.as_str());
        match value_at_path(record, spec) {
            Some(value) => out.extend(flatten(base, value)),
            None => tracing::debug!(specifier = %spec, "metadata path did not resolve"),
        }
    }
    out
}

/// Walk a dot-separated path: objects by key, arrays by numeric index.
/// Any miss or type mismatch resolves to `None`.
pub fn value_at_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut cursor = root;
    for segment in path.split('.') {
        cursor = match cursor {
            Value::Object(entries) => entries.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(cursor)
}
