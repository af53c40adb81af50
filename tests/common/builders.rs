//! Test builders — ergonomic constructors for records, payloads, and
//! adapters.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning
//! `Result`.

use alf_core::{Config, EventAdapter};
use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for a single raw event record.
///
/// # Example
///
/// ```rust
/// let record = RecordBuilder::new()
///     .category("Administrative")
///     .time("2021-01-01T00:00:00Z")
///     .msg("restart requested")
///     .build();
/// ```
#[derive(Default)]
pub struct RecordBuilder {
    fields: Map<String, Value>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(self, category: &str) -> Self {
        self.field("category", json!(category))
    }

    pub fn resource_id(self, resource_id: &str) -> Self {
        self.field("resourceId", json!(resource_id))
    }

    pub fn time(self, time: &str) -> Self {
        self.field("time", json!(time))
    }

    pub fn level(self, level: &str) -> Self {
        self.field("level", json!(level))
    }

    pub fn operation(self, operation_name: &str) -> Self {
        self.field("operationName", json!(operation_name))
    }

    /// Set `properties.message`.
    pub fn msg(self, message: &str) -> Self {
        self.field("properties", json!({ "message": message }))
    }

    /// Set `properties.description`.
    pub fn description(self, description: &str) -> Self {
        self.field("properties", json!({ "description": description }))
    }

    /// Set the raw properties value (object, encoded string, anything).
    pub fn properties(self, properties: Value) -> Self {
        self.field("properties", properties)
    }

    /// Set an arbitrary top-level field.
    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }

    /// Serialize as a single-record (unbatched) payload.
    pub fn payload(self) -> String {
        self.build().to_string()
    }
}

/// Wrap records in the `records` batch property.
pub fn batch(records: Vec<Value>) -> String {
    json!({ "records": records }).to_string()
}

// ---------------------------------------------------------------------------
// Adapter construction
// ---------------------------------------------------------------------------

/// Adapter with all-default (pass-through) configuration.
pub fn adapter() -> EventAdapter {
    EventAdapter::new(&Config::default()).expect("default config must build an adapter")
}

/// Adapter with configuration tweaked by the caller.
///
/// ```rust
/// let adapter = adapter_with(|cfg| {
///     cfg.client_id = Some("client-1".into());
///     cfg.scrub_regex = Some(r"\d".into());
/// });
/// ```
pub fn adapter_with(configure: impl FnOnce(&mut Config)) -> EventAdapter {
    let mut config = Config::default();
    configure(&mut config);
    EventAdapter::new(&config).expect("test config must build an adapter")
}
