//! Core types for alf-core.
//!
//! This module defines the normalized [`LogEntry`] handed to the transport
//! layer, plus the transient [`RawEvent`] / [`EventProperties`] views used
//! while a single record is being classified. `RawEvent` is an opportunistic
//! decode: every field is optional, and unknown fields are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A normalized log entry, ready for the ingestion backend.
///
/// `message` is always present; `timestamp` is `None` only when the source
/// record carried no time field at all. The identity map is serialized under
/// the wire name `_lm.resourceId` because that is what the backend matches
/// resources on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// Resolved, scrubbed message text.
    pub message: String,
    /// Event time as epoch seconds.
    pub timestamp: Option<i64>,
    /// Routing/grouping keys. Exactly one classification branch's keys are
    /// present — resource ID for resource events, client ID plus cloud
    /// category for activity events.
    #[serde(rename = "_lm.resourceId")]
    pub resource_id: BTreeMap<String, String>,
    /// Flat auxiliary metadata (severity, category, deep-extracted paths, …).
    pub metadata: BTreeMap<String, String>,
}

/// Opportunistic view of a single raw Azure event record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default)]
    pub operation_name: Option<String>,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub properties: Option<RawProperties>,
}

impl RawEvent {
    /// Resolve the properties sub-object regardless of its original encoding.
    pub fn properties(&self) -> Option<EventProperties> {
        self.properties.as_ref().and_then(RawProperties::decode)
    }
}

/// Message-bearing fields of a record's properties sub-object.
///
/// Producers disagree on casing: resource telemetry tends to emit `Msg` and
/// `Description`, activity events lowercase variants. All are accepted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventProperties {
    #[serde(default, alias = "Msg", alias = "msg")]
    pub message: Option<String>,
    #[serde(default, alias = "Description")]
    pub description: Option<String>,
}

/// The properties field as it arrives on the wire: either a nested JSON
/// object or a JSON-encoded string holding one. Decoding is attempted
/// object-first, then string-decode-then-object; anything else is treated as
/// absent rather than an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawProperties {
    Object(EventProperties),
    Encoded(String),
    Other(serde_json::Value),
}

impl RawProperties {
    pub fn decode(&self) -> Option<EventProperties> {
        match self {
            RawProperties::Object(props) => Some(props.clone()),
            RawProperties::Encoded(text) => serde_json::from_str(text).ok(),
            RawProperties::Other(_) => None,
        }
    }
}
