//! Event classifier and entry builder — the engine's sole public operation.
//!
//! [`EventAdapter::transform`] turns one raw JSON payload into zero or more
//! normalized [`LogEntry`] values: it unwraps the `records` batch wrapper,
//! classifies each record as a resource or activity event, resolves the
//! message through the fallback chain, and assembles identity and metadata
//! maps. The adapter is immutable once constructed; rebuilding the scrub
//! pattern means constructing a new instance, so concurrent reads are
//! always safe.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::extract;
use crate::json;
use crate::types::{LogEntry, RawEvent};

// ---------------------------------------------------------------------------
// Wire-level constants
// ---------------------------------------------------------------------------

/// JSON property holding the array of log events in batched payloads.
pub const RECORDS_PROPERTY: &str = "records";
/// Identity key matching resources by Azure resource ID.
pub const RESOURCE_ID_KEY: &str = "system.azure.resourceid";
/// Identity key matching activity logs by Azure client ID.
pub const CLIENT_ID_KEY: &str = "system.azure.clientid";
/// Identity key carrying the fixed cloud category for activity logs.
pub const CLOUD_CATEGORY_KEY: &str = "system.cloud.category";
/// Value of [`CLOUD_CATEGORY_KEY`] on every activity entry.
pub const CLOUD_CATEGORY_VALUE: &str = "Azure/LMAccount";
/// Identity key carrying the configured account name on activity entries.
pub const ACCOUNT_NAME_KEY: &str = "system.azure.accountname";
/// Metadata key carrying the execution environment's tenant ID.
pub const TENANT_ID_KEY: &str = "tenant_id";

/// Getter-derived metadata keys.
pub const SEVERITY_KEY: &str = "severity";
pub const ACTIVITY_TYPE_KEY: &str = "activity_type";
pub const CATEGORY_KEY: &str = "category";
pub const EVENT_SOURCE_KEY: &str = "event_source";

/// Categories identifying account-level activity/audit events. Stored
/// lowercase; the record's category is lowercased exactly once before the
/// membership test.
static AUDIT_CATEGORIES: phf::Set<&'static str> = phf::phf_set! {
    "administrative",
    "servicehealth",
    "resourcehealth",
    "alert",
    "autoscale",
    "security",
    "policy",
    "recommendation",
};

/// Metadata present on every entry, identifying the integration and the
/// resource type to the backend.
static STATIC_METADATA: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "_integration" => "azure-logs",
    "_resource_type" => "azure-resource",
};

/// Extracts the `provider/resourceType` segment pair following `providers/`
/// in an Azure resource ID, preserving the source casing.
const EVENT_SOURCE_PATTERN: &str = r"(?i)/providers/([^/]+/[^/]+)";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Engine errors. Only [`AdapterError::ScrubPattern`] can surface to a
/// caller (at construction); everything else is logged and skipped inside
/// [`EventAdapter::transform`].
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("invalid scrub pattern: {0}")]
    ScrubPattern(#[from] regex::Error),
    #[error("failed to decode event record: {0}")]
    Decode(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// EventAdapter
// ---------------------------------------------------------------------------

/// Immutable normalization engine. All configuration is resolved once at
/// construction and read-only thereafter.
#[derive(Debug)]
pub struct EventAdapter {
    scrub_pattern: Option<Regex>,
    client_id: Option<String>,
    account_name: Option<String>,
    metadata_paths: Vec<String>,
    tenant_id: Option<String>,
    event_source_re: Regex,
}

impl EventAdapter {
    /// Build an adapter from resolved configuration. Fails only on an
    /// invalid scrub regex.
    pub fn new(config: &Config) -> Result<Self, AdapterError> {
        let scrub_pattern = config
            .scrub_regex
            .as_deref()
            .map(Regex::new)
            .transpose()?;
        let metadata_paths = config
            .metadata_keys
            .as_deref()
            .map(extract::parse_specifiers)
            .unwrap_or_default();
        Ok(Self {
            scrub_pattern,
            client_id: config.client_id.clone(),
            account_name: config.account_name.clone(),
            metadata_paths,
            tenant_id: config.tenant_id.clone(),
            event_source_re: Regex::new(EVENT_SOURCE_PATTERN)
                .expect("event source pattern must be valid"),
        })
    }

    /// Transform one raw JSON payload into normalized entries.
    ///
    /// Malformed payloads and non-object payloads produce an empty list; a
    /// failure while building one entry skips that record and keeps the
    /// rest of the batch. Output order matches input order.
    pub fn transform(&self, payload: &str) -> Vec<LogEntry> {
        let parsed = match serde_json::from_str::<Value>(payload) {
            Ok(value) => json::normalize(value),
            Err(err) => {
                tracing::warn!(error = %err, "discarding malformed payload");
                return Vec::new();
            }
        };
        let Value::Object(ref top) = parsed else {
            tracing::warn!("discarding non-object payload");
            return Vec::new();
        };

        let records: Vec<&Value> = match top.get(RECORDS_PROPERTY) {
            Some(Value::Array(items)) => items.iter().filter(|item| item.is_object()).collect(),
            _ => vec![&parsed],
        };

        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            match self.create_entry(record) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping record that failed to build");
                }
            }
        }
        entries
    }

    /// Build one normalized entry from a single record.
    fn create_entry(&self, record: &Value) -> Result<LogEntry, AdapterError> {
        let event: RawEvent = serde_json::from_value(record.clone())?;

        let resource_id = self.identity(&event);
        let timestamp = event.time.as_deref().map(parse_epoch_seconds);
        let message = self.resolve_message(&event, record)?;
        let metadata = self.metadata(&event, record);

        Ok(LogEntry {
            message,
            timestamp,
            resource_id,
            metadata,
        })
    }

    /// Exactly one classification branch applies: activity events get the
    /// client ID and cloud category (plus the account name when configured),
    /// resource events get the resource ID.
    fn identity(&self, event: &RawEvent) -> BTreeMap<String, String> {
        let mut identity = BTreeMap::new();
        if self.is_activity(event) {
            identity.insert(
                CLIENT_ID_KEY.to_string(),
                self.client_id.clone().unwrap_or_default(),
            );
            identity.insert(
                CLOUD_CATEGORY_KEY.to_string(),
                CLOUD_CATEGORY_VALUE.to_string(),
            );
            if let Some(account) = &self.account_name {
                identity.insert(ACCOUNT_NAME_KEY.to_string(), account.clone());
            }
        } else {
            identity.insert(
                RESOURCE_ID_KEY.to_string(),
                event.resource_id.clone().unwrap_or_default(),
            );
        }
        identity
    }

    fn is_activity(&self, event: &RawEvent) -> bool {
        event
            .category
            .as_deref()
            .is_some_and(|category| AUDIT_CATEGORIES.contains(category.to_lowercase().as_str()))
    }

    /// First match wins: properties.message, then properties.description,
    /// then the whole normalized record re-serialized. The scrub pattern, if
    /// configured, is applied to whichever branch produced the message.
    fn resolve_message(&self, event: &RawEvent, record: &Value) -> Result<String, AdapterError> {
        let properties = event.properties();
        let message = match properties
            .as_ref()
            .and_then(|props| props.message.clone())
            .or_else(|| properties.as_ref().and_then(|props| props.description.clone()))
        {
            Some(text) => text,
            None => serde_json::to_string(record)?,
        };
        Ok(match &self.scrub_pattern {
            Some(pattern) => pattern.replace_all(&message, "").into_owned(),
            None => message,
        })
    }

    /// Metadata assembly, later merges winning on key collision:
    /// getter-derived entries, then static constants, then deep-path
    /// extraction, then the tenant ID.
    fn metadata(&self, event: &RawEvent, record: &Value) -> BTreeMap<String, String> {
        let mut metadata = BTreeMap::new();

        let getters: [(&str, Option<String>); 4] = [
            (SEVERITY_KEY, event.level.clone()),
            (ACTIVITY_TYPE_KEY, event.operation_name.clone()),
            (CATEGORY_KEY, event.category.clone()),
            (
                EVENT_SOURCE_KEY,
                event.resource_id.as_deref().map(|id| self.event_source(id)),
            ),
        ];
        for (key, value) in getters {
            if let Some(value) = value {
                if !value.trim().is_empty() {
                    metadata.insert(key.to_string(), value);
                }
            }
        }

        for (key, value) in STATIC_METADATA.entries() {
            metadata.insert((*key).to_string(), (*value).to_string());
        }

        if !self.metadata_paths.is_empty() {
            metadata.extend(extract::extract(record, &self.metadata_paths));
        }

        if let Some(tenant) = &self.tenant_id {
            metadata.insert(TENANT_ID_KEY.to_string(), tenant.clone());
        }

        metadata
    }

    /// Derive the provider/resource-type segment from an Azure resource ID,
    /// or an empty string when the ID does not match the fixed structure.
    fn event_source(&self, resource_id: &str) -> String {
        self.event_source_re
            .captures(resource_id)
            .and_then(|captures| captures.get(1))
            .map(|segment| segment.as_str().to_string())
            .unwrap_or_default()
    }
}

/// Parse an ISO-8601 instant into epoch seconds, falling back to the
/// current wall-clock time when the field is present but unparseable.
fn parse_epoch_seconds(time: &str) -> i64 {
    DateTime::parse_from_rfc3339(time)
        .map(|instant| instant.timestamp())
        .unwrap_or_else(|err| {
            tracing::debug!(time, error = %err, "unparseable event time, using current time");
            Utc::now().timestamp()
        })
}

/// Distinct routing values across a batch of entries: the resource ID where
/// present, otherwise the client ID. Used for transport-side diagnostics.
pub fn resource_ids(entries: &[LogEntry]) -> BTreeSet<String> {
    entries
        .iter()
        .filter_map(|entry| {
            entry
                .resource_id
                .get(RESOURCE_ID_KEY)
                .or_else(|| entry.resource_id.get(CLIENT_ID_KEY))
        })
        .cloned()
        .collect()
}
