//! Domain-specific assertions for alf harnesses.
//!
//! These wrap `pretty_assertions` with failure messages that name the
//! classification invariant being checked, so a red test points straight at
//! the violated rule rather than at a map diff.

use alf_core::adapter::{
    ACCOUNT_NAME_KEY, CLIENT_ID_KEY, CLOUD_CATEGORY_KEY, CLOUD_CATEGORY_VALUE, RESOURCE_ID_KEY,
};
use alf_core::LogEntry;
use pretty_assertions::assert_eq;

/// The entry was classified as an activity event: client-ID and cloud
/// category keys present, resource-ID key absent.
pub fn assert_activity_identity(entry: &LogEntry, client_id: &str) {
    assert_eq!(
        entry.resource_id.get(CLIENT_ID_KEY).map(String::as_str),
        Some(client_id),
        "activity entry must carry the client ID"
    );
    assert_eq!(
        entry.resource_id.get(CLOUD_CATEGORY_KEY).map(String::as_str),
        Some(CLOUD_CATEGORY_VALUE),
        "activity entry must carry the fixed cloud category"
    );
    assert!(
        !entry.resource_id.contains_key(RESOURCE_ID_KEY),
        "activity entry must never carry the resource-ID key: {:?}",
        entry.resource_id
    );
}

/// The entry was classified as a resource event: resource-ID key present,
/// activity keys absent.
pub fn assert_resource_identity(entry: &LogEntry, resource_id: &str) {
    assert_eq!(
        entry.resource_id.get(RESOURCE_ID_KEY).map(String::as_str),
        Some(resource_id),
        "resource entry must carry the resource ID"
    );
    for key in [CLIENT_ID_KEY, CLOUD_CATEGORY_KEY, ACCOUNT_NAME_KEY] {
        assert!(
            !entry.resource_id.contains_key(key),
            "resource entry must never carry activity key {key}: {:?}",
            entry.resource_id
        );
    }
}

pub fn assert_metadata(entry: &LogEntry, key: &str, expected: &str) {
    assert_eq!(
        entry.metadata.get(key).map(String::as_str),
        Some(expected),
        "expected metadata {key}={expected}"
    );
}

pub fn assert_no_metadata(entry: &LogEntry, key: &str) {
    assert!(
        !entry.metadata.contains_key(key),
        "metadata must not contain {key}: {:?}",
        entry.metadata
    );
}
