//! alf-core — event normalization engine for alf ("Azure Log Funnel").
//!
//! Ingests heterogeneous Azure log/event JSON payloads and normalizes them
//! into uniform [`LogEntry`] values for the ingestion backend. The engine is
//! a pure, stateless function of `(payload, configuration)`: no I/O, no
//! shared mutable state, safe to share across threads.
//!
//! # Architecture
//!
//! ```text
//! payload ──► json (sanitize) ──► adapter (unwrap, classify, build)
//!                                     │
//!                                     └──► extract ──► flatten
//! ```
//!
//! Transport to the backend, credential loading, and trigger plumbing are
//! external collaborators; they call [`EventAdapter::transform`] and own the
//! returned entries.

pub mod adapter;
pub mod config;
pub mod extract;
pub mod flatten;
pub mod json;
pub mod types;

pub use adapter::{AdapterError, EventAdapter};
pub use config::Config;
pub use types::{EventProperties, LogEntry, RawEvent};
