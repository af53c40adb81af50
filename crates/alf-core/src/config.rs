//! Configuration types for alf.
//!
//! [`Config::load`] layers `~/.config/alf/config.toml` (created with the
//! built-in defaults if missing) under `ALF_*` environment variables, which
//! is how function-app style deployments configure the engine.
//! [`Config::defaults`] returns the built-in defaults without touching the
//! filesystem or the environment (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::json;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
# scrub_regex   = "\\d{3}-\\d{2}-\\d{4}"
# client_id     = ""
# account_name  = ""
# metadata_keys = "resultType, callerIpAddress"
# tenant_id     = ""

[log]
level = "warn"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration. Every engine knob is optional; an all-`None`
/// config yields a pass-through adapter with no scrubbing, no activity
/// client ID, and no deep metadata extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Regular expression whose matches are removed from every message.
    #[serde(default)]
    pub scrub_regex: Option<String>,
    /// Azure application client ID, the activity-log identity value.
    #[serde(default)]
    pub client_id: Option<String>,
    /// Account name attached to activity-log identity when set.
    #[serde(default)]
    pub account_name: Option<String>,
    /// Comma-separated deep-path specifiers pulled into metadata.
    #[serde(default)]
    pub metadata_keys: Option<String>,
    /// Tenant ID from the execution environment, added to metadata when set.
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub log: LogConfig,
}

/// `[log]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String { "warn".to_string() }

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/alf/config.toml` layered under `ALF_*`
    /// environment variables (`ALF_SCRUB_REGEX`, `ALF_CLIENT_ID`,
    /// `ALF_ACCOUNT_NAME`, `ALF_METADATA_KEYS`, `ALF_TENANT_ID`,
    /// `ALF_LOG__LEVEL`). Creates the file with defaults if it does not
    /// exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .add_source(config::Environment::with_prefix("ALF").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(config.unwrap_quoted_values())
    }

    /// Load from an explicit file path layered over the built-in defaults,
    /// without reading the environment. Used by tests.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()?;
        Ok(config.unwrap_quoted_values())
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Function-app settings sometimes arrive with the value wrapped in an
    /// extra layer of quoting and escaping. Unwrap only when the quotes are
    /// actually there — unconditional unescaping would corrupt regex
    /// backslashes.
    fn unwrap_quoted_values(mut self) -> Self {
        self.scrub_regex = self.scrub_regex.map(unwrap_quoted);
        self.metadata_keys = self.metadata_keys.map(unwrap_quoted);
        self
    }
}

fn unwrap_quoted(value: String) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        json::unquote_and_unescape(&value)
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("alf")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
