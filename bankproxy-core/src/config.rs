//! Configuration management
//!
//! Read once at startup from `settings.json` in the config directory:
//! ```json
//! {
//!   "api": {
//!     "baseUrl": "https://sandbox.platfr.io",
//!     "authSchema": "S2S",
//!     "apiKey": "...",
//!     "accountId": 14537780,
//!     "timeZone": "Europe/Rome",
//!     "timeoutSecs": 30
//!   },
//!   "storage": { "database": "audit.duckdb" }
//! }
//! ```
//! Every value can be overridden with a `BANKPROXY_*` environment variable.
//! The resulting [`Config`] is immutable and handed to each component.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::result::{Error, Result};
use crate::domain::TimeZoneId;

pub const SETTINGS_FILE: &str = "settings.json";

const DEFAULT_BASE_URL: &str = "https://sandbox.platfr.io";
const DEFAULT_AUTH_SCHEMA: &str = "S2S";
const DEFAULT_TIME_ZONE: &str = "Europe/Rome";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DATABASE_FILE: &str = "bankproxy.duckdb";

pub const ENV_BASE_URL: &str = "BANKPROXY_BASE_URL";
pub const ENV_AUTH_SCHEMA: &str = "BANKPROXY_AUTH_SCHEMA";
pub const ENV_API_KEY: &str = "BANKPROXY_API_KEY";
pub const ENV_ACCOUNT_ID: &str = "BANKPROXY_ACCOUNT_ID";
pub const ENV_TIME_ZONE: &str = "BANKPROXY_TIME_ZONE";
pub const ENV_TIMEOUT_SECS: &str = "BANKPROXY_TIMEOUT_SECS";
pub const ENV_DATABASE: &str = "BANKPROXY_DATABASE";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    api: ApiSettings,
    #[serde(default)]
    storage: StorageSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSettings {
    base_url: Option<String>,
    auth_schema: Option<String>,
    api_key: Option<String>,
    account_id: Option<u64>,
    time_zone: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StorageSettings {
    database: Option<String>,
}

/// Connection settings for the banking API
#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_schema: String,
    pub api_key: String,
    pub account_id: u64,
    /// Default `X-Time-Zone`, used when a request does not override it
    pub time_zone: TimeZoneId,
    pub timeout: Duration,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("auth_schema", &self.auth_schema)
            .field("api_key", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("time_zone", &self.time_zone)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Process-wide configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database_path: PathBuf,
}

impl Config {
    /// Load config from the config directory and the process environment
    pub fn load(config_dir: &Path) -> Result<Self> {
        Self::load_with_env(config_dir, |key| std::env::var(key).ok())
    }

    /// Load config with an explicit environment lookup
    pub fn load_with_env<F>(config_dir: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings_path = config_dir.join(SETTINGS_FILE);

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).map_err(|e| {
                Error::config(format!("Invalid {}: {}", settings_path.display(), e))
            })?
        } else {
            SettingsFile::default()
        };

        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let base_url = lookup(ENV_BASE_URL)
            .or(raw.api.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let auth_schema = lookup(ENV_AUTH_SCHEMA)
            .or(raw.api.auth_schema)
            .unwrap_or_else(|| DEFAULT_AUTH_SCHEMA.to_string());
        let api_key = lookup(ENV_API_KEY)
            .or(raw.api.api_key)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                Error::config(format!("apiKey is required (settings.json or {})", ENV_API_KEY))
            })?;

        let account_id = match lookup(ENV_ACCOUNT_ID) {
            Some(value) => value.trim().parse::<u64>().map_err(|_| {
                Error::config(format!("{} must be a number, got '{}'", ENV_ACCOUNT_ID, value))
            })?,
            None => raw.api.account_id.ok_or_else(|| {
                Error::config(format!(
                    "accountId is required (settings.json or {})",
                    ENV_ACCOUNT_ID
                ))
            })?,
        };

        let time_zone_raw = lookup(ENV_TIME_ZONE)
            .or(raw.api.time_zone)
            .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string());
        let time_zone = TimeZoneId::parse(&time_zone_raw)
            .map_err(|_| Error::config(format!("Invalid timeZone: {}", time_zone_raw)))?;

        let timeout_secs = match lookup(ENV_TIMEOUT_SECS) {
            Some(value) => value.trim().parse::<u64>().map_err(|_| {
                Error::config(format!("{} must be a number, got '{}'", ENV_TIMEOUT_SECS, value))
            })?,
            None => raw.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        // Relative database paths are resolved against the config directory
        let database = lookup(ENV_DATABASE)
            .or(raw.storage.database)
            .unwrap_or_else(|| DEFAULT_DATABASE_FILE.to_string());
        let database_path = config_dir.join(database);

        Ok(Self {
            api: ApiConfig {
                base_url,
                auth_schema,
                api_key,
                account_id,
                time_zone,
                timeout: Duration::from_secs(timeout_secs),
            },
            database_path,
        })
    }
}
