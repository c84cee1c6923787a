//! Time zone identifier sent to the banking API as `X-Time-Zone`

use std::fmt;

use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// A time zone id such as `Europe/Rome`, `UTC` or `GMT+02:00`.
///
/// Only the shape is checked; the banking API is the authority on which
/// zones it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeZoneId(String);

impl TimeZoneId {
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::validation("Time zone cannot be empty"));
        }
        let well_formed = trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '+' | ':'));
        if !well_formed || trimmed.starts_with('/') || trimmed.ends_with('/') {
            return Err(Error::validation(format!("Invalid time zone: {}", trimmed)));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Resolve the zone for a single request.
    ///
    /// A missing or empty override keeps the fallback; a malformed override
    /// is logged and ignored.
    pub fn resolve(override_value: Option<&str>, fallback: &TimeZoneId) -> TimeZoneId {
        match override_value.map(str::trim).filter(|v| !v.is_empty()) {
            None => fallback.clone(),
            Some(raw) => match Self::parse(raw) {
                Ok(tz) => {
                    tracing::debug!(time_zone = %tz, "Time zone set from request");
                    tz
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid timezone header: {}. Using default timezone.",
                        raw
                    );
                    fallback.clone()
                }
            },
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimeZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TimeZoneId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TimeZoneId> for String {
    fn from(tz: TimeZoneId) -> Self {
        tz.0
    }
}
