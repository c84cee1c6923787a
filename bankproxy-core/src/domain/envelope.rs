//! Response envelope shared by every banking API call
//!
//! ```json
//! { "status": "OK", "errors": [], "payload": { ... } }
//! { "status": "KO", "errors": [{ "code": "API000", "description": "...", "params": "" }], "payload": {} }
//! ```
//!
//! A KO envelope usually carries an empty object as payload, which would not
//! decode into the typed payload. Deserialization therefore goes through
//! [`RawEnvelope`] and only decodes the payload when the status is OK.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub const STATUS_OK: &str = "OK";
pub const STATUS_KO: &str = "KO";

/// Error entry inside an envelope
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub params: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            description: Some(description.into()),
            params: None,
        }
    }
}

/// Uniform response wrapper: status, ordered errors, payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    bound(serialize = "T: Serialize", deserialize = "T: DeserializeOwned"),
    try_from = "RawEnvelope"
)]
pub struct Envelope<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
}

impl<T> Envelope<T> {
    /// Successful envelope around a payload
    pub fn ok(payload: T) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            errors: Vec::new(),
            payload: Some(payload),
        }
    }

    /// Failed envelope with the given errors
    pub fn ko(errors: Vec<ApiError>) -> Self {
        Self {
            status: STATUS_KO.to_string(),
            errors,
            payload: None,
        }
    }

    /// Failed envelope with a single error
    pub fn failure(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::ko(vec![ApiError::new(code, description)])
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Description of the first error, if the remote sent one
    pub fn first_error_description(&self) -> Option<&str> {
        self.errors.first().and_then(|e| e.description.as_deref())
    }
}

/// Envelope as it appears on the wire, payload still undecoded
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Option<Vec<ApiError>>,
    #[serde(default)]
    payload: JsonValue,
}

impl<T: DeserializeOwned> TryFrom<RawEnvelope> for Envelope<T> {
    type Error = serde_json::Error;

    fn try_from(raw: RawEnvelope) -> Result<Self, Self::Error> {
        let status = raw.status.unwrap_or_default();
        let payload = if status == STATUS_OK && !raw.payload.is_null() {
            Some(serde_json::from_value(raw.payload)?)
        } else {
            None
        };

        Ok(Self {
            status,
            errors: raw.errors.unwrap_or_default(),
            payload,
        })
    }
}
