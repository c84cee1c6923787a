//! Response validation - turns a raw envelope into its payload or an error

use crate::domain::result::{Error, Result};
use crate::domain::Envelope;

/// Message used when a KO envelope carries no error description
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

/// Unwrap the payload of a remote envelope.
///
/// - no envelope (empty body) → [`Error::NullEnvelope`]
/// - status other than `OK` → [`Error::RemoteBusiness`] with the first
///   error's description
/// - `OK` without payload → [`Error::NullEnvelope`]
pub fn validate<T>(envelope: Option<Envelope<T>>) -> Result<T> {
    let envelope = envelope.ok_or(Error::NullEnvelope)?;

    if !envelope.is_ok() {
        let message = envelope
            .first_error_description()
            .unwrap_or(UNKNOWN_ERROR_MESSAGE);
        return Err(Error::remote_business(message));
    }

    envelope.payload.ok_or(Error::NullEnvelope)
}
