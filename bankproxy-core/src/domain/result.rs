//! Result and error types for the core library

use thiserror::Error;

use super::envelope::Envelope;

/// Error code for failures reported by (or while talking to) the banking API
pub const CODE_REQUEST_FAILED: &str = "REQ001";
/// Error code for rejected inbound input
pub const CODE_VALIDATION: &str = "VAL001";
/// Error code for an invalid argument, such as a bad date range
pub const CODE_INVALID_ARGUMENT: &str = "VAL002";
/// Error code for an unreadable inbound request body
pub const CODE_UNREADABLE_REQUEST: &str = "VAL003";
/// Error code for everything else
pub const CODE_SYSTEM: &str = "SYS001";

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    /// The banking API answered with an empty body (or an OK envelope without payload)
    #[error("Null response received from API")]
    NullEnvelope,

    /// The banking API answered with status KO
    #[error("{0}")]
    RemoteBusiness(String),

    /// Transport failure, non-2xx status or undecodable response
    #[error("Remote call failed: {0}")]
    RemoteCall(String),

    /// Generic wrapper used by the read operations (balance, transactions)
    #[error("{message}")]
    BankingService {
        message: String,
        #[source]
        source: Box<Error>,
    },

    /// Audit store failure
    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Inbound argument rejected outside field validation (date ranges)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a remote business error (status KO)
    pub fn remote_business(msg: impl Into<String>) -> Self {
        Self::RemoteBusiness(msg.into())
    }

    /// Create a remote call error
    pub fn remote_call(msg: impl Into<String>) -> Self {
        Self::RemoteCall(msg.into())
    }

    /// Wrap any failure of a read operation
    pub fn banking_service(message: impl Into<String>, source: Error) -> Self {
        Self::BankingService {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Client-facing error code
    pub fn code(&self) -> &'static str {
        match self {
            Error::BankingService { .. }
            | Error::RemoteBusiness(_)
            | Error::NullEnvelope
            | Error::RemoteCall(_) => CODE_REQUEST_FAILED,
            Error::Validation(_) => CODE_VALIDATION,
            Error::InvalidArgument(_) => CODE_INVALID_ARGUMENT,
            Error::Json(_) => CODE_UNREADABLE_REQUEST,
            _ => CODE_SYSTEM,
        }
    }

    /// Client-facing description. Internal failures are not leaked.
    pub fn client_description(&self) -> String {
        match self {
            Error::Validation(msg) | Error::InvalidArgument(msg) => msg.clone(),
            Error::Json(_) => "Invalid request format".to_string(),
            Error::Database(_) | Error::Config(_) | Error::Io(_) => {
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Render as the `{status: "KO", errors: [...]}` envelope
    pub fn to_envelope(&self) -> Envelope<()> {
        Envelope::failure(self.code(), self.client_description())
    }
}

impl From<duckdb::Error> for Error {
    fn from(e: duckdb::Error) -> Self {
        Self::Database(e.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
