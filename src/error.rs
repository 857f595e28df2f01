//! Error types for submission-relay
//!
//! Each pipeline phase has its own error enum so the orchestrator can tell
//! which step failed:
//! - [`FetchError`] for the submission download
//! - [`StoreError`] for the object-store upload (connect, write, close)
//! - [`DeliveryError`] for the status email
//! - [`AuditError`] for the audit table write
//! - [`EventError`] for the inbound notification
//!
//! None of these reach the invocation's caller. They are logged and folded
//! into a [`MailStatus`](crate::types::MailStatus) or into the audit record.
//! The crate-level [`Error`] is only returned while building configuration and
//! clients at startup.

use thiserror::Error;

/// Result type alias for submission-relay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for submission-relay
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The environment variable that caused the error (e.g., "BUCKET")
        key: Option<String>,
    },

    /// Download phase failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Upload phase failed
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Mail delivery failed
    #[error("delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// Audit write failed
    #[error("audit error: {0}")]
    Audit(#[from] AuditError),

    /// Inbound notification could not be read
    #[error("event error: {0}")]
    Event(#[from] EventError),

    /// HTTP client could not be built
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl Error {
    /// Shorthand for a configuration error tied to one environment variable
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}

/// Submission download errors
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request could not be completed (DNS, connect, timeout)
    #[error("failed to fetch {url}: {reason}")]
    Transport {
        /// The URL that was requested
        url: String,
        /// The underlying transport failure
        reason: String,
    },

    /// Server answered with a non-success status
    #[error("HTTP error fetching {url}: {status}")]
    HttpStatus {
        /// The URL that was requested
        url: String,
        /// The status code returned by the server
        status: u16,
    },

    /// Declared content type is not the expected archive media type
    #[error("unsupported content type {found:?} from {url}, expected {expected}")]
    UnsupportedContentType {
        /// The URL that was requested
        url: String,
        /// The media type the relay accepts
        expected: String,
        /// The `Content-Type` header the server sent, if any
        found: Option<String>,
    },

    /// Body could not be fully read after the headers were accepted
    #[error("failed to read response body from {url}: {reason}")]
    Read {
        /// The URL that was requested
        url: String,
        /// The underlying read failure
        reason: String,
    },
}

/// Object-store upload errors, one per phase of the upload
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not authenticate or open a session with the store
    #[error("failed to connect to object store: {0}")]
    Connect(String),

    /// The store rejected or dropped the object write
    #[error("failed to write object {path}: {reason}")]
    Write {
        /// Object key being written
        path: String,
        /// The reason the write failed
        reason: String,
    },

    /// The write could not be finalized or its acknowledgement was inconsistent
    #[error("failed to finalize object {path}: {reason}")]
    Close {
        /// Object key being finalized
        path: String,
        /// The reason finalization failed
        reason: String,
    },
}

/// Mail delivery error
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The provider could not be reached
    #[error("failed to reach mail provider: {0}")]
    Transport(String),

    /// The provider refused the message
    #[error("mail provider returned status {status}: {body}")]
    Rejected {
        /// HTTP status returned by the provider
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The provider accepted the request but its answer was unreadable
    #[error("unreadable mail provider response: {0}")]
    InvalidResponse(String),
}

/// Audit table write errors
#[derive(Debug, Error)]
pub enum AuditError {
    /// Record could not be converted into a table item
    #[error("failed to marshal audit record: {0}")]
    Marshal(String),

    /// The table rejected the put
    #[error("failed to put audit record into {table}: {reason}")]
    Put {
        /// Target table name
        table: String,
        /// The reason the put failed
        reason: String,
    },
}

/// Inbound notification errors
#[derive(Debug, Error)]
pub enum EventError {
    /// The notification envelope carried no records
    #[error("notification contained no records")]
    NoRecords,

    /// The message body was not a valid submission event
    #[error("malformed submission event: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required field of the submission event was empty or blank
    #[error("submission event is missing {0}")]
    MissingField(&'static str),
}
