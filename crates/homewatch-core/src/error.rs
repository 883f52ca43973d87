//! Homewatch error taxonomy.
//!
//! Every failure the system can hit is a variant here, carrying structured
//! context (endpoint, status code, offending key) rather than pre-formatted
//! text — the `Display` impls are the single place wording lives.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HomewatchError>;

#[derive(Debug, Error)]
pub enum HomewatchError {
    /// One or more required secrets are absent. Fatal: raised once before
    /// the poll loop starts and never retried.
    #[error("missing required settings: {}", .names.join(", "))]
    MissingCredentials { names: Vec<String> },

    /// The request never produced an HTTP response (DNS, refused connection,
    /// timeout, TLS).
    #[error("request to {endpoint} (from_date={from_date}) failed: {reason}")]
    Transport {
        endpoint: String,
        from_date: i64,
        reason: String,
    },

    /// The API answered with a non-200 status code.
    #[error("request to {endpoint} (from_date={from_date}) returned HTTP {status}")]
    NotOkStatus {
        status: u16,
        endpoint: String,
        from_date: i64,
    },

    /// HTTP 200, but the body carries an application-level error marker.
    #[error("API at {endpoint} (from_date={from_date}) reported {field}={value}")]
    UpstreamReported {
        field: String,
        value: String,
        endpoint: String,
        from_date: i64,
    },

    /// The decoded payload has the wrong container shape.
    #[error("unexpected response shape: expected {expected}, got {actual}")]
    MalformedResponse {
        expected: &'static str,
        actual: String,
    },

    /// An expected key is absent from the payload.
    #[error("response is missing expected key `{key}`")]
    MissingField { key: String },

    /// The submission carries a status outside the recognized set.
    #[error("unrecognized review status: {status}")]
    UnrecognizedStatus { status: String },

    /// Messaging-channel failure. Swallowed by the notifier, never escapes
    /// the poll loop.
    #[error("channel error: {0}")]
    Channel(String),

    #[error("config error: {0}")]
    Config(String),
}
