//! Core error types for the marketplace client.
//!
//! This module defines transport-agnostic error types. Client-specific errors
//! (reqwest, JSON decoding, HTTP status codes) are converted to these types by
//! the `api` crate.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the marketplace client.
///
/// Every failure is scoped to the request that produced it. None of these
/// variants is fatal: listings collapse them into an empty result, the detail
/// path maps them onto a not-found or load-error view.
#[derive(Error, Debug)]
pub enum Error {
    /// Non-success HTTP status. `message` is the server's `error` field, or
    /// `API error: <status>` when the body could not be read.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Preference store error: {0}")]
    Preferences(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Create an API error from status and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether this error means "the thing does not exist" rather than
    /// "we could not reach it".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Api { status: 404, .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Preferences(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
