//! Error types for the API client.

use marketplace_core::Error;
use thiserror::Error;

/// Result type alias for API client operations.
pub type Result<T> = std::result::Result<T, ApiClientError>;

/// Errors that can occur while talking to the catalog API.
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// Transport failure: connection, timeout, TLS.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A success response whose body did not match the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success status. `message` is already user-facing.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request could not be built (bad base URL and the like)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiClientError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<ApiClientError> for Error {
    fn from(err: ApiClientError) -> Self {
        match err {
            ApiClientError::Api {
                status: 404,
                message,
            } => Error::NotFound(message),
            ApiClientError::Api { status, message } => Error::Api { status, message },
            ApiClientError::Http(e) => Error::Network(e.to_string()),
            ApiClientError::Json(e) => Error::Decode(e.to_string()),
            ApiClientError::InvalidRequest(message) => Error::Unexpected(message),
        }
    }
}
