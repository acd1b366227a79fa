use std::time::Duration;

use thiserror::Error;

/// Errors returned by review service operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network-level failure before a response was received.
    #[error("Cannot connect to review service at {endpoint}: {source}")]
    Connection {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The request did not complete within the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The service returned a non-success HTTP status.
    #[error("Review service returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Invalid response from review service: {0}")]
    InvalidResponse(String),

    /// The request was rejected before being sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Whether this error was caused by the request deadline expiring.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout(_))
    }

    /// HTTP status code, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ClientError>;
