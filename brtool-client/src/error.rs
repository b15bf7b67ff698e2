//! Baserow API error types.

use thiserror::Error;

/// Result type for Baserow API operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur when talking to a Baserow instance.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns true if the instance rejected the API token.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            ClientError::Api { status, .. } => *status == 401,
            ClientError::Http(e) => e.status().is_some_and(|s| s.as_u16() == 401),
            _ => false,
        }
    }

    /// HTTP status code, if the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
