//! Error types for webhook decoding and dispatch.

use thiserror::Error;

/// Result type for webhook operations.
pub type WebhookResult<T> = Result<T, WebhookError>;

/// Errors that can occur while building a handler or processing a payload.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// A custom field reuses the name of a base record field.
    #[error("schema conflict: custom field {field:?} collides with a base field")]
    SchemaConflict { field: String },

    /// The payload does not structurally match the envelope shape.
    #[error("decode error at {path}: {message}")]
    Decode { path: String, message: String },

    /// A reader was asked for a field its shape does not declare.
    #[error("unknown field: {field:?}")]
    UnknownField { field: String },

    /// A field value could not be projected as the requested type.
    #[error("type mismatch on field {field:?}: expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The `event_type` discriminator is not one this handler understands.
    #[error("unknown event type {0:?}")]
    UnknownEventType(String),

    /// A registered callback returned an error.
    #[error("callback failed: {0}")]
    Callback(#[source] anyhow::Error),

    /// Reading the request body failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WebhookError {
    pub(crate) fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        WebhookError::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns true if the error was caused by the payload itself rather than
    /// by handler setup or a callback.
    pub fn is_bad_payload(&self) -> bool {
        matches!(
            self,
            WebhookError::Decode { .. } | WebhookError::UnknownEventType(_)
        )
    }
}
