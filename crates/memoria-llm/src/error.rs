//! Error types for model calls

use http::StatusCode;
use thiserror::Error;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by a model binding
#[derive(Debug, Error)]
pub enum ModelError {
    /// The upstream service answered with a non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http {
        /// Status returned by the upstream service
        status: StatusCode,
        /// Error body or description
        message: String,
    },

    /// The request never produced an HTTP response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The model answered with something that cannot be used
    #[error("Invalid model response: {0}")]
    InvalidResponse(String),

    /// Every attempt allowed by the retry policy failed
    #[error("Model call failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Error returned by the final attempt
        #[source]
        last: Box<ModelError>,
    },

    /// Model configuration could not be loaded
    #[error("Model configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ModelError {
    /// Create an HTTP status error
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create an invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}
