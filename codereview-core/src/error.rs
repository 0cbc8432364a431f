//! Error types for code review operations

use thiserror::Error;

/// Result type alias for code review operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for code review operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The repository reference could not be resolved to an owner/name pair
    #[error("Invalid repository reference: {0}")]
    InvalidReference(String),

    /// The content provider reported that a listing or file does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The content provider rejected our credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The content provider returned a non-success response or was unreachable
    #[error("Upstream request failed: {detail}")]
    Upstream {
        /// HTTP status, when the provider answered at all
        status: Option<u16>,
        detail: String,
    },

    /// Inference backend error
    #[error("Inference backend error: {0}")]
    Backend(String),

    /// Cache store error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build an upstream error from a response status and body text
    pub fn upstream(status: u16, detail: impl Into<String>) -> Self {
        Error::Upstream {
            status: Some(status),
            detail: detail.into(),
        }
    }

    /// Classify a non-success response from the content provider
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        match status {
            404 => Error::NotFound(detail.into()),
            401 | 403 => Error::Unauthorized(detail.into()),
            _ => Error::upstream(status, detail),
        }
    }

    /// Whether the failure was caused by the caller's input rather than by us
    /// or a collaborator
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidReference(_))
    }
}
