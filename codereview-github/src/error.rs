//! Error types for GitHub operations

use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during GitHub operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication error
    #[error("GitHub authentication error: {0}")]
    Auth(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<Error> for codereview_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Auth(msg) => codereview_core::Error::Unauthorized(msg),
            Error::Http(e) => codereview_core::Error::Upstream {
                status: e.status().map(|s| s.as_u16()),
                detail: e.to_string(),
            },
            Error::Parse(msg) => codereview_core::Error::Upstream {
                status: None,
                detail: msg,
            },
        }
    }
}
