//! Error types for feed harvesting

use thiserror::Error;

/// Errors that can occur while fetching or parsing sources
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Source answered with a non-success status
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status, or the provider's own status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Body could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Validator cache could not be read or written
    #[error("Cache error for {path}: {message}")]
    Cache {
        path: String,
        message: String,
    },

    /// Invalid fetcher configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FeedError {
    pub fn cache(path: impl Into<String>, message: impl ToString) -> Self {
        FeedError::Cache {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for feed operations
pub type FeedResult<T> = Result<T, FeedError>;
