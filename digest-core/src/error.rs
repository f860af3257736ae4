//! Error types for the digest

use thiserror::Error;

/// Digest-wide error type
#[derive(Error, Debug)]
pub enum DigestError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DigestError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        DigestError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        DigestError::Config(msg.into())
    }
}

/// Result type alias for digest operations
pub type DigestResult<T> = Result<T, DigestError>;
