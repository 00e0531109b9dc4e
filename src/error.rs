//! Error types shared across the crate.

use thiserror::Error;

/// Errors that can occur while loading or saving application state.
#[derive(Debug, Error)]
pub enum TodorError {
    /// Filesystem access failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// (De)serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TodorError>;
