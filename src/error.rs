//! Error types for scoreboard
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using ScoreError
pub type Result<T> = std::result::Result<T, ScoreError>;

/// Unified error type for scoreboard operations
#[derive(Debug, Error)]
pub enum ScoreError {
    // -------------------------------------------------------------------------
    // Persistence Errors
    // -------------------------------------------------------------------------
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Store corruption detected: {0}")]
    Corruption(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Invalid limit {0}: must be at least 1")]
    InvalidLimit(usize),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScoreError {
    /// Wrap an I/O failure from the persistence layer with some context
    pub(crate) fn storage(context: &str, err: std::io::Error) -> Self {
        ScoreError::StorageUnavailable(format!("{}: {}", context, err))
    }

    /// True if the persistence layer could not be reached
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, ScoreError::StorageUnavailable(_))
    }
}
