//! Error types for store operations

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing the counter store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("counter overflow for {key}")]
    CounterOverflow { key: String },
}

impl From<crate::utils::atomic::AtomicError> for StoreError {
    fn from(e: crate::utils::atomic::AtomicError) -> Self {
        match e {
            crate::utils::atomic::AtomicError::Io(io) => StoreError::Io(io),
        }
    }
}
