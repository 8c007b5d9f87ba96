// Store-level error type shared by every adapter implementation.
//
// Route handlers own their user-facing error enums; `StoreError` only
// describes why a statement against the backing store failed.

use thiserror::Error;

/// Failure raised by an [`Adapter`](crate::db::adapter::Adapter) operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
