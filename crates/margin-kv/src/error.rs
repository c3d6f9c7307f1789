use thiserror::Error;

/// Errors from key-value store operations.
#[derive(Debug, Error)]
pub enum KvError {
    /// The storage backend failed (lock poisoning, connection loss, ...).
    #[error("backend error: {0}")]
    Backend(String),

    /// I/O error from a persistent backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for key-value store operations.
pub type KvResult<T> = Result<T, KvError>;
