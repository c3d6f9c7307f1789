use margin_kv::KvError;
use thiserror::Error;

/// Errors from alias resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The read-only handle has no registered canonical document.
    #[error("unknown read-only handle: {0}")]
    UnknownHandle(String),

    /// The resolver backend failed.
    #[error("resolver backend error: {0}")]
    Backend(String),
}

/// Errors from annotation store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An edit or state change named an entry that is not in the aggregate.
    /// Edits are not pre-validated; callers must guarantee the identifier
    /// exists or handle this error.
    #[error("entry not found: {id}")]
    EntryNotFound { id: String },

    /// Alias resolution failed; surfaced verbatim from the resolver.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The key-value store failed; surfaced verbatim.
    #[error("key-value store error: {0}")]
    Kv(#[from] KvError),

    /// A stored aggregate could not be decoded, or a record could not be
    /// encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for annotation store operations.
pub type StoreResult<T> = Result<T, StoreError>;
