//! Alias resolution: turning an inbound document handle into the canonical
//! writable document identifier.
//!
//! Callers may address a document through a read-only alias. Every public
//! store operation resolves the handle first (the copy operations excepted,
//! by contract) and forms storage keys only from the canonical id. The
//! resolver's full answer, canonical id plus alias metadata, is passed
//! through to callers untouched, since transport layers need more than the
//! bare id.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use margin_types::DocumentId;

use crate::error::ResolveError;

/// Marker that distinguishes read-only handles from canonical ones.
pub const READ_ONLY_MARKER: &str = "r.";

/// A resolved document handle: the canonical id plus alias metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDocument {
    /// Canonical writable document identifier. All storage keys are formed
    /// from this, never from the handle the caller supplied.
    pub id: DocumentId,
    /// The read-only alias, when one is known for this document.
    pub read_only_id: Option<String>,
    /// Whether the caller addressed the document through a read-only handle.
    pub read_only: bool,
}

impl ResolvedDocument {
    /// A document addressed directly by its canonical id.
    pub fn direct(id: DocumentId) -> Self {
        Self {
            id,
            read_only_id: None,
            read_only: false,
        }
    }
}

/// Resolves document handles to canonical identifiers.
///
/// Resolution failures are propagated to store callers verbatim; the store
/// adds no validation of its own.
#[async_trait]
pub trait AliasResolver: Send + Sync {
    async fn resolve(&self, handle: &str) -> Result<ResolvedDocument, ResolveError>;
}

/// In-memory alias resolver for tests and embedding.
///
/// Handles starting with [`READ_ONLY_MARKER`] must have been registered via
/// [`register`](Self::register); anything else resolves to itself.
#[derive(Debug, Default)]
pub struct InMemoryAliasResolver {
    aliases: RwLock<HashMap<String, DocumentId>>,
}

impl InMemoryAliasResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a read-only alias for a canonical document.
    pub fn register(&self, read_only_handle: impl Into<String>, canonical: DocumentId) {
        self.aliases
            .write()
            .expect("lock poisoned")
            .insert(read_only_handle.into(), canonical);
    }
}

#[async_trait]
impl AliasResolver for InMemoryAliasResolver {
    async fn resolve(&self, handle: &str) -> Result<ResolvedDocument, ResolveError> {
        if !handle.starts_with(READ_ONLY_MARKER) {
            return Ok(ResolvedDocument::direct(DocumentId::from(handle)));
        }

        let aliases = self
            .aliases
            .read()
            .map_err(|e| ResolveError::Backend(format!("lock poisoned: {e}")))?;
        let canonical = aliases
            .get(handle)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownHandle(handle.to_string()))?;
        Ok(ResolvedDocument {
            id: canonical,
            read_only_id: Some(handle.to_string()),
            read_only: true,
        })
    }
}
