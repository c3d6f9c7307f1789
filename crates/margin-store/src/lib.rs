//! The Margin annotation store.
//!
//! Threaded annotations (comments and comment replies) attached to versioned
//! documents, persisted as whole aggregates in an external key-value store. One aggregate per document and namespace, keyed
//! `comments:<docId>` and `comment-replies:<docId>`, read-modify-written in
//! full on every mutation.
//!
//! # Control flow
//!
//! Every public operation resolves the inbound handle to a canonical document
//! id first (read-only aliases exist), loads the affected aggregate, applies
//! the mutation, and saves the aggregate back. The copy operations are the
//! deliberate exception: they operate on identifiers as literally given.
//!
//! # Concurrency
//!
//! All operations are async and suspend at every store and resolver call.
//! There is no locking and no compare-and-swap; overlapping operations on the
//! same document race last-write-wins. Callers must not assume mutation
//! isolation.
//!
//! # Modules
//!
//! - [`error`] — [`StoreError`], [`ResolveError`] and result aliases
//! - [`resolve`] — [`AliasResolver`], [`ResolvedDocument`], in-memory resolver
//! - [`aggregate`] — Namespaced keys and whole-value aggregate access
//! - [`store`] — [`AnnotationStore`] and every public operation

pub mod aggregate;
pub mod error;
pub mod resolve;
pub mod store;

pub use aggregate::Namespace;
pub use error::{ResolveError, StoreError, StoreResult};
pub use resolve::{AliasResolver, InMemoryAliasResolver, ResolvedDocument, READ_ONLY_MARKER};
pub use store::AnnotationStore;
