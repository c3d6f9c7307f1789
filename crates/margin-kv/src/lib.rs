//! Key-value storage boundary for Margin.
//!
//! The annotation store persists whole aggregates (one JSON value per
//! document and namespace) through the [`KeyValueStore`] trait. The store
//! offers nothing beyond whole-value `get`/`set`/`remove`: no field-level
//! updates, no transactions, no compare-and-swap. Everything built on top of
//! it therefore works read-modify-write over entire values, and concurrent
//! writers to the same key race last-write-wins.
//!
//! # Modules
//!
//! - [`error`] — Error types for store operations
//! - [`traits`] — The [`KeyValueStore`] trait defining the storage interface
//! - [`memory`] — In-memory [`InMemoryKvStore`] for tests and embedding

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{KvError, KvResult};
pub use memory::InMemoryKvStore;
pub use traits::KeyValueStore;
