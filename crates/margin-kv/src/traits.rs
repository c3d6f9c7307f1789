use async_trait::async_trait;
use serde_json::Value;

use crate::error::KvResult;

/// Whole-value key-value store.
///
/// All implementations must satisfy these invariants:
/// - Values are opaque to the store; it never interprets their contents.
/// - `set` replaces the entire value for a key; there are no partial updates.
/// - `remove` of an absent key is a no-op, not an error.
/// - No atomicity across calls: a read-modify-write sequence by one caller
///   can be interleaved with another's, and the later `set` wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    async fn get(&self, key: &str) -> KvResult<Option<Value>>;

    /// Write `value` under `key`, replacing any prior value.
    async fn set(&self, key: &str, value: Value) -> KvResult<()>;

    /// Delete `key` entirely. Absent keys are ignored.
    async fn remove(&self, key: &str) -> KvResult<()>;
}
