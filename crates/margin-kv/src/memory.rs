use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{KvError, KvResult};
use crate::traits::KeyValueStore;

/// In-memory, HashMap-based key-value store.
///
/// Intended for tests and embedding. All values are held behind a `RwLock`
/// and cloned on read. The store counts its operations so tests can assert
/// access patterns (e.g. a bulk insert performing exactly one read and one
/// write).
pub struct InMemoryKvStore {
    entries: RwLock<HashMap<String, Value>>,
    reads: AtomicU64,
    writes: AtomicU64,
    removes: AtomicU64,
}

impl InMemoryKvStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            removes: AtomicU64::new(0),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Remove all entries and reset the operation counters.
    pub fn clear(&self) {
        self.entries.write().expect("lock poisoned").clear();
        self.reset_counters();
    }

    /// Sorted list of all keys in the store.
    pub fn keys(&self) -> Vec<String> {
        let map = self.entries.read().expect("lock poisoned");
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Total `get` calls since construction or the last counter reset.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Total `set` calls since construction or the last counter reset.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Total `remove` calls since construction or the last counter reset.
    pub fn remove_count(&self) -> u64 {
        self.removes.load(Ordering::Relaxed)
    }

    /// Reset all operation counters to zero.
    pub fn reset_counters(&self) {
        self.reads.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
        self.removes.store(0, Ordering::Relaxed);
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> KvResult<Option<Value>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let map = self
            .entries
            .read()
            .map_err(|e| KvError::Backend(format!("lock poisoned: {e}")))?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> KvResult<()> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        let mut map = self
            .entries
            .write()
            .map_err(|e| KvError::Backend(format!("lock poisoned: {e}")))?;
        map.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> KvResult<()> {
        self.removes.fetch_add(1, Ordering::Relaxed);
        let mut map = self
            .entries
            .write()
            .map_err(|e| KvError::Backend(format!("lock poisoned: {e}")))?;
        map.remove(key);
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKvStore")
            .field("key_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_and_get_round_trip() {
        let store = InMemoryKvStore::new();
        store.set("comments:pad1", json!({"a": 1})).await.unwrap();

        let value = store.get("comments:pad1").await.unwrap();
        assert_eq!(value, Some(json!({"a": 1})));
    }

    #[tokio::test]
    async fn get_missing_key_returns_none() {
        let store = InMemoryKvStore::new();
        assert_eq!(store.get("comments:nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_replaces_whole_value() {
        let store = InMemoryKvStore::new();
        store.set("k", json!({"a": 1, "b": 2})).await.unwrap();
        store.set("k", json!({"c": 3})).await.unwrap();

        // No merging: the second write wins entirely.
        assert_eq!(store.get("k").await.unwrap(), Some(json!({"c": 3})));
    }

    #[tokio::test]
    async fn remove_deletes_key_and_ignores_absent() {
        let store = InMemoryKvStore::new();
        store.set("k", json!(1)).await.unwrap();

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);

        // Second remove is a no-op.
        store.remove("k").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn counters_track_operations() {
        let store = InMemoryKvStore::new();
        store.set("a", json!(1)).await.unwrap();
        store.set("b", json!(2)).await.unwrap();
        store.get("a").await.unwrap();
        store.remove("b").await.unwrap();

        assert_eq!(store.write_count(), 2);
        assert_eq!(store.read_count(), 1);
        assert_eq!(store.remove_count(), 1);

        store.reset_counters();
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.read_count(), 0);
        assert_eq!(store.remove_count(), 0);
    }

    #[tokio::test]
    async fn keys_are_sorted() {
        let store = InMemoryKvStore::new();
        store.set("comments:z", json!(1)).await.unwrap();
        store.set("comments:a", json!(2)).await.unwrap();
        store.set("comment-replies:a", json!(3)).await.unwrap();

        assert_eq!(
            store.keys(),
            vec!["comment-replies:a", "comments:a", "comments:z"]
        );
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let store = InMemoryKvStore::new();
        store.set("a", json!(1)).await.unwrap();
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn debug_format_names_the_store() {
        let store = InMemoryKvStore::new();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryKvStore"));
        assert!(debug.contains("key_count"));
    }
}
