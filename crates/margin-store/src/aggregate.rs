//! Aggregate access: whole-value load/save/remove of a document's comment or
//! reply map.
//!
//! The underlying store only supports whole-value operations per key, so a
//! document's annotations are denormalized into one JSON value per namespace
//! and round-tripped in full on every mutation. An absent aggregate is
//! equivalent to an empty map, never an error.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use margin_kv::KeyValueStore;
use margin_types::DocumentId;

use crate::error::StoreResult;

/// The two identifier namespaces an aggregate can belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Namespace {
    Comments,
    Replies,
}

impl Namespace {
    /// Storage key for this namespace and document:
    /// `comments:<docId>` or `comment-replies:<docId>`.
    pub fn key(&self, doc: &DocumentId) -> String {
        format!("{self}:{doc}")
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comments => write!(f, "comments"),
            Self::Replies => write!(f, "comment-replies"),
        }
    }
}

/// Load the aggregate for `doc` in `ns`, defaulting to empty when absent.
pub(crate) async fn load<S, M>(kv: &S, ns: Namespace, doc: &DocumentId) -> StoreResult<M>
where
    S: KeyValueStore + ?Sized,
    M: DeserializeOwned + Default,
{
    match kv.get(&ns.key(doc)).await? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(M::default()),
    }
}

/// Persist the whole aggregate, replacing any prior value.
pub(crate) async fn save<S, M>(kv: &S, ns: Namespace, doc: &DocumentId, map: &M) -> StoreResult<()>
where
    S: KeyValueStore + ?Sized,
    M: Serialize,
{
    kv.set(&ns.key(doc), serde_json::to_value(map)?).await?;
    Ok(())
}

/// Delete the aggregate key entirely.
pub(crate) async fn remove<S>(kv: &S, ns: Namespace, doc: &DocumentId) -> StoreResult<()>
where
    S: KeyValueStore + ?Sized,
{
    kv.remove(&ns.key(doc)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use margin_kv::InMemoryKvStore;
    use margin_types::{CommentId, CommentMap, NewComment};

    #[test]
    fn namespace_keys_match_the_storage_layout() {
        let doc = DocumentId::from("pad1");
        assert_eq!(Namespace::Comments.key(&doc), "comments:pad1");
        assert_eq!(Namespace::Replies.key(&doc), "comment-replies:pad1");
    }

    #[tokio::test]
    async fn absent_aggregate_loads_as_empty_map() {
        let kv = InMemoryKvStore::new();
        let doc = DocumentId::from("pad1");
        let map: CommentMap = load(&kv, Namespace::Comments, &doc).await.unwrap();
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let kv = InMemoryKvStore::new();
        let doc = DocumentId::from("pad1");

        let mut map = CommentMap::new();
        map.insert(CommentId::new("c-one"), NewComment::new("hi").into_record());
        save(&kv, Namespace::Comments, &doc, &map).await.unwrap();

        let back: CommentMap = load(&kv, Namespace::Comments, &doc).await.unwrap();
        assert_eq!(back, map);
    }

    #[tokio::test]
    async fn remove_deletes_the_whole_aggregate() {
        let kv = InMemoryKvStore::new();
        let doc = DocumentId::from("pad1");

        let mut map = CommentMap::new();
        map.insert(CommentId::new("c-one"), NewComment::new("hi").into_record());
        save(&kv, Namespace::Comments, &doc, &map).await.unwrap();

        remove(&kv, Namespace::Comments, &doc).await.unwrap();
        let back: CommentMap = load(&kv, Namespace::Comments, &doc).await.unwrap();
        assert!(back.is_empty());
    }

    #[tokio::test]
    async fn namespaces_do_not_collide() {
        let kv = InMemoryKvStore::new();
        let doc = DocumentId::from("pad1");

        let mut map = CommentMap::new();
        map.insert(CommentId::new("c-one"), NewComment::new("hi").into_record());
        save(&kv, Namespace::Comments, &doc, &map).await.unwrap();

        let replies: margin_types::ReplyMap =
            load(&kv, Namespace::Replies, &doc).await.unwrap();
        assert!(replies.is_empty());
    }
}
