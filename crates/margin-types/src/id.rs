use std::fmt;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Reserved prefix that marks an identifier as belonging to the reply
/// namespace. Comment identifiers never start with this prefix (the comment
/// generator's output is assumed namespace-disjoint).
pub const REPLY_PREFIX: &str = "c-reply";

/// Length of the random suffix in generated comment and reply identifiers.
const RANDOM_SUFFIX_LEN: usize = 16;

/// A fixed-length random alphanumeric string.
pub fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Canonical identifier of a writable document.
///
/// Callers may hold read-only aliases to a document; those are plain strings
/// until the alias resolver turns them into a `DocumentId`. Storage keys are
/// only ever formed from canonical identifiers.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a top-level comment.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(String);

impl CommentId {
    /// Wrap an identifier as given. Used when a caller supplies an existing
    /// comment id (document duplication) — the id is not re-generated.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommentId({})", self.0)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a comment reply. Always starts with [`REPLY_PREFIX`].
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplyId(String);

impl ReplyId {
    /// Generate a fresh reply identifier: the reserved prefix followed by a
    /// random suffix. Reply ids are never supplied by callers.
    pub fn generate() -> Self {
        Self(format!(
            "{}-{}",
            REPLY_PREFIX,
            random_string(RANDOM_SUFFIX_LEN)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ReplyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReplyId({})", self.0)
    }
}

impl fmt::Display for ReplyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An annotation identifier tagged with its namespace.
///
/// The namespace is decided once, here, by inspecting the raw string for the
/// reserved reply prefix. Anything that does not carry the prefix routes to
/// the comments namespace. This is a convention, not a validated invariant,
/// so malformed identifiers route to comments by default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryId {
    Comment(CommentId),
    Reply(ReplyId),
}

impl EntryId {
    /// Parse a raw identifier, routing by the reserved prefix.
    pub fn from_raw(raw: &str) -> Self {
        if raw.starts_with(REPLY_PREFIX) {
            Self::Reply(ReplyId(raw.to_string()))
        } else {
            Self::Comment(CommentId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Comment(id) => id.as_str(),
            Self::Reply(id) => id.as_str(),
        }
    }

    pub fn is_reply(&self) -> bool {
        matches!(self, Self::Reply(_))
    }
}

impl From<CommentId> for EntryId {
    fn from(id: CommentId) -> Self {
        Self::Comment(id)
    }
}

impl From<ReplyId> for EntryId {
    fn from(id: ReplyId) -> Self {
        Self::Reply(id)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Source of fresh comment identifiers.
///
/// The store treats comment id generation as an external concern: any
/// implementation is acceptable as long as its output is collision-resistant
/// and never starts with [`REPLY_PREFIX`].
pub trait CommentIdSource: Send + Sync {
    fn next_id(&self) -> CommentId;
}

/// Default comment id source: `c-` followed by a 16-character random
/// alphanumeric suffix.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCommentIds;

impl CommentIdSource for RandomCommentIds {
    fn next_id(&self) -> CommentId {
        CommentId(format!("c-{}", random_string(RANDOM_SUFFIX_LEN)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_string_has_requested_length() {
        assert_eq!(random_string(16).len(), 16);
        assert_eq!(random_string(0).len(), 0);
    }

    #[test]
    fn generated_reply_id_carries_prefix() {
        let id = ReplyId::generate();
        assert!(id.as_str().starts_with("c-reply-"));
        assert_eq!(id.as_str().len(), "c-reply-".len() + 16);
    }

    #[test]
    fn generated_comment_id_has_plain_prefix() {
        let id = RandomCommentIds.next_id();
        assert!(id.as_str().starts_with("c-"));
        assert_eq!(id.as_str().len(), 2 + 16);
    }

    #[test]
    fn entry_id_routes_reply_prefix_to_replies() {
        let entry = EntryId::from_raw("c-reply-abcdef0123456789");
        assert!(entry.is_reply());

        // Routing keys off the first 7 characters only; a bare prefix with no
        // suffix still routes to replies.
        assert!(EntryId::from_raw("c-reply").is_reply());
        assert!(EntryId::from_raw("c-replyXYZ").is_reply());
    }

    #[test]
    fn entry_id_routes_everything_else_to_comments() {
        assert!(!EntryId::from_raw("c-abc123").is_reply());
        assert!(!EntryId::from_raw("c-repl").is_reply());
        assert!(!EntryId::from_raw("").is_reply());
        assert!(!EntryId::from_raw("totally-malformed").is_reply());
    }

    #[test]
    fn entry_id_round_trips_raw_string() {
        let entry = EntryId::from_raw("c-reply-xyz");
        assert_eq!(entry.as_str(), "c-reply-xyz");
        let entry = EntryId::from_raw("c-xyz");
        assert_eq!(entry.as_str(), "c-xyz");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let doc = DocumentId::from("pad1");
        assert_eq!(serde_json::to_string(&doc).unwrap(), "\"pad1\"");
        let comment = CommentId::new("c-abc");
        assert_eq!(serde_json::to_string(&comment).unwrap(), "\"c-abc\"");
    }
}
