//! Boundary input types and the defaulting policy.
//!
//! External input (typically JSON from a transport layer) is converted to the
//! internal record types here, and only here. The defaulting rules are:
//!
//! - `author` missing or empty → the sentinel `"empty"`
//! - `timestamp` missing or non-numeric → current wall-clock time; numeric
//!   strings are accepted and coerced
//! - reply text: the `reply` field wins over `text` when it is non-empty
//! - reply `author`/`name`: the nested `comment` metadata object wins over the
//!   top-level fields

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::id::CommentId;
use crate::record::{now_ms, Comment, CommentReply};

/// Sentinel author recorded when the input carries no author.
pub const EMPTY_AUTHOR: &str = "empty";

/// Input for adding a top-level comment.
///
/// `comment_id` is only honored on the duplication path: a caller copying
/// comments between documents may carry existing ids over. Fresh adds leave it
/// unset and the store generates one.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewComment {
    pub comment_id: Option<CommentId>,
    pub author: Option<String>,
    pub name: Option<String>,
    pub text: String,
    pub change_to: Option<String>,
    pub change_from: Option<String>,
    #[serde(deserialize_with = "lenient_millis")]
    pub timestamp: Option<u64>,
}

impl NewComment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Apply the defaulting policy and produce the stored record.
    pub fn into_record(self) -> Comment {
        Comment {
            author: or_empty_author(self.author),
            name: self.name,
            text: self.text,
            change_to: self.change_to,
            change_from: self.change_from,
            timestamp: self.timestamp.unwrap_or_else(now_ms),
            change_accepted: None,
            change_reverted: None,
        }
    }
}

/// Author/name metadata nested under a reply input's `comment` field.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReplyMetadata {
    pub author: Option<String>,
    pub name: Option<String>,
}

/// Input for adding a reply to a comment.
///
/// The parent `comment_id` is stored as given, never validated for existence.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewReply {
    pub comment_id: CommentId,
    /// Reply body; wins over `text` when both are present and this one is
    /// non-empty.
    pub reply: Option<String>,
    pub text: Option<String>,
    pub change_to: Option<String>,
    pub change_from: Option<String>,
    pub author: Option<String>,
    pub name: Option<String>,
    /// Nested metadata; its author/name take precedence over the top-level
    /// fields.
    #[serde(rename = "comment")]
    pub metadata: Option<ReplyMetadata>,
    #[serde(deserialize_with = "lenient_millis")]
    pub timestamp: Option<u64>,
}

impl NewReply {
    pub fn new(comment_id: CommentId, reply: impl Into<String>) -> Self {
        Self {
            comment_id,
            reply: Some(reply.into()),
            ..Self::default()
        }
    }

    /// Apply the defaulting policy and produce the stored record.
    pub fn into_record(self) -> CommentReply {
        let metadata = self.metadata.unwrap_or_default();
        CommentReply {
            comment_id: self.comment_id,
            text: self
                .reply
                .filter(|r| !r.is_empty())
                .or(self.text)
                .unwrap_or_default(),
            change_to: self.change_to,
            change_from: self.change_from,
            author: or_empty_author(metadata.author.or(self.author)),
            name: metadata.name.or(self.name),
            timestamp: self.timestamp.unwrap_or_else(now_ms),
            change_accepted: None,
            change_reverted: None,
        }
    }
}

fn or_empty_author(author: Option<String>) -> String {
    match author {
        Some(a) if !a.is_empty() => a,
        _ => EMPTY_AUTHOR.to_string(),
    }
}

/// Accept epoch milliseconds as a JSON number or a numeric string; anything
/// else coerces to `None` (and thus defaults to the current time).
fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_millis))
}

fn coerce_millis(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            // Fractional timestamps truncate toward zero; negatives are
            // treated as non-numeric.
            n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))
        }
        _ => None,
    }
}
