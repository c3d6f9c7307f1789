use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::id::{CommentId, ReplyId};

/// Current wall-clock time as milliseconds since the UNIX epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// A top-level comment attached to a document.
///
/// `change_accepted`/`change_reverted` are absent until a decision is made
/// about the proposed change; after the first decision they are always both
/// present and complementary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_from: Option<String>,
    pub timestamp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_reverted: Option<bool>,
}

impl Comment {
    /// Record a decision on the proposed change. The two flags are kept
    /// complementary: accepting clears reverted and vice versa.
    pub fn set_change_state(&mut self, accepted: bool) {
        self.change_accepted = Some(accepted);
        self.change_reverted = Some(!accepted);
    }
}

/// A reply to a comment.
///
/// `comment_id` references the parent comment but is never validated for
/// existence; referential integrity is the caller's concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentReply {
    pub comment_id: CommentId,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_from: Option<String>,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub timestamp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_reverted: Option<bool>,
}

impl CommentReply {
    /// Record a decision on the proposed change, same state machine as
    /// [`Comment::set_change_state`].
    pub fn set_change_state(&mut self, accepted: bool) {
        self.change_accepted = Some(accepted);
        self.change_reverted = Some(!accepted);
    }
}

/// All comments of one document, stored and rewritten as a single unit.
pub type CommentMap = HashMap<CommentId, Comment>;

/// All replies of one document, stored and rewritten as a single unit.
pub type ReplyMap = HashMap<ReplyId, CommentReply>;

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(text: &str) -> Comment {
        Comment {
            author: "a.x1".into(),
            name: None,
            text: text.into(),
            change_to: None,
            change_from: None,
            timestamp: 1_700_000_000_000,
            change_accepted: None,
            change_reverted: None,
        }
    }

    #[test]
    fn change_state_starts_absent() {
        let c = comment("hi");
        assert_eq!(c.change_accepted, None);
        assert_eq!(c.change_reverted, None);
    }

    #[test]
    fn change_state_flags_are_complementary() {
        let mut c = comment("hi");

        c.set_change_state(true);
        assert_eq!(c.change_accepted, Some(true));
        assert_eq!(c.change_reverted, Some(false));

        c.set_change_state(false);
        assert_eq!(c.change_accepted, Some(false));
        assert_eq!(c.change_reverted, Some(true));
    }

    #[test]
    fn absent_optionals_are_omitted_from_json() {
        let json = serde_json::to_value(comment("hi")).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("name"));
        assert!(!obj.contains_key("changeTo"));
        assert!(!obj.contains_key("changeAccepted"));
        assert_eq!(obj["text"], "hi");
    }

    #[test]
    fn record_fields_use_camel_case_on_the_wire() {
        let mut c = comment("hi");
        c.change_from = Some("old".into());
        c.set_change_state(true);

        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["changeFrom"], "old");
        assert_eq!(json["changeAccepted"], true);
        assert_eq!(json["changeReverted"], false);
    }

    #[test]
    fn comment_map_round_trips_through_json() {
        let mut map = CommentMap::new();
        map.insert(CommentId::new("c-one"), comment("first"));
        map.insert(CommentId::new("c-two"), comment("second"));

        let value = serde_json::to_value(&map).unwrap();
        let back: CommentMap = serde_json::from_value(value).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn now_ms_is_epoch_scale() {
        // Sanity bound: after 2023-01-01, before 2100.
        let now = now_ms();
        assert!(now > 1_672_531_200_000);
        assert!(now < 4_102_444_800_000);
    }
}
