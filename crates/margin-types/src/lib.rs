//! Foundation types for Margin, a threaded annotation store for versioned
//! documents.
//!
//! Comments and comment replies live in two separate identifier namespaces
//! that share most of their record shape. The namespaces are told apart by a
//! reserved prefix on reply identifiers, and that decision is made exactly
//! once, when a raw identifier is parsed into an [`EntryId`].
//!
//! # Key Types
//!
//! - [`DocumentId`] — Canonical identifier of a writable document
//! - [`CommentId`] / [`ReplyId`] — Namespaced annotation identifiers
//! - [`EntryId`] — Tagged identifier carrying its namespace
//! - [`Comment`] / [`CommentReply`] — Stored annotation records
//! - [`NewComment`] / [`NewReply`] — External input with explicit defaulting
//!
//! # Modules
//!
//! - [`id`] — Identifier newtypes, the reply prefix, identifier generation
//! - [`record`] — Stored record types and the accepted/reverted state machine
//! - [`input`] — Boundary input types and the defaulting policy

pub mod id;
pub mod input;
pub mod record;

pub use id::{
    random_string, CommentId, CommentIdSource, DocumentId, EntryId, RandomCommentIds, ReplyId,
    REPLY_PREFIX,
};
pub use input::{NewComment, NewReply, ReplyMetadata, EMPTY_AUTHOR};
pub use record::{now_ms, Comment, CommentMap, CommentReply, ReplyMap};
