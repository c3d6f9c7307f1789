//! The annotation store: every public mutation and query over a document's
//! comments and replies.
//!
//! Every operation follows the same shape: resolve the handle, load the
//! affected aggregate in full, mutate the in-memory copy, save it back in
//! full. Bulk operations load and save exactly once regardless of batch size.
//! There is no locking and no compare-and-swap: two overlapping operations on
//! the same document race, and the later save wins. That lost-update window
//! is accepted behavior inherited from the storage contract, not a bug to fix
//! here.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use margin_kv::KeyValueStore;
use margin_types::{
    Comment, CommentId, CommentIdSource, CommentMap, CommentReply, DocumentId, EntryId,
    NewComment, NewReply, RandomCommentIds, ReplyId, ReplyMap,
};

use crate::aggregate::{self, Namespace};
use crate::error::{StoreError, StoreResult};
use crate::resolve::{AliasResolver, ResolvedDocument};

/// Threaded annotation store over a key-value backend.
///
/// Generic over the storage backend `S`, the alias resolver `R`, and the
/// comment id source `G` (random by default).
pub struct AnnotationStore<S, R, G = RandomCommentIds> {
    kv: S,
    resolver: R,
    ids: G,
}

impl<S, R> AnnotationStore<S, R>
where
    S: KeyValueStore,
    R: AliasResolver,
{
    /// Create a store with randomly generated comment ids.
    pub fn new(kv: S, resolver: R) -> Self {
        Self {
            kv,
            resolver,
            ids: RandomCommentIds,
        }
    }
}

impl<S, R, G> AnnotationStore<S, R, G>
where
    S: KeyValueStore,
    R: AliasResolver,
    G: CommentIdSource,
{
    /// Create a store with an explicit comment id source.
    pub fn with_id_source(kv: S, resolver: R, ids: G) -> Self {
        Self { kv, resolver, ids }
    }

    /// The underlying key-value backend.
    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// The alias resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    // ---- Comments ----

    /// All comments of the document, empty when none exist.
    pub async fn get_comments(&self, handle: &str) -> StoreResult<CommentMap> {
        let doc = self.resolver.resolve(handle).await?;
        aggregate::load(&self.kv, Namespace::Comments, &doc.id).await
    }

    /// Remove one comment. Removing an absent id is a no-op; the aggregate is
    /// rewritten either way.
    pub async fn delete_comment(
        &self,
        handle: &str,
        comment_id: &CommentId,
    ) -> StoreResult<ResolvedDocument> {
        let doc = self.resolver.resolve(handle).await?;
        let mut comments: CommentMap =
            aggregate::load(&self.kv, Namespace::Comments, &doc.id).await?;
        comments.remove(comment_id);
        aggregate::save(&self.kv, Namespace::Comments, &doc.id, &comments).await?;
        debug!(doc = %doc.id, comment = %comment_id, "comment deleted");
        Ok(doc)
    }

    /// Remove the document's entire comment aggregate.
    pub async fn delete_comments(&self, handle: &str) -> StoreResult<()> {
        let doc = self.resolver.resolve(handle).await?;
        aggregate::remove(&self.kv, Namespace::Comments, &doc.id).await?;
        debug!(doc = %doc.id, "all comments deleted");
        Ok(())
    }

    /// Add one comment. Single-element form of [`bulk_add_comments`].
    ///
    /// [`bulk_add_comments`]: Self::bulk_add_comments
    pub async fn add_comment(
        &self,
        handle: &str,
        input: NewComment,
    ) -> StoreResult<(ResolvedDocument, CommentId, Comment)> {
        let (doc, mut ids, mut comments) = self.bulk_add_comments(handle, vec![input]).await?;
        Ok((doc, ids.remove(0), comments.remove(0)))
    }

    /// Add a batch of comments with one aggregate load and one save,
    /// regardless of batch size. Outputs are in input order.
    ///
    /// An input carrying a `comment_id` keeps it (document duplication);
    /// otherwise a fresh id is generated.
    pub async fn bulk_add_comments(
        &self,
        handle: &str,
        inputs: Vec<NewComment>,
    ) -> StoreResult<(ResolvedDocument, Vec<CommentId>, Vec<Comment>)> {
        let doc = self.resolver.resolve(handle).await?;
        let mut comments: CommentMap =
            aggregate::load(&self.kv, Namespace::Comments, &doc.id).await?;

        let mut ids = Vec::with_capacity(inputs.len());
        let mut records = Vec::with_capacity(inputs.len());
        for mut input in inputs {
            let id = input
                .comment_id
                .take()
                .unwrap_or_else(|| self.ids.next_id());
            let comment = input.into_record();
            comments.insert(id.clone(), comment.clone());
            ids.push(id);
            records.push(comment);
        }

        aggregate::save(&self.kv, Namespace::Comments, &doc.id, &comments).await?;
        debug!(doc = %doc.id, count = ids.len(), "comments added");
        Ok((doc, ids, records))
    }

    /// Copy every comment of `src` to `dest` under the same ids.
    ///
    /// Operates on the identifiers exactly as given — no alias resolution, by
    /// contract. The copies are independent records; mutating the
    /// destination's aggregate never affects the source. An absent source
    /// saves an empty aggregate at the destination.
    pub async fn copy_comments(&self, src: &DocumentId, dest: &DocumentId) -> StoreResult<()> {
        let comments: CommentMap = aggregate::load(&self.kv, Namespace::Comments, src).await?;
        aggregate::save(&self.kv, Namespace::Comments, dest, &comments).await?;
        debug!(src = %src, dest = %dest, count = comments.len(), "comments copied");
        Ok(())
    }

    // ---- Replies ----

    /// All replies of the document, empty when none exist.
    pub async fn get_comment_replies(&self, handle: &str) -> StoreResult<ReplyMap> {
        let doc = self.resolver.resolve(handle).await?;
        aggregate::load(&self.kv, Namespace::Replies, &doc.id).await
    }

    /// Remove the document's entire reply aggregate.
    pub async fn delete_comment_replies(&self, handle: &str) -> StoreResult<()> {
        let doc = self.resolver.resolve(handle).await?;
        aggregate::remove(&self.kv, Namespace::Replies, &doc.id).await?;
        debug!(doc = %doc.id, "all replies deleted");
        Ok(())
    }

    /// Add one reply. Single-element form of [`bulk_add_comment_replies`].
    ///
    /// [`bulk_add_comment_replies`]: Self::bulk_add_comment_replies
    pub async fn add_comment_reply(
        &self,
        handle: &str,
        input: NewReply,
    ) -> StoreResult<(ResolvedDocument, ReplyId, CommentReply)> {
        let (doc, mut ids, mut replies) =
            self.bulk_add_comment_replies(handle, vec![input]).await?;
        Ok((doc, ids.remove(0), replies.remove(0)))
    }

    /// Add a batch of replies with one aggregate load and one save. Reply ids
    /// are always generated fresh, never taken from the input.
    pub async fn bulk_add_comment_replies(
        &self,
        handle: &str,
        inputs: Vec<NewReply>,
    ) -> StoreResult<(ResolvedDocument, Vec<ReplyId>, Vec<CommentReply>)> {
        let doc = self.resolver.resolve(handle).await?;
        let mut replies: ReplyMap =
            aggregate::load(&self.kv, Namespace::Replies, &doc.id).await?;

        let mut ids = Vec::with_capacity(inputs.len());
        let mut records = Vec::with_capacity(inputs.len());
        for input in inputs {
            let id = ReplyId::generate();
            let reply = input.into_record();
            replies.insert(id.clone(), reply.clone());
            ids.push(id);
            records.push(reply);
        }

        aggregate::save(&self.kv, Namespace::Replies, &doc.id, &replies).await?;
        debug!(doc = %doc.id, count = ids.len(), "replies added");
        Ok((doc, ids, records))
    }

    /// Copy every reply of `src` to `dest`. Same contract as
    /// [`copy_comments`](Self::copy_comments): no resolution, independent
    /// copies, absent source saves empty.
    pub async fn copy_comment_replies(
        &self,
        src: &DocumentId,
        dest: &DocumentId,
    ) -> StoreResult<()> {
        let replies: ReplyMap = aggregate::load(&self.kv, Namespace::Replies, src).await?;
        aggregate::save(&self.kv, Namespace::Replies, dest, &replies).await?;
        debug!(src = %src, dest = %dest, count = replies.len(), "replies copied");
        Ok(())
    }

    // ---- Cross-namespace edits ----

    /// Record whether the proposed change attached to a comment or reply was
    /// accepted (`true`) or reverted (`false`). The entry must exist.
    pub async fn change_accepted_state(
        &self,
        handle: &str,
        entry: &EntryId,
        accepted: bool,
    ) -> StoreResult<ResolvedDocument> {
        let doc = self.resolver.resolve(handle).await?;
        match entry {
            EntryId::Comment(id) => {
                self.update_entry(Namespace::Comments, &doc.id, id.as_str(), |c: &mut Comment| {
                    c.set_change_state(accepted)
                })
                .await?
            }
            EntryId::Reply(id) => {
                self.update_entry(
                    Namespace::Replies,
                    &doc.id,
                    id.as_str(),
                    |r: &mut CommentReply| r.set_change_state(accepted),
                )
                .await?
            }
        }
        debug!(doc = %doc.id, entry = %entry, accepted, "change state updated");
        Ok(doc)
    }

    /// Overwrite the text of a comment or reply. Empty text is a no-op
    /// success: the aggregate is neither loaded nor saved. Otherwise the
    /// entry must exist.
    pub async fn change_comment_text(
        &self,
        handle: &str,
        entry: &EntryId,
        new_text: &str,
    ) -> StoreResult<ResolvedDocument> {
        let doc = self.resolver.resolve(handle).await?;
        if new_text.is_empty() {
            return Ok(doc);
        }

        match entry {
            EntryId::Comment(id) => {
                self.update_entry(Namespace::Comments, &doc.id, id.as_str(), |c: &mut Comment| {
                    c.text = new_text.to_string()
                })
                .await?
            }
            EntryId::Reply(id) => {
                self.update_entry(
                    Namespace::Replies,
                    &doc.id,
                    id.as_str(),
                    |r: &mut CommentReply| r.text = new_text.to_string(),
                )
                .await?
            }
        }
        debug!(doc = %doc.id, entry = %entry, "text updated");
        Ok(doc)
    }

    /// Load one aggregate, mutate one entry in place, save the whole
    /// aggregate back. Fails with [`StoreError::EntryNotFound`] when the
    /// entry is absent.
    async fn update_entry<T, F>(
        &self,
        ns: Namespace,
        doc: &DocumentId,
        entry: &str,
        apply: F,
    ) -> StoreResult<()>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T),
    {
        let mut map: std::collections::HashMap<String, T> =
            aggregate::load(&self.kv, ns, doc).await?;
        let record = map.get_mut(entry).ok_or_else(|| StoreError::EntryNotFound {
            id: entry.to_string(),
        })?;
        apply(record);
        aggregate::save(&self.kv, ns, doc, &map).await
    }
}
