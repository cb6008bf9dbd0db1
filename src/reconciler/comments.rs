//! Comment-tree operations.

use super::{CommentCountMode, Outcome, Reconciler, SkipReason};
use crate::store::TreeInsert;
use crate::types::{Comment, CommentFields, CommentId, Like, LikeId, PostId};

impl Reconciler {
    /// Append under the parent (or as a root) and bump `commentsCount`.
    pub(super) fn create_comment(&mut self, post_id: &PostId, comment: Comment) -> Outcome {
        let id = comment.id.clone();

        match self.store.insert_comment(post_id, comment) {
            None => Outcome::Skipped(SkipReason::UnknownPost),
            Some(TreeInsert::Duplicate) => Outcome::Skipped(SkipReason::Duplicate),
            Some(TreeInsert::MissingParent) => Outcome::Skipped(SkipReason::UnknownParent),
            Some(TreeInsert::Inserted) => {
                // Counted after insertion: repeats in the carried subtree are gone by now.
                let added = match self.comment_count_mode {
                    CommentCountMode::PerNode => 1,
                    CommentCountMode::Subtree => self
                        .store
                        .find_comment(post_id, &id)
                        .map_or(1, |node| node.subtree_size() as u64),
                };
                if let Some(post) = self.store.get_mut(post_id) {
                    post.comments_count += added;
                }
                Outcome::Applied
            }
        }
    }

    /// Replace provided fields; replies and likes stay.
    pub(super) fn update_comment(
        &mut self,
        post_id: &PostId,
        comment_id: &CommentId,
        fields: &CommentFields,
    ) -> Outcome {
        if !self.store.contains(post_id) {
            return Outcome::Skipped(SkipReason::UnknownPost);
        }
        if self.store.replace_comment_fields(post_id, comment_id, fields) {
            Outcome::Applied
        } else {
            Outcome::Skipped(SkipReason::UnknownComment)
        }
    }

    /// Excise the node and its whole subtree.
    ///
    /// In `PerNode` mode the counter drops by one even when replies went
    /// with the node.
    pub(super) fn delete_comment(&mut self, post_id: &PostId, comment_id: &CommentId) -> Outcome {
        let mode = self.comment_count_mode;
        let Some(post) = self.store.get_mut(post_id) else {
            return Outcome::Skipped(SkipReason::UnknownPost);
        };
        let Some(removed) = crate::store::forest::remove(&mut post.comments, comment_id) else {
            return Outcome::Skipped(SkipReason::UnknownComment);
        };

        let removed_count = match mode {
            CommentCountMode::PerNode => 1,
            CommentCountMode::Subtree => removed.subtree_size() as u64,
        };
        post.comments_count = post.comments_count.saturating_sub(removed_count);
        Outcome::Applied
    }

    pub(super) fn like_comment(
        &mut self,
        post_id: &PostId,
        comment_id: &CommentId,
        like: Like,
    ) -> Outcome {
        let comment = match self.target_comment(post_id, comment_id) {
            Ok(comment) => comment,
            Err(reason) => return Outcome::Skipped(reason),
        };
        if comment.likes.iter().any(|l| l.id == like.id) {
            return Outcome::Skipped(SkipReason::Duplicate);
        }
        comment.likes.push(like);
        Outcome::Applied
    }

    pub(super) fn unlike_comment(
        &mut self,
        post_id: &PostId,
        comment_id: &CommentId,
        like_id: &LikeId,
    ) -> Outcome {
        let comment = match self.target_comment(post_id, comment_id) {
            Ok(comment) => comment,
            Err(reason) => return Outcome::Skipped(reason),
        };
        match comment.likes.iter().position(|l| l.id == *like_id) {
            Some(index) => {
                comment.likes.remove(index);
                Outcome::Applied
            }
            None => Outcome::Skipped(SkipReason::UnknownLike),
        }
    }

    fn target_comment(
        &mut self,
        post_id: &PostId,
        comment_id: &CommentId,
    ) -> Result<&mut Comment, SkipReason> {
        let post = self.store.get_mut(post_id).ok_or(SkipReason::UnknownPost)?;
        crate::store::forest::find_mut(&mut post.comments, comment_id)
            .ok_or(SkipReason::UnknownComment)
    }
}
