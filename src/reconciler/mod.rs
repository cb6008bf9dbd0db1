//! Applies decoded events to the entity store.
//!
//! Every event either applies completely or is skipped. Skips are the normal
//! consequence of partial visibility (a post not paginated in yet, a reply
//! whose parent was never loaded, a duplicate delivery) and are never errors.

mod comments;
mod posts;

use crate::events::FeedEvent;
use crate::store::EntityStore;
use crate::types::{Post, PostId};
use std::fmt;
use tracing::debug;

/// How `commentsCount` follows comment deletion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CommentCountMode {
    /// One per delete event, however many replies went with the node.
    #[default]
    PerNode,
    /// Subtract every node that was removed.
    Subtree,
}

/// Why an event left the store untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    UnknownPost,
    UnknownComment,
    UnknownParent,
    UnknownLike,
    Duplicate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::UnknownPost => "unknown post",
            SkipReason::UnknownComment => "unknown comment",
            SkipReason::UnknownParent => "unknown parent comment",
            SkipReason::UnknownLike => "unknown like",
            SkipReason::Duplicate => "duplicate",
        };
        f.write_str(s)
    }
}

/// Result of applying one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Skipped(SkipReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Owns the entity store and mutates it one event at a time.
#[derive(Clone, Debug, Default)]
pub struct Reconciler {
    store: EntityStore,
    comment_count_mode: CommentCountMode,
}

impl Reconciler {
    pub fn new(store: EntityStore) -> Self {
        Self {
            store,
            comment_count_mode: CommentCountMode::default(),
        }
    }

    /// Seed from an initial snapshot.
    pub fn from_snapshot(posts: Vec<Post>) -> Self {
        Self::new(EntityStore::from_posts(posts))
    }

    pub fn with_comment_count_mode(mut self, mode: CommentCountMode) -> Self {
        self.comment_count_mode = mode;
        self
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn posts(&self) -> &[Post] {
        self.store.posts()
    }

    pub fn post(&self, id: &PostId) -> Option<&Post> {
        self.store.get(id)
    }

    pub fn into_store(self) -> EntityStore {
        self.store
    }

    /// Apply one event.
    pub fn apply(&mut self, event: FeedEvent) -> Outcome {
        let kind = event.kind();
        let post_id = event.post_id().clone();

        let outcome = match event {
            FeedEvent::PostCreated(post) => self.create_post(post),
            FeedEvent::PostUpdated(id, fields) => self.update_post(&id, &fields),
            FeedEvent::PostDeleted(id) => self.delete_post(&id),
            FeedEvent::PostLiked(id, like) => self.like_post(&id, like),
            FeedEvent::PostUnliked(id, like_id) => self.unlike_post(&id, &like_id),
            FeedEvent::CommentCreated(id, comment) => self.create_comment(&id, comment),
            FeedEvent::CommentUpdated(comment_id, id, fields) => {
                self.update_comment(&id, &comment_id, &fields)
            }
            FeedEvent::CommentDeleted(comment_id, id) => self.delete_comment(&id, &comment_id),
            FeedEvent::CommentLiked(comment_id, id, like) => {
                self.like_comment(&id, &comment_id, like)
            }
            FeedEvent::CommentUnliked(comment_id, id, like_id) => {
                self.unlike_comment(&id, &comment_id, &like_id)
            }
        };

        if let Outcome::Skipped(reason) = outcome {
            debug!(kind = %kind, post_id = %post_id, %reason, "event skipped");
        }
        outcome
    }
}
