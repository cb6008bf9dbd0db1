//! Notification envelopes and typed change events.

use crate::types::{Comment, CommentFields, CommentId, Like, LikeId, Post, PostFields, PostId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of notification kinds carried by the push channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    PostNew,
    PostUpdated,
    PostDeleted,
    PostLiked,
    PostUnliked,
    CommentNew,
    CommentUpdated,
    CommentDeleted,
    CommentLiked,
    CommentUnliked,
}

impl EventKind {
    pub const ALL: [EventKind; 10] = [
        EventKind::PostNew,
        EventKind::PostUpdated,
        EventKind::PostDeleted,
        EventKind::PostLiked,
        EventKind::PostUnliked,
        EventKind::CommentNew,
        EventKind::CommentUpdated,
        EventKind::CommentDeleted,
        EventKind::CommentLiked,
        EventKind::CommentUnliked,
    ];

    /// Wire tag, e.g. `comment:liked`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PostNew => "post:new",
            EventKind::PostUpdated => "post:updated",
            EventKind::PostDeleted => "post:deleted",
            EventKind::PostLiked => "post:liked",
            EventKind::PostUnliked => "post:unliked",
            EventKind::CommentNew => "comment:new",
            EventKind::CommentUpdated => "comment:updated",
            EventKind::CommentDeleted => "comment:deleted",
            EventKind::CommentLiked => "comment:liked",
            EventKind::CommentUnliked => "comment:unliked",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = crate::error::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| crate::error::DecodeError::UnknownKind(s.to_string()))
    }
}

/// An undecoded notification as delivered by the channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawNotification {
    pub kind: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl RawNotification {
    pub fn new(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

/// A validated change to apply to the cache.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedEvent {
    PostCreated(Post),
    PostUpdated(PostId, PostFields),
    PostDeleted(PostId),
    PostLiked(PostId, Like),
    PostUnliked(PostId, LikeId),
    CommentCreated(PostId, Comment),
    CommentUpdated(CommentId, PostId, CommentFields),
    CommentDeleted(CommentId, PostId),
    CommentLiked(CommentId, PostId, Like),
    CommentUnliked(CommentId, PostId, LikeId),
}

impl FeedEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            FeedEvent::PostCreated(..) => EventKind::PostNew,
            FeedEvent::PostUpdated(..) => EventKind::PostUpdated,
            FeedEvent::PostDeleted(..) => EventKind::PostDeleted,
            FeedEvent::PostLiked(..) => EventKind::PostLiked,
            FeedEvent::PostUnliked(..) => EventKind::PostUnliked,
            FeedEvent::CommentCreated(..) => EventKind::CommentNew,
            FeedEvent::CommentUpdated(..) => EventKind::CommentUpdated,
            FeedEvent::CommentDeleted(..) => EventKind::CommentDeleted,
            FeedEvent::CommentLiked(..) => EventKind::CommentLiked,
            FeedEvent::CommentUnliked(..) => EventKind::CommentUnliked,
        }
    }

    /// The post every event targets.
    pub fn post_id(&self) -> &PostId {
        match self {
            FeedEvent::PostCreated(post) => &post.id,
            FeedEvent::PostUpdated(id, _)
            | FeedEvent::PostDeleted(id)
            | FeedEvent::PostLiked(id, _)
            | FeedEvent::PostUnliked(id, _)
            | FeedEvent::CommentCreated(id, _) => id,
            FeedEvent::CommentUpdated(_, id, _)
            | FeedEvent::CommentDeleted(_, id)
            | FeedEvent::CommentLiked(_, id, _)
            | FeedEvent::CommentUnliked(_, id, _) => id,
        }
    }
}
