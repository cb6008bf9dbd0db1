//! Raw notification validation.

use super::types::{EventKind, FeedEvent, RawNotification};
use crate::error::DecodeError;
use crate::types::{Comment, CommentFields, CommentId, Like, LikeId, Post, PostFields, PostId};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

type DecodeResult<T> = std::result::Result<T, DecodeError>;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostUpdate {
    #[serde(default)]
    id: Option<PostId>,
    #[serde(flatten)]
    fields: PostFields,
}

/// Envelope shared by every payload that is not itself an entity.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Target {
    #[serde(default)]
    post_id: Option<PostId>,
    #[serde(default)]
    comment_id: Option<CommentId>,
    #[serde(default)]
    like_id: Option<LikeId>,
    #[serde(default)]
    like: Option<Value>,
    #[serde(default)]
    comment: Option<Value>,
    #[serde(default)]
    content: Option<String>,
}

/// Turn a raw notification into a typed event.
///
/// Fails closed: an unknown kind, a non-object payload, or a missing id is
/// an error and nothing is produced.
pub fn decode(raw: &RawNotification) -> DecodeResult<FeedEvent> {
    let kind: EventKind = raw.kind.parse()?;
    decode_kind(kind, &raw.payload)
}

/// Decode a payload whose kind is already known.
pub fn decode_kind(kind: EventKind, payload: &Value) -> DecodeResult<FeedEvent> {
    if !payload.is_object() {
        return Err(invalid(kind, "payload is not an object"));
    }

    match kind {
        EventKind::PostNew => {
            let post: Post = entity(kind, payload, "id")?;
            Ok(FeedEvent::PostCreated(post))
        }
        EventKind::PostUpdated => {
            let update: PostUpdate = parse(kind, payload)?;
            let id = required(update.id, "id")?;
            Ok(FeedEvent::PostUpdated(id, update.fields))
        }
        EventKind::PostDeleted => {
            let target: Target = parse(kind, payload)?;
            Ok(FeedEvent::PostDeleted(required(target.post_id, "postId")?))
        }
        EventKind::PostLiked => {
            let target: Target = parse(kind, payload)?;
            let post_id = required(target.post_id, "postId")?;
            let like: Like = nested(kind, target.like, "like.id")?;
            Ok(FeedEvent::PostLiked(post_id, like))
        }
        EventKind::PostUnliked => {
            let target: Target = parse(kind, payload)?;
            let post_id = required(target.post_id, "postId")?;
            let like_id = required(target.like_id, "likeId")?;
            Ok(FeedEvent::PostUnliked(post_id, like_id))
        }
        EventKind::CommentNew => {
            let target: Target = parse(kind, payload)?;
            let post_id = required(target.post_id, "postId")?;
            let comment: Comment = nested(kind, target.comment, "comment.id")?;
            Ok(FeedEvent::CommentCreated(post_id, comment))
        }
        EventKind::CommentUpdated => {
            let target: Target = parse(kind, payload)?;
            let post_id = required(target.post_id, "postId")?;
            let comment_id = required(target.comment_id, "commentId")?;
            let fields = CommentFields {
                content: target.content,
            };
            Ok(FeedEvent::CommentUpdated(comment_id, post_id, fields))
        }
        EventKind::CommentDeleted => {
            let target: Target = parse(kind, payload)?;
            let post_id = required(target.post_id, "postId")?;
            let comment_id = required(target.comment_id, "commentId")?;
            Ok(FeedEvent::CommentDeleted(comment_id, post_id))
        }
        EventKind::CommentLiked => {
            let target: Target = parse(kind, payload)?;
            let post_id = required(target.post_id, "postId")?;
            let comment_id = required(target.comment_id, "commentId")?;
            let like: Like = nested(kind, target.like, "like.id")?;
            Ok(FeedEvent::CommentLiked(comment_id, post_id, like))
        }
        EventKind::CommentUnliked => {
            let target: Target = parse(kind, payload)?;
            let post_id = required(target.post_id, "postId")?;
            let comment_id = required(target.comment_id, "commentId")?;
            let like_id = required(target.like_id, "likeId")?;
            Ok(FeedEvent::CommentUnliked(comment_id, post_id, like_id))
        }
    }
}

fn invalid(kind: EventKind, message: impl Into<String>) -> DecodeError {
    DecodeError::InvalidPayload {
        kind: kind.as_str().to_string(),
        message: message.into(),
    }
}

fn parse<T: DeserializeOwned>(kind: EventKind, value: &Value) -> DecodeResult<T> {
    T::deserialize(value).map_err(|e| invalid(kind, e.to_string()))
}

/// Ids are strings on the wire; an empty one counts as missing.
trait WireIdent {
    fn is_blank(&self) -> bool;
}

macro_rules! wire_ident {
    ($($ty:ty),*) => {
        $(impl WireIdent for $ty {
            fn is_blank(&self) -> bool {
                self.is_empty()
            }
        })*
    };
}

wire_ident!(PostId, CommentId, LikeId);

fn required<T: WireIdent>(id: Option<T>, field: &'static str) -> DecodeResult<T> {
    match id {
        Some(id) if !id.is_blank() => Ok(id),
        _ => Err(DecodeError::MissingId(field)),
    }
}

fn has_id(value: &Value) -> bool {
    match value.get("id") {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.is_u64(),
        _ => false,
    }
}

/// Decode a top-level entity after checking its id.
fn entity<T: DeserializeOwned>(
    kind: EventKind,
    value: &Value,
    field: &'static str,
) -> DecodeResult<T> {
    if !has_id(value) {
        return Err(DecodeError::MissingId(field));
    }
    parse(kind, value)
}

/// Decode an entity embedded under a payload key.
fn nested<T: DeserializeOwned>(
    kind: EventKind,
    value: Option<Value>,
    field: &'static str,
) -> DecodeResult<T> {
    match value {
        Some(ref v) if v.is_object() => entity(kind, v, field),
        Some(Value::Null) | None => Err(DecodeError::MissingId(field)),
        Some(_) => Err(invalid(kind, format!("{} is not an object", field))),
    }
}
