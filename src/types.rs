//! Core types for the feed cache.

use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Ids arrive either as strings or as plain integers depending on the producer.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(u64),
}

impl WireId {
    fn into_string(self) -> String {
        match self {
            WireId::Text(s) => s,
            WireId::Number(n) => n.to_string(),
        }
    }
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Empty ids are treated as absent by the decoder.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                WireId::deserialize(deserializer).map(|raw| $name(raw.into_string()))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }
    };
}

id_type!(
    /// Identifier of a post.
    PostId
);
id_type!(
    /// Identifier of a comment. Never reused, so unique across posts too.
    CommentId
);
id_type!(
    /// Identifier of a like.
    LikeId
);
id_type!(UserId);
id_type!(CategoryId);

/// A like on a post or a comment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: LikeId,
    #[serde(default)]
    pub user_id: UserId,
}

impl Like {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: LikeId::new(id),
            user_id: UserId::new(user_id),
        }
    }
}

/// A comment node. Owns its `replies` subtree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,

    /// None for root comments. An empty id on the wire also means root.
    #[serde(default, deserialize_with = "parent_ref")]
    pub parent_id: Option<CommentId>,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub author_id: UserId,

    #[serde(default)]
    pub likes: Vec<Like>,

    #[serde(default)]
    pub replies: Vec<Comment>,
}

fn parent_ref<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<CommentId>, D::Error> {
    let parent = Option::<CommentId>::deserialize(deserializer)?;
    Ok(parent.filter(|id| !id.is_empty()))
}

impl Comment {
    /// Create a root comment.
    pub fn root(
        id: impl Into<String>,
        author_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: CommentId::new(id),
            parent_id: None,
            content: content.into(),
            author_id: UserId::new(author_id),
            likes: Vec::new(),
            replies: Vec::new(),
        }
    }

    /// Create a reply to `parent_id`.
    pub fn reply(
        id: impl Into<String>,
        parent_id: impl Into<String>,
        author_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            parent_id: Some(CommentId::new(parent_id)),
            ..Self::root(id, author_id, content)
        }
    }

    pub fn with_replies(mut self, replies: Vec<Comment>) -> Self {
        self.replies = replies;
        self
    }

    pub fn with_likes(mut self, likes: Vec<Like>) -> Self {
        self.likes = likes;
        self
    }

    /// Number of nodes in this subtree, including self.
    pub fn subtree_size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.replies.iter());
        }
        count
    }

    /// Likes are not counted separately on comments.
    pub fn likes_count(&self) -> usize {
        self.likes.len()
    }
}

/// A forum post with its comment forest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,

    #[serde(default)]
    pub author_id: UserId,

    #[serde(default)]
    pub category_id: CategoryId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub body: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default)]
    pub likes: Vec<Like>,

    /// Denormalized; maintained incrementally.
    #[serde(default)]
    pub likes_count: u64,

    /// Root comments, in display order.
    #[serde(default)]
    pub comments: Vec<Comment>,

    /// Denormalized flat count of all comment nodes.
    #[serde(default)]
    pub comments_count: u64,
}

impl Post {
    pub fn new(
        id: impl Into<String>,
        author_id: impl Into<String>,
        category_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: PostId::new(id),
            author_id: UserId::new(author_id),
            category_id: CategoryId::new(category_id),
            title: title.into(),
            body: body.into(),
            created_at: None,
            likes: Vec::new(),
            likes_count: 0,
            comments: Vec::new(),
            comments_count: 0,
        }
    }

    /// Attach a forest and set the counter to its node count.
    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self.comments_count = self.comment_nodes() as u64;
        self
    }

    /// Attach likes and set the counter to their number.
    pub fn with_likes(mut self, likes: Vec<Like>) -> Self {
        self.likes_count = likes.len() as u64;
        self.likes = likes;
        self
    }

    /// Actual number of comment nodes in the forest (not the denormalized counter).
    pub fn comment_nodes(&self) -> usize {
        self.comments.iter().map(Comment::subtree_size).sum()
    }
}

/// Replaceable post fields carried by an update. `None` leaves the field alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl PostFields {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.body.is_none()
            && self.category_id.is_none()
            && self.created_at.is_none()
    }
}

/// Replaceable comment fields carried by an update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl CommentFields {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }
}

/// SHA-256 digest of the canonical JSON form of a feed.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    /// Compute from bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Fingerprint(hasher.finalize().into())
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({}...)", &self.to_hex()[..8])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
