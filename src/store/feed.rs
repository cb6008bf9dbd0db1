//! The canonical post collection.

use super::forest::{self, TreeInsert};
use crate::types::{Comment, CommentFields, CommentId, Fingerprint, Post, PostFields, PostId};
use std::collections::HashSet;

/// In-memory post collection, newest first.
///
/// Every mutation either applies completely or leaves the store untouched.
/// Counters are not touched here; they belong to the reconciler.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityStore {
    posts: Vec<Post>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a snapshot. Later duplicates of a post id, and of a comment
    /// id within a post's forest, are dropped.
    pub fn from_posts(posts: Vec<Post>) -> Self {
        let mut seen = HashSet::new();
        let posts = posts
            .into_iter()
            .filter(|post| seen.insert(post.id.clone()))
            .map(|mut post| {
                forest::dedup(&mut post.comments);
                post
            })
            .collect();
        Self { posts }
    }

    // --- Read access ---

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn contains(&self, id: &PostId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == *id)
    }

    pub fn get_mut(&mut self, id: &PostId) -> Option<&mut Post> {
        self.posts.iter_mut().find(|post| post.id == *id)
    }

    fn position(&self, id: &PostId) -> Option<usize> {
        self.posts.iter().position(|post| post.id == *id)
    }

    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }

    /// Digest of the canonical JSON form, for cheap change detection.
    pub fn fingerprint(&self) -> Fingerprint {
        let bytes = serde_json::to_vec(&self.posts).unwrap_or_default();
        Fingerprint::from_bytes(&bytes)
    }

    // --- Post primitives ---

    /// Prepend `post` unless its id is already present. Returns true if inserted.
    ///
    /// Repeated comment ids in the carried forest keep their first occurrence.
    pub fn insert_if_absent(&mut self, mut post: Post) -> bool {
        if self.contains(&post.id) {
            return false;
        }
        forest::dedup(&mut post.comments);
        self.posts.insert(0, post);
        true
    }

    /// Remove a post, keeping the order of the rest.
    pub fn remove(&mut self, id: &PostId) -> Option<Post> {
        let index = self.position(id)?;
        Some(self.posts.remove(index))
    }

    /// Overwrite the provided fields only. Returns false if the post is absent.
    pub fn replace_fields(&mut self, id: &PostId, fields: &PostFields) -> bool {
        let Some(post) = self.get_mut(id) else {
            return false;
        };
        if let Some(ref title) = fields.title {
            post.title = title.clone();
        }
        if let Some(ref body) = fields.body {
            post.body = body.clone();
        }
        if let Some(ref category_id) = fields.category_id {
            post.category_id = category_id.clone();
        }
        if let Some(ref created_at) = fields.created_at {
            post.created_at = Some(created_at.clone());
        }
        true
    }

    // --- Comment primitives ---

    pub fn find_comment(&self, post_id: &PostId, comment_id: &CommentId) -> Option<&Comment> {
        forest::find(&self.get(post_id)?.comments, comment_id)
    }

    pub fn find_comment_mut(
        &mut self,
        post_id: &PostId,
        comment_id: &CommentId,
    ) -> Option<&mut Comment> {
        forest::find_mut(&mut self.get_mut(post_id)?.comments, comment_id)
    }

    /// Insert into a post's forest. `None` if the post is absent.
    pub fn insert_comment(&mut self, post_id: &PostId, comment: Comment) -> Option<TreeInsert> {
        let post = self.get_mut(post_id)?;
        Some(forest::insert(&mut post.comments, comment))
    }

    /// Detach a comment and its subtree from a post's forest.
    pub fn remove_comment(&mut self, post_id: &PostId, comment_id: &CommentId) -> Option<Comment> {
        forest::remove(&mut self.get_mut(post_id)?.comments, comment_id)
    }

    /// Overwrite the provided comment fields only; replies and likes stay.
    pub fn replace_comment_fields(
        &mut self,
        post_id: &PostId,
        comment_id: &CommentId,
        fields: &CommentFields,
    ) -> bool {
        let Some(comment) = self.find_comment_mut(post_id, comment_id) else {
            return false;
        };
        if let Some(ref content) = fields.content {
            comment.content = content.clone();
        }
        true
    }
}
