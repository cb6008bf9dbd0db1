//! Post-level operations.

use super::{Outcome, Reconciler, SkipReason};
use crate::types::{Like, LikeId, Post, PostFields, PostId};

impl Reconciler {
    /// Prepend a new post. Existing ids are left alone.
    pub(super) fn create_post(&mut self, post: Post) -> Outcome {
        if self.store.insert_if_absent(post) {
            Outcome::Applied
        } else {
            Outcome::Skipped(SkipReason::Duplicate)
        }
    }

    /// Replace provided fields; comments, likes and counters stay local.
    pub(super) fn update_post(&mut self, id: &PostId, fields: &PostFields) -> Outcome {
        if self.store.replace_fields(id, fields) {
            Outcome::Applied
        } else {
            Outcome::Skipped(SkipReason::UnknownPost)
        }
    }

    pub(super) fn delete_post(&mut self, id: &PostId) -> Outcome {
        match self.store.remove(id) {
            Some(_) => Outcome::Applied,
            None => Outcome::Skipped(SkipReason::UnknownPost),
        }
    }

    pub(super) fn like_post(&mut self, id: &PostId, like: Like) -> Outcome {
        let Some(post) = self.store.get_mut(id) else {
            return Outcome::Skipped(SkipReason::UnknownPost);
        };
        if post.likes.iter().any(|l| l.id == like.id) {
            return Outcome::Skipped(SkipReason::Duplicate);
        }
        post.likes.push(like);
        post.likes_count += 1;
        Outcome::Applied
    }

    pub(super) fn unlike_post(&mut self, id: &PostId, like_id: &LikeId) -> Outcome {
        let Some(post) = self.store.get_mut(id) else {
            return Outcome::Skipped(SkipReason::UnknownPost);
        };
        let Some(index) = post.likes.iter().position(|l| l.id == *like_id) else {
            return Outcome::Skipped(SkipReason::UnknownLike);
        };
        post.likes.remove(index);
        post.likes_count = post.likes_count.saturating_sub(1);
        Outcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::FeedEvent;
    use crate::types::Comment;

    fn seeded() -> Reconciler {
        Reconciler::from_snapshot(vec![
            Post::new("p2", "u1", "cat", "second", "b"),
            Post::new("p1", "u1", "cat", "first", "b"),
        ])
    }

    fn ids(r: &Reconciler) -> Vec<&str> {
        r.posts().iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_create_prepends_once() {
        let mut r = seeded();
        let post = Post::new("p3", "u2", "cat", "third", "b");

        assert_eq!(r.apply(FeedEvent::PostCreated(post.clone())), Outcome::Applied);
        assert_eq!(
            r.apply(FeedEvent::PostCreated(post)),
            Outcome::Skipped(SkipReason::Duplicate)
        );
        assert_eq!(ids(&r), vec!["p3", "p2", "p1"]);
    }

    #[test]
    fn test_create_keeps_arriving_children() {
        let mut r = seeded();
        let post = Post::new("p3", "u2", "cat", "t", "b")
            .with_comments(vec![Comment::root("c1", "u", "hi")])
            .with_likes(vec![Like::new("l1", "u3")]);
        r.apply(FeedEvent::PostCreated(post));

        let p3 = r.post(&"p3".into()).unwrap();
        assert_eq!(p3.comments.len(), 1);
        assert_eq!(p3.comments_count, 1);
        assert_eq!(p3.likes_count, 1);
    }

    #[test]
    fn test_create_drops_repeated_comment_ids() {
        let mut r = seeded();
        let mut post = Post::new("p3", "u2", "cat", "t", "b");
        post.comments = vec![Comment::root("c1", "u", "a"), Comment::root("c1", "u", "b")];

        assert_eq!(r.apply(FeedEvent::PostCreated(post)), Outcome::Applied);
        let roots: Vec<&str> = r
            .post(&"p3".into())
            .unwrap()
            .comments
            .iter()
            .map(|c| c.content.as_str())
            .collect();
        assert_eq!(roots, vec!["a"]);

        r.apply(FeedEvent::CommentDeleted("c1".into(), "p3".into()));
        assert!(r.post(&"p3".into()).unwrap().comments.is_empty());
    }

    #[test]
    fn test_update_preserves_children() {
        let mut r = Reconciler::from_snapshot(vec![Post::new("p1", "u", "cat", "old", "body")
            .with_comments(vec![
                Comment::root("c1", "u", "a").with_likes(vec![Like::new("l1", "u2")]),
                Comment::root("c2", "u", "b"),
                Comment::root("c3", "u", "c"),
            ])
            .with_likes(vec![Like::new("l9", "u3")])]);
        let before = r.post(&"p1".into()).unwrap().clone();

        let outcome = r.apply(FeedEvent::PostUpdated("p1".into(), PostFields::title("x")));
        assert_eq!(outcome, Outcome::Applied);

        let after = r.post(&"p1".into()).unwrap();
        assert_eq!(after.title, "x");
        assert_eq!(after.body, before.body);
        assert_eq!(after.comments, before.comments);
        assert_eq!(after.comments_count, 3);
        assert_eq!(after.likes, before.likes);
        assert_eq!(after.likes_count, 1);
    }

    #[test]
    fn test_update_does_not_reorder() {
        let mut r = seeded();
        r.apply(FeedEvent::PostUpdated("p1".into(), PostFields::title("bumped")));
        assert_eq!(ids(&r), vec!["p2", "p1"]);
    }

    #[test]
    fn test_delete() {
        let mut r = seeded();
        assert_eq!(r.apply(FeedEvent::PostDeleted("p2".into())), Outcome::Applied);
        assert_eq!(
            r.apply(FeedEvent::PostDeleted("p2".into())),
            Outcome::Skipped(SkipReason::UnknownPost)
        );
        assert_eq!(ids(&r), vec!["p1"]);
    }

    #[test]
    fn test_like_unlike_counter() {
        let mut r = seeded();
        let pid = PostId::new("p1");

        r.apply(FeedEvent::PostLiked(pid.clone(), Like::new("l1", "u1")));
        r.apply(FeedEvent::PostLiked(pid.clone(), Like::new("l2", "u2")));
        assert_eq!(
            r.apply(FeedEvent::PostLiked(pid.clone(), Like::new("l2", "u2"))),
            Outcome::Skipped(SkipReason::Duplicate)
        );
        assert_eq!(r.post(&pid).unwrap().likes_count, 2);

        r.apply(FeedEvent::PostUnliked(pid.clone(), "l1".into()));
        let post = r.post(&pid).unwrap();
        assert_eq!(post.likes_count, 1);
        assert_eq!(post.likes, vec![Like::new("l2", "u2")]);
    }

    #[test]
    fn test_unlike_before_like_stays_at_zero() {
        let mut r = seeded();
        let pid = PostId::new("p1");
        assert_eq!(
            r.apply(FeedEvent::PostUnliked(pid.clone(), "l1".into())),
            Outcome::Skipped(SkipReason::UnknownLike)
        );
        assert_eq!(r.post(&pid).unwrap().likes_count, 0);
    }

    #[test]
    fn test_unlike_clamps_out_of_sync_counter() {
        // Snapshot carried a like but a zero counter.
        let mut post = Post::new("p1", "u", "cat", "t", "b");
        post.likes.push(Like::new("l1", "u1"));
        let mut r = Reconciler::from_snapshot(vec![post]);

        r.apply(FeedEvent::PostUnliked("p1".into(), "l1".into()));
        let post = r.post(&"p1".into()).unwrap();
        assert!(post.likes.is_empty());
        assert_eq!(post.likes_count, 0);
    }
}
