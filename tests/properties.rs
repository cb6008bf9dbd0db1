//! Property tests over random event sequences.

use feed_sync::{
    Comment, CommentFields, EntityStore, FeedEvent, Like, Post, PostFields, PostId, Reconciler,
};
use proptest::prelude::*;
use std::collections::HashSet;

const POSTS: [&str; 3] = ["p0", "p1", "p2"];

fn post_id() -> impl Strategy<Value = PostId> {
    prop::sample::select(POSTS.to_vec()).prop_map(|s| PostId::new(s))
}

fn small_id(prefix: &'static str) -> impl Strategy<Value = String> {
    (0u8..8).prop_map(move |n| format!("{}{}", prefix, n))
}

fn event() -> impl Strategy<Value = FeedEvent> {
    prop_oneof![
        post_id().prop_map(|id| FeedEvent::PostCreated(Post::new(id.0, "u", "cat", "t", "b"))),
        post_id().prop_map(|id| FeedEvent::PostUpdated(id, PostFields::title("x"))),
        post_id().prop_map(FeedEvent::PostDeleted),
        (post_id(), small_id("l")).prop_map(|(id, l)| FeedEvent::PostLiked(id, Like::new(l, "u"))),
        (post_id(), small_id("l"))
            .prop_map(|(id, l)| FeedEvent::PostUnliked(id, l.as_str().into())),
        (post_id(), small_id("c"), prop::option::of(small_id("c"))).prop_map(|(id, c, parent)| {
            let comment = match parent {
                Some(parent) => Comment::reply(c, parent, "u", ""),
                None => Comment::root(c, "u", ""),
            };
            FeedEvent::CommentCreated(id, comment)
        }),
        (post_id(), small_id("c")).prop_map(|(id, c)| {
            FeedEvent::CommentUpdated(c.as_str().into(), id, CommentFields::content("e"))
        }),
        (post_id(), small_id("c"))
            .prop_map(|(id, c)| FeedEvent::CommentDeleted(c.as_str().into(), id)),
        (post_id(), small_id("c"), small_id("l")).prop_map(|(id, c, l)| {
            FeedEvent::CommentLiked(c.as_str().into(), id, Like::new(l, "u"))
        }),
        (post_id(), small_id("c"), small_id("l")).prop_map(|(id, c, l)| {
            FeedEvent::CommentUnliked(c.as_str().into(), id, l.as_str().into())
        }),
    ]
}

/// Roots with leaf replies, drawn from a small id pool so repeats are common.
fn forest() -> impl Strategy<Value = Vec<Comment>> {
    prop::collection::vec(
        (small_id("c"), prop::collection::vec(small_id("c"), 0..3)),
        0..6,
    )
    .prop_map(|roots| {
        roots
            .into_iter()
            .map(|(root, replies)| {
                let replies = replies
                    .into_iter()
                    .map(|reply| Comment::reply(reply, root.as_str(), "u", ""))
                    .collect();
                Comment::root(root, "u", "").with_replies(replies)
            })
            .collect()
    })
}

fn assert_consistent(store: &EntityStore) {
    let mut post_ids = HashSet::new();
    for post in store.posts() {
        assert!(post_ids.insert(post.id.clone()), "duplicate post {}", post.id);

        let mut comment_ids = HashSet::new();
        let mut stack: Vec<&Comment> = post.comments.iter().collect();
        while let Some(node) = stack.pop() {
            assert!(comment_ids.insert(node.id.clone()), "duplicate comment {}", node.id);
            stack.extend(node.replies.iter());
        }

        // Counters only drift downward relative to structure (subtree deletes).
        assert!(post.comments_count as usize >= post.comment_nodes());
        assert_eq!(post.likes_count as usize, post.likes.len());
    }
}

proptest! {
    #[test]
    fn prop_store_never_diverges(events in prop::collection::vec(event(), 0..200)) {
        let mut r = Reconciler::from_snapshot(
            POSTS.iter().map(|id| Post::new(*id, "u", "cat", "t", "b")).collect(),
        );
        for event in events {
            r.apply(event);
            assert_consistent(r.store());
        }
    }

    #[test]
    fn prop_carried_forests_never_repeat_ids(
        snapshot in forest(),
        created in forest(),
        events in prop::collection::vec(event(), 0..50),
    ) {
        let mut r = Reconciler::from_snapshot(vec![
            Post::new("p0", "u", "cat", "t", "b").with_comments(snapshot),
        ]);
        assert_consistent(r.store());

        let post = Post::new("p1", "u", "cat", "t", "b").with_comments(created);
        r.apply(FeedEvent::PostCreated(post));
        assert_consistent(r.store());

        for event in events {
            r.apply(event);
            assert_consistent(r.store());
        }
    }

    #[test]
    fn prop_creation_is_idempotent(events in prop::collection::vec(event(), 0..100)) {
        let mut once = Reconciler::default();
        let mut twice = Reconciler::default();
        for event in events {
            let creation =
                matches!(event, FeedEvent::PostCreated(_) | FeedEvent::CommentCreated(..));
            once.apply(event.clone());
            twice.apply(event.clone());
            if creation {
                twice.apply(event);
            }
        }
        prop_assert_eq!(once.store().fingerprint(), twice.store().fingerprint());
    }

    #[test]
    fn prop_unknown_post_is_noop(events in prop::collection::vec(event(), 0..100)) {
        let mut r = Reconciler::from_snapshot(vec![Post::new("other", "u", "cat", "t", "b")]);
        let before = r.store().fingerprint();
        for event in events {
            if matches!(event, FeedEvent::PostCreated(_)) {
                continue;
            }
            r.apply(event);
        }
        prop_assert_eq!(r.store().fingerprint(), before);
    }
}
