//! Performance benchmarks for reconciliation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use feed_sync::{
    decode, Comment, CommentId, FeedEvent, Like, Post, PostId, RawNotification, Reconciler,
};
use serde_json::json;

/// A post whose forest is a single reply chain `depth` nodes long.
fn deep_post(depth: usize) -> Post {
    let mut node = Comment::reply(format!("c{}", depth - 1), format!("c{}", depth - 2), "u", "");
    for i in (0..depth - 1).rev() {
        let mut parent = if i == 0 {
            Comment::root("c0", "u", "")
        } else {
            Comment::reply(format!("c{}", i), format!("c{}", i - 1), "u", "")
        };
        parent.replies.push(node);
        node = parent;
    }
    Post::new("p0", "u", "cat", "t", "b").with_comments(vec![node])
}

/// A post with `width` root comments, each with one reply.
fn wide_post(width: usize) -> Post {
    let roots = (0..width)
        .map(|i| {
            Comment::root(format!("r{}", i), "u", "")
                .with_replies(vec![Comment::reply(format!("r{}-a", i), format!("r{}", i), "u", "")])
        })
        .collect();
    Post::new("p0", "u", "cat", "t", "b").with_comments(roots)
}

/// Benchmark liking the deepest comment with varying chain depths
fn bench_deep_targeting(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_targeting");

    for depth in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, &depth| {
            let reconciler = Reconciler::from_snapshot(vec![deep_post(depth)]);
            let target = CommentId::new(format!("c{}", depth - 1));

            b.iter(|| {
                let mut r = reconciler.clone();
                black_box(r.apply(FeedEvent::CommentLiked(
                    target.clone(),
                    PostId::new("p0"),
                    Like::new("l", "u"),
                )));
            });
        });
    }

    group.finish();
}

/// Benchmark inserting a reply at the end of a wide forest
fn bench_wide_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_insert");

    for width in [100, 1000, 5000] {
        group.bench_with_input(BenchmarkId::new("width", width), &width, |b, &width| {
            let reconciler = Reconciler::from_snapshot(vec![wide_post(width)]);
            let parent = format!("r{}-a", width - 1);

            b.iter(|| {
                let mut r = reconciler.clone();
                black_box(r.apply(FeedEvent::CommentCreated(
                    PostId::new("p0"),
                    Comment::reply("new", parent.as_str(), "u", ""),
                )));
            });
        });
    }

    group.finish();
}

/// Benchmark decoding a typical comment notification
fn bench_decode(c: &mut Criterion) {
    let raw = RawNotification::new(
        "comment:new",
        json!({
            "postId": "p0",
            "comment": {"id": "c1", "parentId": "c0", "authorId": "u", "content": "hello"}
        }),
    );

    c.bench_function("decode_comment_new", |b| {
        b.iter(|| black_box(decode(&raw).unwrap()));
    });
}

criterion_group!(benches, bench_deep_targeting, bench_wide_insert, bench_decode);

criterion_main!(benches);
