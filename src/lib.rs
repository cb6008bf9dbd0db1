//! # Feed Sync
//!
//! Keeps a locally cached forum feed consistent with a live stream of
//! fine-grained change notifications, without re-fetching the feed.
//!
//! ## Core Concepts
//!
//! - **Entity store**: posts (newest first) with nested comment forests
//! - **Events**: raw `{kind, payload}` notifications decoded into typed changes
//! - **Reconciler**: applies one change at a time; unknown targets and
//!   duplicates are skipped, counters never go negative
//! - **Subscriptions**: one handler per event kind on an injected push
//!   channel, torn down together when the session ends
//!
//! ## Example
//!
//! ```ignore
//! use feed_sync::{FeedConfig, FeedSession, LocalChannel, StaticSnapshot};
//!
//! let channel = Arc::new(LocalChannel::new());
//! let mut session = FeedSession::activate(
//!     channel.clone(),
//!     &StaticSnapshot(initial_posts),
//!     FeedConfig::default(),
//! )?;
//!
//! channel.publish("comment:new", json!({
//!     "postId": "p1",
//!     "comment": {"id": "c1", "content": "First!"}
//! }));
//! session.process_pending();
//!
//! render(session.posts());
//! ```

pub mod channel;
pub mod error;
pub mod events;
pub mod reconciler;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use channel::{ChannelSubscriptionId, Handler, LocalChannel, PushChannel};
pub use error::{DecodeError, Result, SyncError};
pub use events::{decode, decode_kind, EventKind, FeedEvent, RawNotification};
pub use reconciler::{CommentCountMode, Outcome, Reconciler, SkipReason};
pub use session::{FeedConfig, FeedSession, SessionStats};
pub use snapshot::{JsonFileSnapshot, SnapshotLoader, StaticSnapshot};
pub use store::{EntityStore, TreeInsert};
pub use subscriptions::{
    CancellationToken, DeactivationHandle, InboxStats, Registration, SubscriptionManager,
};
pub use types::*;
