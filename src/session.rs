//! The active feed view: snapshot, subscriptions and reconciler in one place.

use crate::channel::PushChannel;
use crate::error::{Result, SyncError};
use crate::events::{decode, RawNotification};
use crate::reconciler::{CommentCountMode, Outcome, Reconciler};
use crate::snapshot::SnapshotLoader;
use crate::subscriptions::{DeactivationHandle, InboxStats, SubscriptionManager};
use crate::types::{Fingerprint, Post, PostId};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Session configuration.
#[derive(Clone, Debug)]
pub struct FeedConfig {
    /// Max queued notifications before new ones are dropped.
    /// Default: 1000
    pub inbox_buffer_size: usize,

    /// How long `run` waits on an empty inbox before re-checking liveness.
    /// Default: 50ms
    pub poll_interval: Duration,

    /// Counter policy for comment deletion.
    pub comment_count_mode: CommentCountMode,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            inbox_buffer_size: 1000,
            poll_interval: Duration::from_millis(50),
            comment_count_mode: CommentCountMode::PerNode,
        }
    }
}

impl FeedConfig {
    pub fn with_inbox_buffer_size(mut self, size: usize) -> Self {
        self.inbox_buffer_size = size;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_comment_count_mode(mut self, mode: CommentCountMode) -> Self {
        self.comment_count_mode = mode;
        self
    }
}

/// Per-session processing counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub applied: u64,
    pub skipped: u64,
    pub malformed: u64,
    /// Taken off the inbox after deactivation and discarded.
    pub discarded: u64,
}

/// A live, self-updating view of the feed.
///
/// Handlers are registered before the snapshot is fetched, so nothing sent
/// during the fetch is lost: it waits in the inbox and is applied on the
/// first `process_*` call. Dropping the session tears the subscriptions down.
pub struct FeedSession {
    reconciler: Reconciler,
    subscriptions: SubscriptionManager,
    inbox: Receiver<RawNotification>,
    config: FeedConfig,
    stats: SessionStats,
}

impl FeedSession {
    /// Subscribe to `channel`, then seed the store from `loader`.
    pub fn activate(
        channel: Arc<dyn PushChannel>,
        loader: &dyn SnapshotLoader,
        config: FeedConfig,
    ) -> Result<Self> {
        let (sender, inbox) = bounded(config.inbox_buffer_size);
        let subscriptions = SubscriptionManager::activate(channel, sender)?;

        // On failure `subscriptions` is dropped here, which releases the handlers.
        let posts = loader.load()?;
        info!(posts = posts.len(), "feed snapshot loaded");

        let reconciler =
            Reconciler::from_snapshot(posts).with_comment_count_mode(config.comment_count_mode);

        Ok(Self {
            reconciler,
            subscriptions,
            inbox,
            config,
            stats: SessionStats::default(),
        })
    }

    // --- Read interface ---

    /// Current posts, newest first, with nested comments.
    pub fn posts(&self) -> &[Post] {
        self.reconciler.posts()
    }

    pub fn post(&self, id: &PostId) -> Option<&Post> {
        self.reconciler.post(id)
    }

    /// Owned copy for readers that outlive the borrow.
    pub fn snapshot(&self) -> Vec<Post> {
        self.reconciler.posts().to_vec()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.reconciler.store().fingerprint()
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn inbox_stats(&self) -> &InboxStats {
        self.subscriptions.stats()
    }

    pub fn pending(&self) -> usize {
        self.inbox.len()
    }

    // --- Processing ---

    /// Decode and apply one notification.
    ///
    /// Returns `None` if it was malformed or the session is no longer active.
    pub fn handle(&mut self, raw: RawNotification) -> Option<Outcome> {
        if !self.subscriptions.is_live() {
            self.stats.discarded += 1;
            return None;
        }

        let event = match decode(&raw) {
            Ok(event) => event,
            Err(e) => {
                self.stats.malformed += 1;
                warn!(kind = %raw.kind, error = %e, "dropping malformed notification");
                return None;
            }
        };

        let reconciler = &mut self.reconciler;
        match self.subscriptions.while_live(|| reconciler.apply(event)) {
            Some(outcome) => {
                if outcome.is_applied() {
                    self.stats.applied += 1;
                } else {
                    self.stats.skipped += 1;
                }
                Some(outcome)
            }
            None => {
                self.stats.discarded += 1;
                None
            }
        }
    }

    /// Apply everything currently queued. Returns how many were taken off the inbox.
    pub fn process_pending(&mut self) -> usize {
        let mut taken = 0;
        while let Ok(raw) = self.inbox.try_recv() {
            taken += 1;
            self.handle(raw);
        }
        taken
    }

    /// Wait up to `timeout` for one notification and apply it.
    pub fn process_next(&mut self, timeout: Duration) -> Result<Option<Outcome>> {
        if !self.is_active() {
            return Err(SyncError::Inactive);
        }
        match self.inbox.recv_timeout(timeout) {
            Ok(raw) => Ok(self.handle(raw)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(SyncError::ChannelClosed),
        }
    }

    /// Process notifications until the session is deactivated.
    pub fn run(&mut self) {
        while self.is_active() {
            match self.inbox.recv_timeout(self.config.poll_interval) {
                Ok(raw) => {
                    self.handle(raw);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.discard_pending();
    }

    // --- Lifecycle ---

    pub fn is_active(&self) -> bool {
        self.subscriptions.is_live()
    }

    /// A handle that deactivates this session from elsewhere (e.g. the UI thread).
    pub fn deactivation_handle(&self) -> DeactivationHandle {
        self.subscriptions.deactivation_handle()
    }

    /// Release every handler and drop whatever is still queued.
    pub fn deactivate(&mut self) {
        self.subscriptions.deactivate();
        self.discard_pending();
    }

    /// Stop and hand back the final store contents.
    pub fn into_posts(mut self) -> Vec<Post> {
        self.deactivate();
        std::mem::take(&mut self.reconciler).into_store().into_posts()
    }

    fn discard_pending(&mut self) {
        let dropped = self.inbox.try_iter().count() as u64;
        if dropped > 0 {
            info!(dropped, "discarding queued notifications after deactivation");
        }
        self.stats.discarded += dropped;
    }
}
