//! Subscription types for a feed session.

use crate::channel::ChannelSubscriptionId;
use crate::events::EventKind;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Shared cancellation flag. Clones observe the same state.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// One handler registered on the push channel.
#[derive(Clone, Debug)]
pub struct Registration {
    pub kind: EventKind,
    pub channel_id: ChannelSubscriptionId,
    /// Checked by the handler before forwarding anything.
    pub token: CancellationToken,
}

/// Counters updated from handler threads.
#[derive(Debug, Default)]
pub struct InboxStats {
    forwarded: AtomicU64,
    overflowed: AtomicU64,
}

impl InboxStats {
    pub(crate) fn record_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_overflow(&self) {
        self.overflowed.fetch_add(1, Ordering::Relaxed);
    }

    /// Notifications queued for processing.
    pub fn forwarded(&self) -> u64 {
        self.forwarded.load(Ordering::Relaxed)
    }

    /// Notifications dropped because the inbox was full.
    pub fn overflowed(&self) -> u64 {
        self.overflowed.load(Ordering::Relaxed)
    }
}
