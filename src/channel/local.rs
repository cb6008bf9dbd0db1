//! In-process push channel.

use super::{ChannelSubscriptionId, Handler, PushChannel};
use crate::error::{Result, SyncError};
use crate::events::RawNotification;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Internal subscription state.
struct Subscription {
    topic: String,
    handler: Arc<Handler>,
}

/// Topic-based broker that calls handlers synchronously on the publishing thread.
///
/// Handlers are invoked outside the registry lock, so a handler may
/// unsubscribe (itself or others) without deadlocking. Delivery order among
/// subscribers of one topic follows subscription order.
pub struct LocalChannel {
    /// Active subscriptions by ID. Ordered so fan-out is deterministic.
    subscriptions: RwLock<BTreeMap<ChannelSubscriptionId, Subscription>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
    closed: AtomicBool,
}

impl LocalChannel {
    /// Create a new channel.
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        }
    }

    /// Deliver `payload` to every handler subscribed to `topic`.
    ///
    /// Returns the number of handlers called.
    pub fn publish(&self, topic: &str, payload: serde_json::Value) -> usize {
        if self.is_closed() {
            return 0;
        }

        let handlers: Vec<Arc<Handler>> = {
            let subs = self.subscriptions.read();
            subs.values()
                .filter(|sub| sub.topic == topic)
                .map(|sub| Arc::clone(&sub.handler))
                .collect()
        };

        for handler in &handlers {
            handler(payload.clone());
        }

        debug!(topic, delivered = handlers.len(), "published");
        handlers.len()
    }

    /// Publish a whole envelope.
    pub fn publish_raw(&self, notification: RawNotification) -> usize {
        self.publish(&notification.kind, notification.payload)
    }

    /// Drop every subscription and refuse new ones.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.subscriptions.write().clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Get subscription count.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Subscriptions on one topic.
    pub fn topic_subscribers(&self, topic: &str) -> usize {
        self.subscriptions
            .read()
            .values()
            .filter(|sub| sub.topic == topic)
            .count()
    }
}

impl PushChannel for LocalChannel {
    fn subscribe(&self, topic: &str, handler: Handler) -> Result<ChannelSubscriptionId> {
        if self.is_closed() {
            return Err(SyncError::ChannelClosed);
        }

        let id = ChannelSubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let subscription = Subscription {
            topic: topic.to_string(),
            handler: Arc::new(handler),
        };
        self.subscriptions.write().insert(id, subscription);

        Ok(id)
    }

    fn unsubscribe(&self, id: ChannelSubscriptionId) {
        self.subscriptions.write().remove(&id);
    }
}

impl Default for LocalChannel {
    fn default() -> Self {
        Self::new()
    }
}
