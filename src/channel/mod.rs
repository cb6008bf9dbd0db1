//! The push channel boundary.
//!
//! The engine never owns a transport. It is handed something implementing
//! [`PushChannel`] and registers handlers on it; whatever bridges the real
//! transport (a websocket client, a test harness) publishes into it.
//! [`LocalChannel`] is the in-process implementation.

mod local;

pub use local::LocalChannel;

use crate::error::Result;

/// Callback invoked with the payload of each notification on a topic.
pub type Handler = Box<dyn Fn(serde_json::Value) + Send + Sync>;

/// Identifier of a handler registration on a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelSubscriptionId(pub u64);

/// Opaque publish/subscribe transport.
pub trait PushChannel: Send + Sync {
    /// Register `handler` for notifications tagged `topic`.
    fn subscribe(&self, topic: &str, handler: Handler) -> Result<ChannelSubscriptionId>;

    /// Remove a registration. Unknown ids are ignored.
    fn unsubscribe(&self, id: ChannelSubscriptionId);
}
