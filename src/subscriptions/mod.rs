//! Managed subscription set for a feed session.
//!
//! On activation one handler is registered on the push channel for each of
//! the ten event kinds. Each registration carries its own cancellation
//! token; teardown cancels them all under one lock and then unsubscribes.
//!
//! # Example
//!
//! ```ignore
//! let (tx, rx) = crossbeam_channel::bounded(1000);
//! let manager = SubscriptionManager::activate(channel, tx)?;
//!
//! while let Ok(raw) = rx.recv() {
//!     manager.while_live(|| reconciler.apply(decode(&raw)?));
//! }
//! // Dropping `manager` releases every handler.
//! ```

mod manager;
mod types;

pub use manager::{DeactivationHandle, SubscriptionManager};
pub use types::{CancellationToken, InboxStats, Registration};
