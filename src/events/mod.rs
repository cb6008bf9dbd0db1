//! Inbound change notifications.
//!
//! The push channel delivers `{kind, payload}` envelopes with arbitrary JSON
//! payloads. This module turns them into a closed set of typed events before
//! any field is trusted:
//!
//! ```ignore
//! let raw = RawNotification::new("comment:deleted", json!({"postId": "p1", "commentId": "c1"}));
//! match decode(&raw) {
//!     Ok(event) => reconciler.apply(event),
//!     Err(e) => tracing::warn!(error = %e, "dropping notification"),
//! }
//! ```

mod decoder;
mod types;

pub use decoder::{decode, decode_kind};
pub use types::{EventKind, FeedEvent, RawNotification};
