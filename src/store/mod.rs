//! Entity store: the cached posts and their comment forests.
//!
//! Pure data plus total mutation primitives. Nothing here knows about
//! events or counters; the reconciler drives it.

mod feed;
pub mod forest;

pub use feed::EntityStore;
pub use forest::{NodePath, TreeInsert};
