//! Registers one handler per event kind and tears them down together.

use crate::channel::{Handler, PushChannel};
use crate::error::Result;
use crate::events::{EventKind, RawNotification};
use crossbeam_channel::{Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

use super::types::{CancellationToken, InboxStats, Registration};

struct Inner {
    channel: Arc<dyn PushChannel>,
    /// Also serves as the processing gate: held while an event is applied
    /// and while teardown runs, so the two never interleave.
    registrations: Mutex<Vec<Registration>>,
    live: CancellationToken,
    stats: Arc<InboxStats>,
}

impl Inner {
    fn teardown(&self) {
        let mut regs = self.registrations.lock();
        if self.live.is_cancelled() && regs.is_empty() {
            return;
        }

        self.live.cancel();
        for reg in regs.iter() {
            reg.token.cancel();
        }

        let released = regs.len();
        for reg in regs.drain(..) {
            self.channel.unsubscribe(reg.channel_id);
        }
        info!(released, "feed subscriptions torn down");
    }
}

/// The managed handler set of one feed session.
///
/// Handlers only forward `{kind, payload}` into the session inbox so that
/// the channel's delivery order survives across kinds. Dropping the manager
/// tears everything down.
pub struct SubscriptionManager {
    inner: Arc<Inner>,
}

impl SubscriptionManager {
    /// Register a forwarding handler for every event kind.
    ///
    /// If any registration fails, the ones already made are released before
    /// the error is returned.
    pub fn activate(
        channel: Arc<dyn PushChannel>,
        inbox: Sender<RawNotification>,
    ) -> Result<Self> {
        let inner = Arc::new(Inner {
            channel: Arc::clone(&channel),
            registrations: Mutex::new(Vec::with_capacity(EventKind::ALL.len())),
            live: CancellationToken::new(),
            stats: Arc::new(InboxStats::default()),
        });

        for kind in EventKind::ALL {
            let token = CancellationToken::new();
            let handler = forwarder(kind, inbox.clone(), token.clone(), Arc::clone(&inner.stats));

            match channel.subscribe(kind.as_str(), handler) {
                Ok(channel_id) => inner.registrations.lock().push(Registration {
                    kind,
                    channel_id,
                    token,
                }),
                Err(e) => {
                    warn!(kind = %kind, error = %e, "subscription failed, releasing handlers");
                    inner.teardown();
                    return Err(e);
                }
            }
        }

        info!(handlers = EventKind::ALL.len(), "feed subscriptions active");
        Ok(Self { inner })
    }

    pub fn is_live(&self) -> bool {
        !self.inner.live.is_cancelled()
    }

    pub fn registration_count(&self) -> usize {
        self.inner.registrations.lock().len()
    }

    pub fn registrations(&self) -> Vec<Registration> {
        self.inner.registrations.lock().clone()
    }

    pub fn stats(&self) -> &InboxStats {
        &self.inner.stats
    }

    /// Cancel every handler and unsubscribe them from the channel.
    ///
    /// Waits for an event that is being applied to finish; nothing is applied
    /// afterwards. Idempotent.
    pub fn deactivate(&self) {
        self.inner.teardown();
    }

    /// A handle that can deactivate from another thread.
    pub fn deactivation_handle(&self) -> DeactivationHandle {
        DeactivationHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Run `f` only if still live, holding the processing gate.
    pub(crate) fn while_live<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let _gate = self.inner.registrations.lock();
        if self.inner.live.is_cancelled() {
            return None;
        }
        Some(f())
    }
}

impl Drop for SubscriptionManager {
    fn drop(&mut self) {
        self.inner.teardown();
    }
}

/// Cloneable remote control for a session's teardown.
#[derive(Clone)]
pub struct DeactivationHandle {
    inner: Arc<Inner>,
}

impl DeactivationHandle {
    pub fn deactivate(&self) {
        self.inner.teardown();
    }

    pub fn is_live(&self) -> bool {
        !self.inner.live.is_cancelled()
    }
}

fn forwarder(
    kind: EventKind,
    inbox: Sender<RawNotification>,
    token: CancellationToken,
    stats: Arc<InboxStats>,
) -> Handler {
    Box::new(move |payload| {
        if token.is_cancelled() {
            return;
        }
        match inbox.try_send(RawNotification::new(kind.as_str(), payload)) {
            Ok(()) => stats.record_forwarded(),
            Err(TrySendError::Full(_)) => {
                stats.record_overflow();
                warn!(kind = %kind, "inbox full, dropping notification");
            }
            // Session already gone.
            Err(TrySendError::Disconnected(_)) => {}
        }
    })
}
