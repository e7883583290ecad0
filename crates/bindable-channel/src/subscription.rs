//! Cancellation handles returned by [`Channel::subscribe`](crate::Channel::subscribe).

use std::sync::Arc;

use crate::registry::{Cancel, SubscriptionId};

/// Handle for one registration on a channel.
///
/// Dropping a `Subscription` does not unsubscribe; call
/// [`Subscription::unsubscribe`] to stop delivery. Holding the handle
/// does not keep the channel or its source alive.
#[must_use = "keep the subscription to be able to unsubscribe later"]
pub struct Subscription {
    entry: Arc<dyn Cancel>,
}

impl Subscription {
    pub(crate) fn new(entry: Arc<dyn Cancel>) -> Self {
        Self { entry }
    }

    /// Stop delivering events to this handler.
    ///
    /// Removes the registration and clears its callback. Deliveries that
    /// were already scheduled on a context are skipped when they run.
    /// Calling this more than once is a no-op.
    pub fn unsubscribe(&self) {
        self.entry.cancel();
    }

    /// Identifier of this registration.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.entry.id()
    }

    /// Returns `true` until [`Subscription::unsubscribe`] is called or the
    /// source is dropped.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.entry.is_active()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id())
            .field("active", &self.is_active())
            .finish()
    }
}
