//! Handler entries and the per-source handler registry.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Callback stored in the registry. Events travel as `Arc<T>` so a
/// single post can be shared by every handler and scheduled job.
pub(crate) type Callback<T> = Arc<dyn Fn(&Arc<T>) + Send + Sync>;

/// Identifies one registration on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type-erased view of a handler entry, held by [`Subscription`](crate::Subscription).
pub(crate) trait Cancel: Send + Sync {
    fn id(&self) -> SubscriptionId;
    fn is_active(&self) -> bool;
    fn cancel(&self);
}

/// A registered handler.
///
/// The back-reference to the registry is weak: an entry never keeps its
/// source alive. The callback is `None` once the entry is cancelled.
pub(crate) struct HandlerEntry<T> {
    id: SubscriptionId,
    registry: Weak<Registry<T>>,
    callback: Mutex<Option<Callback<T>>>,
}

impl<T> HandlerEntry<T> {
    fn slot(&self) -> MutexGuard<'_, Option<Callback<T>>> {
        self.callback.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Invoke the callback if the entry is still live.
    ///
    /// The callback is cloned out of the slot first so the slot lock is
    /// not held while user code runs. Returns `false` if skipped.
    pub(crate) fn invoke(&self, event: &Arc<T>) -> bool {
        let callback = self.slot().clone();
        match callback {
            Some(callback) => {
                callback(event);
                true
            },
            None => false,
        }
    }
}

impl<T: Send + Sync + 'static> Cancel for HandlerEntry<T> {
    fn id(&self) -> SubscriptionId {
        self.id
    }

    fn is_active(&self) -> bool {
        self.slot().is_some()
    }

    fn cancel(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }

        // Dropped outside the slot lock: the callback may own other sources.
        let callback = self.slot().take();
        if callback.is_some() {
            debug!(subscription_id = %self.id, "Subscription cancelled");
        }
    }
}

/// Ordered, lock-guarded list of handler entries. One per source.
pub(crate) struct Registry<T> {
    entries: Mutex<Vec<Arc<HandlerEntry<T>>>>,
}

impl<T> Registry<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    // The guarded Vec is never left half-updated, so a poisoned lock is
    // still safe to use.
    fn entries(&self) -> MutexGuard<'_, Vec<Arc<HandlerEntry<T>>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a new entry for `callback`.
    pub(crate) fn add(self: &Arc<Self>, callback: Callback<T>) -> Arc<HandlerEntry<T>> {
        let entry = Arc::new(HandlerEntry {
            id: SubscriptionId::new(),
            registry: Arc::downgrade(self),
            callback: Mutex::new(Some(callback)),
        });
        self.entries().push(Arc::clone(&entry));
        entry
    }

    /// Remove the entry with `id`. Returns `true` if it was present.
    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }

    /// Copy of the current entries, in subscription order.
    pub(crate) fn snapshot(&self) -> Vec<Arc<HandlerEntry<T>>> {
        self.entries().clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries().len()
    }
}

impl<T> Drop for Registry<T> {
    // A dropped source leaves its subscriptions inert. Releasing the
    // callbacks here frees whatever they captured even while callers
    // still hold the `Subscription` handles.
    fn drop(&mut self) {
        let entries = std::mem::take(
            self.entries
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for entry in entries {
            let callback = entry.slot().take();
            drop(callback);
        }
    }
}
