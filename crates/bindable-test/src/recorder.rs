//! Delivery recording.

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, ThreadId};

/// One recorded delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery<T> {
    /// The delivered event.
    pub event: T,
    /// Thread the handler ran on.
    pub thread: ThreadId,
}

/// Thread-safe, ordered log of the events a handler received.
///
/// Clones share the same log.
#[derive(Debug)]
pub struct Recorder<T> {
    deliveries: Arc<Mutex<Vec<Delivery<T>>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            deliveries: Arc::clone(&self.deliveries),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self {
            deliveries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T: Clone + Send + 'static> Recorder<T> {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler that records every event it is called with.
    pub fn handler(&self) -> impl Fn(&T) + Send + Sync + 'static {
        let recorder = self.clone();
        move |event: &T| recorder.record(event.clone())
    }

    /// Record an event as delivered on the current thread.
    pub fn record(&self, event: T) {
        self.lock().push(Delivery {
            event,
            thread: thread::current().id(),
        });
    }

    /// Events received so far, in delivery order.
    #[must_use]
    pub fn events(&self) -> Vec<T> {
        self.lock().iter().map(|d| d.event.clone()).collect()
    }

    /// Deliveries received so far, with the thread each ran on.
    #[must_use]
    pub fn deliveries(&self) -> Vec<Delivery<T>> {
        self.lock().clone()
    }

    /// Number of deliveries so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing was delivered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Delivery<T>>> {
        self.deliveries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
