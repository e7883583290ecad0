//! The read-only end of a channel and its combinators.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::context::ExecutionContext;
use crate::receiver::EventReceiver;
use crate::registry::Cancel;
use crate::source::{EventSource, SourceState};
use crate::subscription::Subscription;

/// Consumer-facing view of an [`EventSource`].
///
/// Every view of a source shares its registry. Combinators such as
/// [`Channel::map`] and [`Channel::dispatch_to`] build a new source and
/// feed it through an internal subscription on this channel, so a
/// derived channel keeps receiving for as long as this channel's source
/// is alive.
pub struct Channel<T> {
    state: Arc<SourceState<T>>,
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Send + Sync + 'static> Channel<T> {
    pub(crate) fn new(state: Arc<SourceState<T>>) -> Self {
        Self { state }
    }

    /// Register `handler` for every subsequent event.
    ///
    /// Subscribing the same closure twice creates two independent
    /// registrations and both fire.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.subscribe_shared(move |event: &Arc<T>| handler(&**event))
    }

    fn subscribe_shared<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&Arc<T>) + Send + Sync + 'static,
    {
        let entry = self.state.registry.add(Arc::new(handler));
        debug!(
            subscription_id = %entry.id(),
            context = %self.state.context.label(),
            "Handler subscribed"
        );
        Subscription::new(entry)
    }

    /// Derive a channel carrying `transform(event)` for every event.
    ///
    /// The derived channel delivers on the same context as this one.
    /// A panicking `transform` propagates like a panicking handler.
    ///
    /// The forwarding handler stays registered on this channel's source
    /// for as long as that source lives, even after the derived channel
    /// is dropped. Derive once and keep the result rather than deriving
    /// per use.
    pub fn map<U, F>(&self, transform: F) -> Channel<U>
    where
        U: Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let target = EventSource::from_shared(Arc::clone(&self.state.context));
        let channel = target.channel();
        let _ = self.subscribe(move |event| target.post(transform(event)));
        channel
    }

    /// Derive a channel that only carries events matching `predicate`.
    ///
    /// The derived channel delivers on the same context as this one.
    ///
    /// As with [`Channel::map`], the forwarding handler is never removed
    /// from this channel's source.
    pub fn filter<P>(&self, predicate: P) -> Channel<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let target = EventSource::from_shared(Arc::clone(&self.state.context));
        let channel = target.channel();
        let _ = self.subscribe_shared(move |event| {
            if predicate(&**event) {
                target.post_shared(Arc::clone(event));
            }
        });
        channel
    }

    /// Derive a channel that delivers the same events on `context`.
    ///
    /// Events are reposted unchanged; the derived source decides between
    /// inline and scheduled delivery against `context`.
    ///
    /// As with [`Channel::map`], the forwarding handler is never removed
    /// from this channel's source.
    pub fn dispatch_to<C>(&self, context: C) -> Channel<T>
    where
        C: ExecutionContext + 'static,
    {
        let target = EventSource::new(context);
        let channel = target.channel();
        let _ = self.subscribe_shared(move |event| target.post_shared(Arc::clone(event)));
        channel
    }

    /// Bridge this channel into async code.
    ///
    /// Every event delivered to the returned receiver is queued until
    /// read. Dropping the receiver unsubscribes it.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.subscribe_shared(move |event| {
            // A closed receiver unsubscribes on drop; nothing to do here.
            let _ = tx.send(Arc::clone(event));
        });
        EventReceiver::new(rx, subscription)
    }

    /// Number of handlers registered on the underlying source.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.registry.len()
    }
}

impl<T> std::fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("context", &self.state.context.label())
            .field("subscriber_count", &self.state.registry.len())
            .finish()
    }
}
