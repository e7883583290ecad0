//! The writable end of a channel.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::channel::Channel;
use crate::context::{ExecutionContext, Job};
use crate::main_loop::MainLoop;
use crate::registry::{Cancel, Registry};

/// State shared by a source, its channel views, and any forwarding
/// closures combinators install upstream.
pub(crate) struct SourceState<T> {
    pub(crate) registry: Arc<Registry<T>>,
    pub(crate) context: Arc<dyn ExecutionContext>,
}

impl<T> Drop for SourceState<T> {
    fn drop(&mut self) {
        trace!(context = %self.context.label(), "Event source released");
    }
}

/// The writable end of a channel.
///
/// A source owns the handler registry and is bound to one
/// [`ExecutionContext`] for its whole life. Hand out [`Channel`] views
/// to consumers and keep the source itself with the producer.
///
/// Once the source and every channel view of it are dropped, existing
/// subscriptions go inert: their callbacks are released and never fire
/// again, and `unsubscribe` on them is a no-op.
pub struct EventSource<T> {
    state: Arc<SourceState<T>>,
}

impl<T: Send + Sync + 'static> EventSource<T> {
    /// Create a source bound to `context`.
    pub fn new<C>(context: C) -> Self
    where
        C: ExecutionContext + 'static,
    {
        Self::from_shared(Arc::new(context))
    }

    /// Create a source bound to an already shared context.
    #[must_use]
    pub fn from_shared(context: Arc<dyn ExecutionContext>) -> Self {
        debug!(context = %context.label(), "Event source created");
        Self {
            state: Arc::new(SourceState {
                registry: Arc::new(Registry::new()),
                context,
            }),
        }
    }

    /// Post an event to every handler registered at call time.
    ///
    /// If the caller is already on the bound context, handlers run inline
    /// in subscription order before this returns. Otherwise each handler
    /// is scheduled on the context, in subscription order, and this
    /// returns without waiting for them.
    ///
    /// A handler panic on the inline path propagates to the caller.
    pub fn post(&self, event: T) {
        self.post_shared(Arc::new(event));
    }

    /// Post an event that is already behind an `Arc`.
    pub fn post_shared(&self, event: Arc<T>) {
        let handlers = self.state.registry.snapshot();
        let context = &self.state.context;

        if handlers.is_empty() {
            trace!(context = %context.label(), "No handlers for event");
            return;
        }

        let inline = context.is_current();
        trace!(
            context = %context.label(),
            handlers = handlers.len(),
            inline,
            "Posting event"
        );

        for entry in handlers {
            if !entry.is_active() {
                continue;
            }

            if inline {
                entry.invoke(&event);
                continue;
            }

            let id = entry.id();
            let event = Arc::clone(&event);
            // Liveness is checked again when the job runs, so a handler
            // cancelled after scheduling is skipped.
            let job: Job = Box::new(move || {
                entry.invoke(&event);
            });

            if let Err(e) = context.schedule(job) {
                warn!(
                    context = %context.label(),
                    subscription_id = %id,
                    error = %e,
                    "Failed to schedule event delivery"
                );
            }
        }
    }

    /// A read-only view of this source.
    #[must_use]
    pub fn channel(&self) -> Channel<T> {
        Channel::new(Arc::clone(&self.state))
    }

    /// The context this source delivers on.
    #[must_use]
    pub fn context(&self) -> &dyn ExecutionContext {
        self.state.context.as_ref()
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.registry.len()
    }
}

impl<T: Send + Sync + 'static> Default for EventSource<T> {
    /// A source bound to the process-wide [`MainLoop::main`], whichever
    /// thread constructs it.
    fn default() -> Self {
        Self::new(MainLoop::main())
    }
}

impl<T> std::fmt::Debug for EventSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSource")
            .field("context", &self.state.context.label())
            .field("subscriber_count", &self.state.registry.len())
            .finish()
    }
}
