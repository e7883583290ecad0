//! Execution contexts that channel handlers are delivered on.

use crate::error::ContextResult;

/// A unit of work handed to an execution context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A serial lane that events can be delivered on.
///
/// An [`EventSource`](crate::EventSource) asks its context whether the
/// caller is already running inside it. If so, handlers run inline.
/// Otherwise each handler is wrapped in a [`Job`] and scheduled.
///
/// Implementations must run scheduled jobs in submission order.
pub trait ExecutionContext: Send + Sync {
    /// Human-readable label used in logs and errors.
    fn label(&self) -> &str;

    /// Returns `true` when the calling thread is executing inside this context.
    fn is_current(&self) -> bool;

    /// Queue `job` to run later on this context.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Closed`](crate::ContextError::Closed) if the
    /// context no longer accepts work.
    fn schedule(&self, job: Job) -> ContextResult<()>;
}

/// A context every caller is considered to be inside of.
///
/// Sources bound to `Inline` always deliver synchronously on the
/// posting thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl ExecutionContext for Inline {
    #[allow(clippy::unnecessary_literal_bound)]
    fn label(&self) -> &str {
        "inline"
    }

    fn is_current(&self) -> bool {
        true
    }

    fn schedule(&self, job: Job) -> ContextResult<()> {
        job();
        Ok(())
    }
}
