//! Mock execution contexts for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use bindable_channel::{ContextError, ContextResult, ExecutionContext, Job};

/// Mock implementation of [`ExecutionContext`] with manual control.
///
/// Whether callers count as "inside" the context is a flag the test
/// flips with [`TestContext::enter`]/[`TestContext::leave`], independent
/// of threads. Scheduled jobs wait in a queue until
/// [`TestContext::run_queued`] is called.
///
/// Clones share state, so a test can hand one clone to a source and keep
/// another to drive it.
#[derive(Clone)]
pub struct TestContext {
    label: Arc<str>,
    current: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
    queue: Arc<Mutex<VecDeque<Job>>>,
}

impl TestContext {
    /// Create a context that callers are outside of.
    #[must_use]
    pub fn new(label: &str) -> Self {
        Self {
            label: Arc::from(label),
            current: Arc::new(AtomicBool::new(false)),
            closed: Arc::new(AtomicBool::new(false)),
            queue: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Make every caller count as running inside this context.
    pub fn enter(&self) {
        self.current.store(true, Ordering::SeqCst);
    }

    /// Make every caller count as running outside this context.
    pub fn leave(&self) {
        self.current.store(false, Ordering::SeqCst);
    }

    /// Reject all further jobs with [`ContextError::Closed`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Number of jobs waiting to run.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.lock().expect("lock poisoned").len()
    }

    /// Run queued jobs in order, as if on the context, and return how
    /// many ran. Jobs queued while running are included.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn run_queued(&self) -> usize {
        let was_current = self.current.swap(true, Ordering::SeqCst);
        let mut ran: usize = 0;
        loop {
            let next = self.queue.lock().expect("lock poisoned").pop_front();
            let Some(job) = next else { break };
            job();
            ran = ran.saturating_add(1);
        }
        self.current.store(was_current, Ordering::SeqCst);
        ran
    }
}

impl std::fmt::Debug for TestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestContext")
            .field("label", &self.label)
            .field("current", &self.is_current())
            .field("queued", &self.queued())
            .finish()
    }
}

impl ExecutionContext for TestContext {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst)
    }

    fn schedule(&self, job: Job) -> ContextResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ContextError::Closed {
                label: self.label.to_string(),
            });
        }
        self.queue.lock().expect("lock poisoned").push_back(job);
        Ok(())
    }
}
