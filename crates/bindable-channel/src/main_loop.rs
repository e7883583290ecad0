//! Thread-affine, manually pumped execution context.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::thread::{self, ThreadId};

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::context::{ExecutionContext, Job};
use crate::error::{ContextError, ContextResult};

/// Label used by loops created with [`MainLoop::new`].
pub const MAIN_LOOP_LABEL: &str = "main";

thread_local! {
    static CURRENT_LOOP: MainLoop = MainLoop::new();
}

static MAIN_LOOP: OnceLock<MainLoop> = OnceLock::new();

/// A run loop owned by a single thread.
///
/// A UI-like thread periodically drains its loop with
/// [`MainLoop::run_pending`]. Posting from the owner thread delivers
/// inline, posting from anywhere else queues the handler until the owner
/// pumps the loop.
///
/// One loop per process is the "main" loop, returned by
/// [`MainLoop::main`] and used by [`EventSource::default`](crate::EventSource).
/// The application thread that pumps it should claim it early with
/// [`MainLoop::install_main`].
///
/// Cloning a `MainLoop` yields another handle to the same queue.
#[derive(Clone)]
pub struct MainLoop {
    inner: Arc<LoopInner>,
}

struct LoopInner {
    label: String,
    owner: ThreadId,
    tx: mpsc::UnboundedSender<Job>,
    rx: Mutex<mpsc::UnboundedReceiver<Job>>,
}

impl MainLoop {
    /// Create a loop owned by the calling thread.
    #[must_use]
    pub fn new() -> Self {
        Self::named(MAIN_LOOP_LABEL)
    }

    /// Create a loop with a custom label, owned by the calling thread.
    #[must_use]
    pub fn named(label: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let inner = LoopInner {
            label: label.into(),
            owner: thread::current().id(),
            tx,
            rx: Mutex::new(rx),
        };
        debug!(context = %inner.label, owner = ?inner.owner, "Main loop created");
        Self {
            inner: Arc::new(inner),
        }
    }

    /// The loop belonging to the calling thread, created on first use.
    #[must_use]
    pub fn current() -> Self {
        CURRENT_LOOP.with(Clone::clone)
    }

    /// Make the calling thread's loop the process-wide main loop.
    ///
    /// Calling this again from the same thread returns the same loop.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::MainAlreadyInstalled`] if another thread's
    /// loop is already the main loop.
    pub fn install_main() -> ContextResult<Self> {
        let here = Self::current();
        let main = MAIN_LOOP.get_or_init(|| {
            debug!(context = %here.inner.label, owner = ?here.inner.owner, "Main loop installed");
            here.clone()
        });
        if Arc::ptr_eq(&main.inner, &here.inner) {
            Ok(here)
        } else {
            Err(ContextError::MainAlreadyInstalled {
                owner: format!("{:?}", main.inner.owner),
            })
        }
    }

    /// The process-wide main loop.
    ///
    /// If no thread called [`MainLoop::install_main`] yet, the calling
    /// thread's loop is installed. Every thread gets the same loop back.
    #[must_use]
    pub fn main() -> Self {
        MAIN_LOOP
            .get_or_init(|| {
                let here = Self::current();
                debug!(context = %here.inner.label, owner = ?here.inner.owner, "Main loop installed");
                here
            })
            .clone()
    }

    /// Run every queued job, including jobs queued while draining.
    ///
    /// Returns the number of jobs that ran. A panicking job propagates to
    /// the caller; jobs queued behind it stay queued.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::NotOwnerThread`] when called from a thread
    /// other than the one that created the loop.
    pub fn run_pending(&self) -> ContextResult<usize> {
        if !self.is_current() {
            return Err(ContextError::NotOwnerThread {
                label: self.inner.label.clone(),
            });
        }

        let mut ran: usize = 0;
        loop {
            // The receiver lock is released before the job runs so the job
            // may schedule more work on this loop.
            let next = self
                .inner
                .rx
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .try_recv();
            let Ok(job) = next else { break };
            job();
            ran = ran.saturating_add(1);
        }

        if ran > 0 {
            trace!(context = %self.inner.label, jobs = ran, "Main loop drained");
        }
        Ok(ran)
    }

    /// Number of jobs waiting to run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner
            .rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for MainLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MainLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainLoop")
            .field("label", &self.inner.label)
            .field("owner", &self.inner.owner)
            .field("pending", &self.pending())
            .finish()
    }
}

impl ExecutionContext for MainLoop {
    fn label(&self) -> &str {
        &self.inner.label
    }

    fn is_current(&self) -> bool {
        thread::current().id() == self.inner.owner
    }

    fn schedule(&self, job: Job) -> ContextResult<()> {
        self.inner.tx.send(job).map_err(|_| ContextError::Closed {
            label: self.inner.label.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_current_is_per_thread() {
        let here = MainLoop::current();
        assert!(here.is_current());
        assert_eq!(here.label(), MAIN_LOOP_LABEL);

        let there = std::thread::spawn(|| {
            let there = MainLoop::current();
            assert!(there.is_current());
            there
        })
        .join()
        .unwrap();

        assert!(!there.is_current());
    }

    #[test]
    fn test_current_returns_same_loop() {
        let first = MainLoop::current();
        let second = MainLoop::current();
        assert!(Arc::ptr_eq(&first.inner, &second.inner));
    }

    #[test]
    fn test_main_is_process_wide() {
        let main = MainLoop::main();
        let from_other = std::thread::spawn(MainLoop::main).join().unwrap();
        assert!(Arc::ptr_eq(&main.inner, &from_other.inner));
    }

    #[test]
    fn test_install_main_rejects_second_thread() {
        // The spawned thread either installed the main loop or already
        // found one; a fresh thread can never own it afterwards.
        std::thread::spawn(MainLoop::main).join().unwrap();

        let result = std::thread::spawn(MainLoop::install_main).join().unwrap();
        assert!(matches!(
            result,
            Err(ContextError::MainAlreadyInstalled { .. })
        ));
    }

    #[test]
    fn test_run_pending_drains_in_order() {
        let main_loop = MainLoop::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let order = Arc::clone(&order);
            main_loop
                .schedule(Box::new(move || order.lock().unwrap().push(i)))
                .unwrap();
        }
        assert_eq!(main_loop.pending(), 3);

        assert_eq!(main_loop.run_pending().unwrap(), 3);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(main_loop.pending(), 0);
    }

    #[test]
    fn test_run_pending_includes_nested_jobs() {
        let main_loop = MainLoop::new();
        let count = Arc::new(AtomicUsize::new(0));

        let nested_loop = main_loop.clone();
        let nested_count = Arc::clone(&count);
        main_loop
            .schedule(Box::new(move || {
                nested_count.fetch_add(1, Ordering::SeqCst);
                let inner_count = Arc::clone(&nested_count);
                nested_loop
                    .schedule(Box::new(move || {
                        inner_count.fetch_add(1, Ordering::SeqCst);
                    }))
                    .unwrap();
            }))
            .unwrap();

        assert_eq!(main_loop.run_pending().unwrap(), 2);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_run_pending_rejects_foreign_thread() {
        let main_loop = MainLoop::named("ui");
        let remote = main_loop.clone();

        let result = std::thread::spawn(move || remote.run_pending())
            .join()
            .unwrap();

        assert!(matches!(
            result,
            Err(ContextError::NotOwnerThread { ref label }) if label == "ui"
        ));
    }

    #[test]
    fn test_schedule_from_other_thread() {
        let main_loop = MainLoop::new();
        let remote = main_loop.clone();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        std::thread::spawn(move || {
            assert!(!remote.is_current());
            remote
                .schedule(Box::new(move || {
                    count_clone.fetch_add(1, Ordering::SeqCst);
                }))
                .unwrap();
        })
        .join()
        .unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 0);
        main_loop.run_pending().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
