//! Execution context backed by a dedicated worker thread.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};

use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::config::QueueConfig;
use crate::context::{ExecutionContext, Job};
use crate::error::{ContextError, ContextResult};

/// A serial task queue running on its own thread.
///
/// Jobs run one at a time, in submission order. A job that panics is
/// logged and discarded; the worker moves on to the next job.
///
/// The worker stops once [`SerialQueue::shutdown`] is called or every
/// handle has been dropped, after draining the jobs already queued.
#[derive(Clone)]
pub struct SerialQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    label: String,
    worker: ThreadId,
    tx: Mutex<Option<mpsc::UnboundedSender<Job>>>,
}

impl SerialQueue {
    /// Spawn a queue with default settings and the given label.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Spawn`] if the worker thread cannot be created.
    pub fn new(label: impl Into<String>) -> ContextResult<Self> {
        Self::with_config(QueueConfig::new(label))
    }

    /// Spawn a queue from a [`QueueConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Spawn`] if the worker thread cannot be created.
    pub fn with_config(config: QueueConfig) -> ContextResult<Self> {
        let (tx, rx) = mpsc::unbounded_channel::<Job>();

        let mut builder = thread::Builder::new().name(config.resolved_thread_name());
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let label = config.label;
        let worker_label = label.clone();
        let handle = builder.spawn(move || run_worker(&worker_label, rx))?;

        debug!(context = %label, "Serial queue started");

        Ok(Self {
            inner: Arc::new(QueueInner {
                label,
                worker: handle.thread().id(),
                tx: Mutex::new(Some(tx)),
            }),
        })
    }

    /// Stop accepting jobs. Jobs already queued still run.
    pub fn shutdown(&self) {
        let sender = self
            .inner
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if sender.is_some() {
            debug!(context = %self.inner.label, "Serial queue shutting down");
        }
    }

    /// Returns `true` once the queue no longer accepts jobs.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_none_or(mpsc::UnboundedSender::is_closed)
    }

    fn closed(&self) -> ContextError {
        ContextError::Closed {
            label: self.inner.label.clone(),
        }
    }
}

impl std::fmt::Debug for SerialQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialQueue")
            .field("label", &self.inner.label)
            .field("worker", &self.inner.worker)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl ExecutionContext for SerialQueue {
    fn label(&self) -> &str {
        &self.inner.label
    }

    fn is_current(&self) -> bool {
        thread::current().id() == self.inner.worker
    }

    fn schedule(&self, job: Job) -> ContextResult<()> {
        let guard = self.inner.tx.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(tx) = guard.as_ref() else {
            return Err(self.closed());
        };
        tx.send(job).map_err(|_| self.closed())
    }
}

fn run_worker(label: &str, mut rx: mpsc::UnboundedReceiver<Job>) {
    while let Some(job) = rx.blocking_recv() {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            error!(
                context = %label,
                panic = %panic_message(payload.as_ref()),
                "Job panicked on serial queue"
            );
        }
    }
    debug!(context = %label, "Serial queue stopped");
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
