//! Execution context error types.

use thiserror::Error;

/// Errors that can occur when handing work to an execution context.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The context has shut down and no longer accepts jobs.
    #[error("Execution context '{label}' is closed")]
    Closed {
        /// Label of the closed context.
        label: String,
    },

    /// A thread-affine context was driven from a foreign thread.
    #[error("Execution context '{label}' can only be run on its owner thread")]
    NotOwnerThread {
        /// Label of the context.
        label: String,
    },

    /// The process-wide main loop is already owned by another thread.
    #[error("Main loop is already installed on thread {owner}")]
    MainAlreadyInstalled {
        /// Debug form of the owning thread's id.
        owner: String,
    },

    /// The worker thread backing a context could not be spawned.
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Result type for execution context operations.
pub type ContextResult<T> = Result<T, ContextError>;
