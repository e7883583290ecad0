//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while installing a log subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level or a directive could not be parsed into a filter.
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber was already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),

    /// The log directory could not be created.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
