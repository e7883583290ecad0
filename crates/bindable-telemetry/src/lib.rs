//! Bindable Telemetry - Logging setup for applications using Bindable channels.
//!
//! `bindable-channel` only emits `tracing` events. This crate installs a
//! subscriber for them:
//! - Configurable level and per-target directives
//! - Pretty, compact, JSON or full output
//! - Stdout, stderr or rolling-file targets
//!
//! # Example
//!
//! ```rust,no_run
//! use bindable_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), bindable_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_thread_names()
//!     .with_directive("bindable_channel=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!("Logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging,
};
