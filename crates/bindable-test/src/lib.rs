//! Bindable Test - Shared test utilities for Bindable channels.
//!
//! This crate provides a controllable mock context, delivery recorders,
//! and small helpers that can be used across Bindable crates as a
//! dev-dependency.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bindable_channel::EventSource;
//! use bindable_test::{Recorder, TestContext};
//!
//! let ctx = TestContext::new("ui");
//! let source = EventSource::<u32>::new(ctx.clone());
//! let recorder = Recorder::new();
//! let _sub = source.channel().subscribe(recorder.handler());
//!
//! source.post(1);
//! assert!(recorder.is_empty());
//! ctx.run_queued();
//! assert_eq!(recorder.events(), vec![1]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod mocks;
pub mod recorder;

pub use fixtures::*;
pub use mocks::*;
pub use recorder::*;
