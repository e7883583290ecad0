//! Bindable Channel - typed in-process publish/subscribe.
//!
//! This crate provides:
//! - [`EventSource`], the writable end that owns the handler registry
//! - [`Channel`], the read-only end consumers subscribe to
//! - [`Subscription`], the handle used to stop delivery
//! - Execution contexts that decide where handlers run
//!
//! # Architecture
//!
//! A source is bound to one [`ExecutionContext`]. When an event is
//! posted, the source snapshots its handlers and checks whether the
//! caller is already running inside that context:
//!
//! 1. **On the context**: handlers run inline, in subscription order,
//!    before `post` returns.
//!
//! 2. **Off the context**: each handler is scheduled on the context, in
//!    subscription order, and `post` returns immediately.
//!
//! Combinators ([`Channel::map`], [`Channel::filter`],
//! [`Channel::dispatch_to`]) create a new source and forward events to it
//! through an internal subscription.
//!
//! Provided contexts: [`MainLoop`] (a thread-affine, manually pumped
//! loop; the process-wide [`MainLoop::main`] backs
//! [`EventSource::default`]), [`SerialQueue`]
//! (a dedicated worker thread) and [`Inline`] (always synchronous).
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use bindable_channel::{EventSource, MainLoop};
//!
//! let source = EventSource::<u32>::new(MainLoop::current());
//! let doubled = source.channel().map(|x| x * 2);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let subscription = doubled.subscribe(move |x| sink.lock().unwrap().push(*x));
//!
//! // Posting from the loop's own thread delivers inline.
//! source.post(21);
//! assert_eq!(*seen.lock().unwrap(), vec![42]);
//!
//! subscription.unsubscribe();
//! source.post(1);
//! assert_eq!(seen.lock().unwrap().len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod prelude;

mod channel;
mod config;
mod context;
mod error;
mod main_loop;
mod receiver;
mod registry;
mod serial_queue;
mod source;
mod subscription;

pub use channel::Channel;
pub use config::QueueConfig;
pub use context::{ExecutionContext, Inline, Job};
pub use error::{ContextError, ContextResult};
pub use main_loop::{MAIN_LOOP_LABEL, MainLoop};
pub use receiver::EventReceiver;
pub use registry::SubscriptionId;
pub use serial_queue::SerialQueue;
pub use source::EventSource;
pub use subscription::Subscription;
