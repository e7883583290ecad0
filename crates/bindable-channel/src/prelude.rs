//! Prelude module - commonly used types for convenient import.
//!
//! Use `use bindable_channel::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use bindable_channel::prelude::*;
//!
//! let source = EventSource::<String>::new(Inline);
//! let lengths = source.channel().map(|s| s.len());
//! let subscription = lengths.subscribe(|len| assert_eq!(*len, 5));
//!
//! source.post("hello".to_string());
//! subscription.unsubscribe();
//! ```

// Channel ends
pub use crate::{Channel, EventReceiver, EventSource, Subscription, SubscriptionId};

// Execution contexts
pub use crate::{ExecutionContext, Inline, Job, MainLoop, QueueConfig, SerialQueue};

// Errors
pub use crate::{ContextError, ContextResult};
