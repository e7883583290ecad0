//! Serial queue configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`SerialQueue`](crate::SerialQueue).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Label used in logs and errors.
    #[serde(default = "default_label")]
    pub label: String,
    /// Worker thread name. Defaults to `bindable-<label>`.
    #[serde(default)]
    pub thread_name: Option<String>,
    /// Worker thread stack size in bytes. Uses the platform default if unset.
    #[serde(default)]
    pub stack_size: Option<usize>,
}

fn default_label() -> String {
    "serial".to_string()
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            thread_name: None,
            stack_size: None,
        }
    }
}

impl QueueConfig {
    /// Create a config with the given label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Set the worker thread name.
    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = Some(name.into());
        self
    }

    /// Set the worker thread stack size.
    #[must_use]
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// The name the worker thread will be given.
    #[must_use]
    pub fn resolved_thread_name(&self) -> String {
        self.thread_name
            .clone()
            .unwrap_or_else(|| format!("bindable-{}", self.label))
    }
}
