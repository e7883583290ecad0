//! Test fixtures and helpers.

use std::time::{Duration, Instant};

use bindable_channel::{EventSource, Inline, SerialQueue};
use tracing_subscriber::EnvFilter;

/// Install a test-friendly tracing subscriber once per process.
///
/// Honors `RUST_LOG`; output goes through the test harness capture.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Create a source that always delivers inline.
#[must_use]
pub fn inline_source<T: Send + Sync + 'static>() -> EventSource<T> {
    EventSource::new(Inline)
}

/// Spawn a serial queue for a test.
///
/// # Panics
///
/// Panics if the worker thread cannot be spawned.
#[must_use]
pub fn test_queue(label: &str) -> SerialQueue {
    SerialQueue::new(label).expect("failed to spawn test queue")
}

/// Poll `condition` until it holds or `timeout` elapses.
///
/// Returns whether the condition held.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now().checked_add(timeout);
    loop {
        if condition() {
            return true;
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return false;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
}
