//! Integration tests for the process-wide main loop.
//!
//! Kept to a single test: the test thread claims the main loop for the
//! whole process.

#![allow(clippy::arithmetic_side_effects)]

use std::sync::Arc;
use std::thread;

use bindable_channel::{EventSource, ExecutionContext, MainLoop};
use bindable_test::Recorder;

const EVENTS: usize = 1000;

#[test]
fn default_source_built_off_thread_delivers_on_the_main_loop() {
    let main_loop = MainLoop::install_main().unwrap();
    assert!(main_loop.is_current());

    let source = thread::spawn(EventSource::<usize>::default).join().unwrap();
    assert_eq!(source.context().label(), main_loop.label());
    assert!(!thread::spawn(|| MainLoop::main().is_current()).join().unwrap());

    let recorder = Recorder::new();
    let _sub = source.channel().subscribe(recorder.handler());

    let source = Arc::new(source);
    let poster = Arc::clone(&source);
    thread::spawn(move || {
        for n in 0..EVENTS {
            poster.post(n);
        }
    })
    .join()
    .unwrap();
    assert!(recorder.is_empty());

    assert_eq!(main_loop.run_pending().unwrap(), EVENTS);
    assert_eq!(recorder.events(), (0..EVENTS).collect::<Vec<_>>());
    let here = thread::current().id();
    assert!(recorder.deliveries().iter().all(|d| d.thread == here));

    // The owner thread posts inline.
    source.post(EVENTS);
    assert_eq!(recorder.len(), EVENTS + 1);
    assert_eq!(MainLoop::install_main().unwrap().pending(), 0);
}
