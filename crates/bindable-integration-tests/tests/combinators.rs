//! Integration tests for derived channels.

#![allow(clippy::arithmetic_side_effects)]

use std::time::Duration;

use bindable_channel::{EventSource, MainLoop};
use bindable_test::{Recorder, TestContext, inline_source, test_queue, wait_until};

#[test]
fn map_transforms_every_event_in_order() {
    let source = EventSource::<u32>::new(MainLoop::current());
    let recorder = Recorder::new();
    let _sub = source.channel().map(|n| n * 10).subscribe(recorder.handler());

    source.post(1);
    source.post(2);
    source.post(3);

    assert_eq!(recorder.events(), vec![10, 20, 30]);
}

#[test]
fn map_can_change_the_event_type() {
    let source = inline_source::<u32>();
    let recorder = Recorder::new();
    let _sub = source
        .channel()
        .map(|n| format!("#{n}"))
        .subscribe(recorder.handler());

    source.post(7);

    assert_eq!(recorder.events(), vec!["#7".to_string()]);
}

#[test]
fn map_does_not_disturb_direct_subscribers() {
    let source = inline_source::<u32>();
    let raw = Recorder::new();
    let doubled = Recorder::new();
    let _raw = source.channel().subscribe(raw.handler());
    let _doubled = source.channel().map(|n| n * 2).subscribe(doubled.handler());

    source.post(4);

    assert_eq!(raw.events(), vec![4]);
    assert_eq!(doubled.events(), vec![8]);
    // One direct handler plus the forwarding handler of the map.
    assert_eq!(source.subscriber_count(), 2);
}

#[test]
fn mapped_channel_without_subscribers_still_runs_transform() {
    let source = inline_source::<u32>();
    let calls = Recorder::new();
    let seen = calls.clone();
    let _mapped = source.channel().map(move |n| {
        seen.record(*n);
        *n
    });

    source.post(1);

    assert_eq!(calls.events(), vec![1]);
}

#[test]
fn unsubscribing_from_mapped_channel_stops_delivery() {
    let source = inline_source::<u32>();
    let recorder = Recorder::new();
    let sub = source.channel().map(|n| n + 1).subscribe(recorder.handler());

    source.post(1);
    sub.unsubscribe();
    source.post(2);

    assert_eq!(recorder.events(), vec![2]);
}

#[test]
fn filter_passes_only_matching_events() {
    let source = inline_source::<u32>();
    let recorder = Recorder::new();
    let _sub = source
        .channel()
        .filter(|n| n % 2 == 0)
        .subscribe(recorder.handler());

    for n in 1..=6 {
        source.post(n);
    }

    assert_eq!(recorder.events(), vec![2, 4, 6]);
}

#[test]
fn mapped_channel_delivers_on_the_same_context() {
    let ctx = TestContext::new("ui");
    let source = EventSource::<u32>::new(ctx.clone());
    let recorder = Recorder::new();
    let _sub = source.channel().map(|n| n * 3).subscribe(recorder.handler());

    source.post(2);
    assert!(recorder.is_empty());

    // The forwarding handler runs first; while the context runs it is
    // current, so the mapped post delivers inline.
    assert_eq!(ctx.run_queued(), 1);
    assert_eq!(recorder.events(), vec![6]);
}

#[test]
fn chained_combinators_compose() {
    let queue = test_queue("chain");
    let source = EventSource::<u32>::new(MainLoop::current());
    let recorder = Recorder::new();
    let _sub = source
        .channel()
        .filter(|n| *n > 1)
        .map(|n| n * 100)
        .dispatch_to(queue.clone())
        .subscribe(recorder.handler());

    source.post(1);
    source.post(2);
    source.post(3);

    assert!(wait_until(Duration::from_secs(5), || recorder.len() == 2));
    assert_eq!(recorder.events(), vec![200, 300]);
    queue.shutdown();
}
