//! Integration tests for the async receiver bridge.

use std::sync::Arc;
use std::time::Duration;

use bindable_channel::{EventSource, MainLoop};
use bindable_test::{inline_source, test_queue};

#[tokio::test]
async fn receiver_on_dispatched_channel_sees_only_filtered_events() {
    let queue = test_queue("filtered");
    let source = EventSource::<u32>::new(MainLoop::current());
    let mut receiver = source
        .channel()
        .filter(|n| *n >= 10)
        .dispatch_to(queue.clone())
        .receiver();

    for n in [1, 10, 2, 20] {
        source.post(n);
    }

    let first = tokio::time::timeout(Duration::from_secs(5), receiver.recv())
        .await
        .unwrap()
        .unwrap();
    let second = tokio::time::timeout(Duration::from_secs(5), receiver.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!((*first, *second), (10, 20));
    assert!(receiver.try_recv().is_none());
    queue.shutdown();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn receiver_bridges_events_from_a_serial_queue() {
    let queue = test_queue("bridge");
    let source = Arc::new(EventSource::<String>::new(queue.clone()));
    let mut receiver = source.channel().receiver();

    let poster = Arc::clone(&source);
    tokio::task::spawn_blocking(move || {
        for n in 0..3 {
            poster.post(format!("event-{n}"));
        }
    })
    .await
    .unwrap();

    let mut received = Vec::new();
    for _ in 0..3 {
        let event = tokio::time::timeout(Duration::from_secs(5), receiver.recv())
            .await
            .unwrap()
            .unwrap();
        received.push(event.as_str().to_string());
    }

    assert_eq!(received, vec!["event-0", "event-1", "event-2"]);
    queue.shutdown();
}

#[tokio::test]
async fn shared_events_reach_the_receiver_without_copying() {
    let source = inline_source::<Vec<u8>>();
    let mut receiver = source.channel().receiver();
    let payload = Arc::new(vec![1, 2, 3]);

    source.post_shared(Arc::clone(&payload));

    let received = receiver.recv().await.unwrap();
    assert!(Arc::ptr_eq(&received, &payload));
}
