//! Async bridge for channel events.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::subscription::Subscription;

/// Receives a channel's events from async code.
///
/// Created by [`Channel::receiver`](crate::Channel::receiver). Events are
/// queued as they are delivered by the channel's source, on the source's
/// context, and read in delivery order.
pub struct EventReceiver<T> {
    rx: mpsc::UnboundedReceiver<Arc<T>>,
    subscription: Subscription,
}

impl<T> EventReceiver<T> {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<Arc<T>>, subscription: Subscription) -> Self {
        Self { rx, subscription }
    }

    /// Receive the next event.
    ///
    /// Returns `None` once the channel's source is gone and every queued
    /// event has been read.
    pub async fn recv(&mut self) -> Option<Arc<T>> {
        self.rx.recv().await
    }

    /// Receive the next event without waiting.
    ///
    /// Returns `None` if no event is queued or the source is gone.
    pub fn try_recv(&mut self) -> Option<Arc<T>> {
        self.rx.try_recv().ok()
    }

    /// The subscription feeding this receiver.
    #[must_use]
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

impl<T> Drop for EventReceiver<T> {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

impl<T> std::fmt::Debug for EventReceiver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventReceiver")
            .field("subscription", &self.subscription)
            .field("queued", &self.rx.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{EventSource, Inline, SerialQueue};
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_receiver_gets_events_in_order() {
        let source = EventSource::<u32>::new(Inline);
        let mut receiver = source.channel().receiver();

        source.post(1);
        source.post(2);

        assert_eq!(*receiver.recv().await.unwrap(), 1);
        assert_eq!(*receiver.recv().await.unwrap(), 2);
        assert!(receiver.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_receiver_closes_with_source() {
        let source = EventSource::<u32>::new(Inline);
        let mut receiver = source.channel().receiver();
        source.post(9);
        drop(source);

        assert_eq!(*receiver.recv().await.unwrap(), 9);
        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_drop_unsubscribes() {
        let source = EventSource::<u32>::new(Inline);
        let receiver = source.channel().receiver();
        assert_eq!(source.subscriber_count(), 1);

        drop(receiver);
        assert_eq!(source.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_receiver_from_serial_queue() {
        let queue = SerialQueue::new("bridge").unwrap();
        let source = EventSource::<&'static str>::new(queue);
        let mut receiver = source.channel().receiver();

        source.post("off-thread");

        let event = timeout(Duration::from_secs(5), receiver.recv())
            .await
            .expect("timed out")
            .expect("closed");
        assert_eq!(*event, "off-thread");
    }
}
