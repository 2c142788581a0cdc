//! Live subscription primitives.
//!
//! A [`Subscription`] is the receiving half of a standing query: the full
//! current result set is delivered at subscribe time and again on every
//! change, never as a delta. Dropping the subscription (or calling
//! [`Subscription::cancel`]) detaches the listener from its publisher, so
//! the owner of the value is statically the party responsible for teardown.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

/// Receiving half of a live subscription.
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<T>,
    _guard: SubscriptionGuard,
}

impl<T> Subscription<T> {
    /// Receive the next snapshot. Returns `None` once the publisher is gone.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Receive an already-buffered snapshot without waiting.
    ///
    /// The initial snapshot is buffered at subscribe time, so this never
    /// returns `None` on a freshly created subscription.
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Detach from the publisher. Equivalent to dropping the subscription.
    pub fn cancel(self) {
        drop(self);
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.rx.poll_recv(cx)
    }
}

/// Drop guard that removes the subscriber from its publisher.
struct SubscriptionGuard {
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

/// Publisher side of the live subscriptions over one query.
///
/// Cloning shares the subscriber list, so a clone stored per collection key
/// publishes to the same listeners.
#[derive(Clone)]
pub struct SubscriberSet<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

struct Inner<T> {
    next_id: u64,
    senders: HashMap<u64, mpsc::UnboundedSender<T>>,
}

impl<T: Clone + Send + 'static> SubscriberSet<T> {
    /// Create an empty subscriber set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                next_id: 0,
                senders: HashMap::new(),
            })),
        }
    }

    /// Register a subscriber, delivering `initial` immediately.
    #[must_use]
    pub fn subscribe(&self, initial: T) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        // Cannot fail: we still hold the receiver.
        let _ = tx.send(initial);

        let id = {
            let mut inner = lock(&self.inner);
            let id = inner.next_id;
            inner.next_id += 1;
            inner.senders.insert(id, tx);
            id
        };

        let inner = Arc::clone(&self.inner);
        Subscription {
            rx,
            _guard: SubscriptionGuard {
                detach: Some(Box::new(move || {
                    lock(&inner).senders.remove(&id);
                })),
            },
        }
    }

    /// Fan the current result set out to every live subscriber.
    ///
    /// Subscribers whose receiving half was dropped without running the
    /// detach guard are pruned here.
    pub fn publish(&self, value: &T) {
        let mut inner = lock(&self.inner);
        inner
            .senders
            .retain(|_, tx| tx.send(value.clone()).is_ok());
    }

    /// Number of attached subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).senders.len()
    }
}

impl<T: Clone + Send + 'static> Default for SubscriberSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(inner: &Arc<Mutex<Inner<T>>>) -> MutexGuard<'_, Inner<T>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_initial_snapshot_is_buffered() {
        let set: SubscriberSet<Vec<u32>> = SubscriberSet::new();
        let mut sub = set.subscribe(vec![]);

        // Available without any publish having happened.
        assert_eq!(sub.try_recv(), Some(vec![]));
        assert_eq!(sub.try_recv(), None);
    }

    #[tokio::test]
    async fn test_publish_reaches_all_subscribers() {
        let set: SubscriberSet<u32> = SubscriberSet::new();
        let mut a = set.subscribe(0);
        let mut b = set.subscribe(0);

        set.publish(&7);

        assert_eq!(a.recv().await, Some(0));
        assert_eq!(a.recv().await, Some(7));
        assert_eq!(b.recv().await, Some(0));
        assert_eq!(b.recv().await, Some(7));
    }

    #[tokio::test]
    async fn test_snapshots_arrive_in_publish_order() {
        let set: SubscriberSet<u32> = SubscriberSet::new();
        let mut sub = set.subscribe(0);

        set.publish(&1);
        set.publish(&2);
        set.publish(&3);

        assert_eq!(sub.recv().await, Some(0));
        assert_eq!(sub.recv().await, Some(1));
        assert_eq!(sub.recv().await, Some(2));
        assert_eq!(sub.recv().await, Some(3));
    }

    #[tokio::test]
    async fn test_drop_detaches_subscriber() {
        let set: SubscriberSet<u32> = SubscriberSet::new();
        let sub = set.subscribe(0);
        assert_eq!(set.subscriber_count(), 1);

        drop(sub);
        assert_eq!(set.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_detaches_subscriber() {
        let set: SubscriberSet<u32> = SubscriberSet::new();
        let sub = set.subscribe(0);
        sub.cancel();
        assert_eq!(set.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscription_is_a_stream() {
        let set: SubscriberSet<u32> = SubscriberSet::new();
        let mut sub = set.subscribe(1);
        set.publish(&2);

        assert_eq!(sub.next().await, Some(1));
        assert_eq!(sub.next().await, Some(2));
    }
}
