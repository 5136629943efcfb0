//! Subscriber registry and non-blocking publish.
//!
//! The hub owns the only shared mutable state in the system: a
//! mutex-guarded map from subscriber id to channel sender. Many
//! connection handlers subscribe and unsubscribe concurrently while the
//! single watcher publishes; every operation takes the lock briefly and
//! never awaits while holding it.
//!
//! Channels are unbounded, so `publish` is fire-and-forget: a hung
//! client grows its own queue but can never delay delivery to other
//! subscribers or stall the watcher. Per-subscriber delivery order
//! always matches publish order.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

/// Opaque identifier for a registered subscriber channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// The fan-out hub: a dynamic set of subscriber channels fed by a
/// single publisher.
///
/// Cheap to clone; all clones share the same registry.
pub struct FeedHub<T> {
    inner: Arc<HubInner<T>>,
}

struct HubInner<T> {
    next_id: AtomicU64,
    subscribers: Mutex<HashMap<SubscriberId, mpsc::UnboundedSender<T>>>,
}

impl<T> Clone for FeedHub<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> FeedHub<T> {
    /// Create a hub with no subscribers.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HubInner {
                next_id: AtomicU64::new(0),
                subscribers: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Register a new subscriber channel and return its handle.
    ///
    /// The returned subscription deregisters itself when dropped, so
    /// every exit path of a connection handler releases its registry
    /// entry.
    pub fn subscribe(&self) -> FeedSubscription<T> {
        let id = SubscriberId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();

        if let Ok(mut subscribers) = self.inner.subscribers.lock() {
            subscribers.insert(id, tx);
        }
        tracing::debug!(subscriber = id.0, "subscriber registered");

        FeedSubscription {
            id,
            hub: self.clone(),
            rx,
        }
    }

    /// Remove a subscriber channel from the registry.
    ///
    /// Idempotent: removing an id that was already removed (or never
    /// registered) is a no-op.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let removed = self
            .inner
            .subscribers
            .lock()
            .map(|mut subscribers| subscribers.remove(&id).is_some())
            .unwrap_or(false);
        if removed {
            tracing::debug!(subscriber = id.0, "subscriber removed");
        }
    }

    /// Enqueue an event onto every currently registered subscriber
    /// channel.
    ///
    /// Never blocks: channels are unbounded, and a send to a subscriber
    /// whose receiver is already gone just prunes that entry. Returns
    /// the number of subscribers the event was delivered to.
    pub fn publish(&self, event: &T) -> usize
    where
        T: Clone,
    {
        let Ok(mut subscribers) = self.inner.subscribers.lock() else {
            return 0;
        };

        let mut delivered = 0;
        subscribers.retain(|_, tx| {
            if tx.send(event.clone()).is_ok() {
                delivered += 1;
                true
            } else {
                false
            }
        });
        delivered
    }

    /// Remove every subscriber channel at once.
    ///
    /// Dropping the senders ends each subscription's stream after its
    /// queued events are drained, letting long-lived feed responses
    /// complete during shutdown.
    pub fn close_all(&self) {
        let drained = self
            .inner
            .subscribers
            .lock()
            .map(|mut subscribers| {
                let count = subscribers.len();
                subscribers.clear();
                count
            })
            .unwrap_or(0);
        if drained > 0 {
            tracing::debug!(drained, "closed all subscriber channels");
        }
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl<T> Default for FeedHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered subscriber channel: the receiving half plus a drop
/// guard that removes the registry entry.
///
/// Owned exclusively by the connection handler that created it.
/// Implements [`Stream`], yielding events in publish order until the
/// subscription is dropped.
pub struct FeedSubscription<T> {
    id: SubscriberId,
    hub: FeedHub<T>,
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> FeedSubscription<T> {
    /// This subscription's registry id.
    pub const fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next published event.
    ///
    /// Returns `None` only after the subscription has been removed from
    /// the registry and its queue fully drained.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }
}

impl<T> Drop for FeedSubscription<T> {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}

impl<T> Stream for FeedSubscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::StreamExt;

    use super::*;

    #[tokio::test]
    async fn every_subscriber_receives_each_publish_once() {
        let hub = FeedHub::new();
        let mut subs: Vec<_> = (0..8).map(|_| hub.subscribe()).collect();

        assert_eq!(hub.publish(&"first".to_owned()), 8);
        assert_eq!(hub.publish(&"second".to_owned()), 8);

        for sub in &mut subs {
            assert_eq!(sub.recv().await.as_deref(), Some("first"));
            assert_eq!(sub.recv().await.as_deref(), Some("second"));
        }
    }

    #[tokio::test]
    async fn unsubscribed_channel_receives_nothing_further() {
        let hub = FeedHub::new();
        let mut kept = hub.subscribe();
        let mut removed = hub.subscribe();

        hub.publish(&"before".to_owned());
        hub.unsubscribe(removed.id());
        hub.publish(&"after".to_owned());

        assert_eq!(kept.recv().await.as_deref(), Some("before"));
        assert_eq!(kept.recv().await.as_deref(), Some("after"));

        // Already-queued events survive removal, later ones never arrive.
        assert_eq!(removed.recv().await.as_deref(), Some("before"));
        assert_eq!(removed.recv().await, None);
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent() {
        let hub = FeedHub::new();
        let sub = hub.subscribe();
        let other = hub.subscribe();
        let id = sub.id();

        hub.unsubscribe(id);
        hub.unsubscribe(id);
        // An id that was never registered is also a no-op.
        hub.unsubscribe(SubscriberId(9999));

        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(hub.publish(&"still works".to_owned()), 1);
        drop(other);
        drop(sub);
    }

    #[tokio::test]
    async fn slow_subscriber_does_not_delay_fast_one() {
        let hub = FeedHub::new();
        let _slow = hub.subscribe(); // never drained
        let mut fast = hub.subscribe();

        for i in 0..1000 {
            hub.publish(&format!("event-{i}"));
        }

        // The fast subscriber sees everything promptly and in order.
        for i in 0..1000 {
            let event = tokio::time::timeout(Duration::from_secs(1), fast.recv())
                .await
                .unwrap_or(None);
            assert_eq!(event, Some(format!("event-{i}")));
        }
    }

    #[tokio::test]
    async fn dropping_subscription_removes_registry_entry() {
        let hub = FeedHub::new();
        let sub = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 1);

        drop(sub);
        assert_eq!(hub.subscriber_count(), 0);
        assert_eq!(hub.publish(&"nobody home".to_owned()), 0);
    }

    #[tokio::test]
    async fn publish_prunes_closed_receivers() {
        let hub = FeedHub::new();
        let mut sub = hub.subscribe();

        // Close the receiving half while the registry entry is still
        // present; the next publish must prune it rather than error.
        sub.rx.close();

        assert_eq!(hub.publish(&"pruned".to_owned()), 0);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn concurrent_subscribe_and_publish() {
        let hub = FeedHub::new();
        let mut handles = Vec::new();

        for _ in 0..16 {
            let hub = hub.clone();
            handles.push(tokio::spawn(async move {
                let mut sub = hub.subscribe();
                sub.recv().await
            }));
        }

        // Publish until every task has registered and received.
        let publisher = {
            let hub = hub.clone();
            tokio::spawn(async move {
                loop {
                    hub.publish(&"tick".to_owned());
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
            })
        };

        for handle in handles {
            let received = tokio::time::timeout(Duration::from_secs(5), handle)
                .await
                .ok()
                .and_then(Result::ok)
                .flatten();
            assert_eq!(received.as_deref(), Some("tick"));
        }
        publisher.abort();

        // All subscriber tasks finished, so their drop guards ran.
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn close_all_ends_every_subscription() {
        let hub = FeedHub::new();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();

        hub.publish(&"last".to_owned());
        hub.close_all();
        assert_eq!(hub.subscriber_count(), 0);

        // Queued events drain, then the streams terminate.
        assert_eq!(first.recv().await.as_deref(), Some("last"));
        assert_eq!(first.recv().await, None);
        assert_eq!(second.recv().await.as_deref(), Some("last"));
        assert_eq!(second.recv().await, None);
    }

    #[tokio::test]
    async fn subscription_works_as_a_stream() {
        let hub = FeedHub::new();
        let mut sub = hub.subscribe();

        hub.publish(&"a".to_owned());
        hub.publish(&"b".to_owned());

        assert_eq!(sub.next().await.as_deref(), Some("a"));
        assert_eq!(sub.next().await.as_deref(), Some("b"));
    }
}
