//! Multicast hub: one producer, many independent subscribers
//!
//! A [`Hub`] fans every published value out to all current subscribers
//! without re-running whatever produced it. Each subscriber owns an
//! unbounded queue, so a slow or late subscriber never loses a value and
//! never causes the producer to repeat work (a location fix, a network
//! fetch).
//!
//! The hub also remembers the latest value and hands it to a new
//! subscriber first, which gives "current value" signals such as a location
//! provider that starts in `Loading`.
//!
//! ```ignore
//! let hub = Hub::with_initial(LocationState::Loading);
//! let a = hub.subscribe();
//! let b = hub.subscribe();
//! hub.publish(LocationState::Located(coords));
//! // both a and b observe Loading, then Located(coords)
//! ```

use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;

/// Boxed stream of hub values.
pub type HubStream<T> = Pin<Box<dyn Stream<Item = T> + Send + 'static>>;

struct Shared<T> {
    latest: Option<T>,
    subscribers: Vec<mpsc::UnboundedSender<T>>,
}

/// Lossless fan-out with latest-value memory.
///
/// Cloning a hub yields another handle to the same subscribers. Streams end
/// once every handle is dropped.
pub struct Hub<T> {
    shared: Arc<Mutex<Shared<T>>>,
}

impl<T> Clone for Hub<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Default for Hub<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::from_latest(None)
    }
}

impl<T> Hub<T>
where
    T: Clone + Send + 'static,
{
    /// Create a hub whose latest value is already `value`.
    pub fn with_initial(value: T) -> Self {
        Self::from_latest(Some(value))
    }

    fn from_latest(latest: Option<T>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                latest,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Publish a value to every subscriber. Returns how many received it.
    ///
    /// Subscribers whose stream was dropped are forgotten here.
    pub fn publish(&self, value: T) -> usize {
        // One lock for the whole fan-out: a subscriber joining concurrently
        // sees this value either as its replay or live, never both.
        let mut shared = self.shared.lock();
        shared
            .subscribers
            .retain(|tx| tx.send(value.clone()).is_ok());
        shared.latest = Some(value);
        shared.subscribers.len()
    }

    /// The most recently published value.
    pub fn latest(&self) -> Option<T> {
        self.shared.lock().latest.clone()
    }

    /// Subscribe: the latest value (if any) first, then every later value.
    pub fn subscribe(&self) -> HubStream<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut shared = self.shared.lock();
        if let Some(latest) = shared.latest.clone() {
            let _ = tx.send(latest);
        }
        shared.subscribers.push(tx);
        Box::pin(UnboundedReceiverStream::new(rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt;

    async fn first<T>(stream: HubStream<T>, n: usize) -> Vec<T> {
        stream.take(n).collect().await
    }

    #[tokio::test]
    async fn test_every_subscriber_sees_every_value() {
        let hub = Hub::default();
        let a = hub.subscribe();
        let b = hub.subscribe();

        assert_eq!(hub.publish(1), 2);
        hub.publish(2);

        assert_eq!(first(a, 2).await, vec![1, 2]);
        assert_eq!(first(b, 2).await, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_replay_starts_with_latest() {
        let hub = Hub::with_initial("loading");
        let early = hub.subscribe();
        hub.publish("located");
        let late = hub.subscribe();
        hub.publish("failed");

        assert_eq!(first(early, 3).await, vec!["loading", "located", "failed"]);
        assert_eq!(first(late, 2).await, vec!["located", "failed"]);
        assert_eq!(hub.latest(), Some("failed"));
    }

    #[tokio::test]
    async fn test_empty_hub_has_nothing_to_replay() {
        let hub = Hub::default();
        let stream = hub.subscribe();
        hub.publish(5);
        assert_eq!(first(stream, 1).await, vec![5]);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_still_updates_latest() {
        let hub = Hub::default();
        assert_eq!(hub.publish(7), 0);
        assert_eq!(hub.latest(), Some(7));
    }

    #[tokio::test]
    async fn test_idle_subscriber_misses_nothing() {
        let hub = Hub::default();
        let idle = hub.subscribe();
        for v in 0..1_000 {
            hub.publish(v);
        }
        drop(hub);

        let values: Vec<i32> = idle.collect().await;
        assert_eq!(values, (0..1_000).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_dropped_subscribers_are_forgotten() {
        let hub = Hub::default();
        let keep = hub.subscribe();
        drop(hub.subscribe());

        assert_eq!(hub.publish(1), 1);
        drop(keep);
        assert_eq!(hub.publish(2), 0);
    }

    #[tokio::test]
    async fn test_stream_ends_when_hub_dropped() {
        let hub = Hub::with_initial(1);
        let stream = hub.subscribe();
        let clone = hub.clone();
        drop(hub);
        clone.publish(2);
        drop(clone);

        let values: Vec<i32> = stream.collect().await;
        assert_eq!(values, vec![1, 2]);
    }
}
