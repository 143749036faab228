//! Long-lived action sources
//!
//! A subscription forwards an ongoing source (a location stream) into the
//! runtime's action queue. Unlike tasks they do not complete on their own.
//!
//! ```ignore
//! let mut subs = Subscriptions::new(action_tx);
//! subs.stream("location", provider.current_location().map(Action::LocationDidChange));
//! ```

use std::collections::HashMap;
use std::fmt;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};

use crate::Action;

/// Identifies a subscription for cancellation.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubKey(String);

impl SubKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for SubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for SubKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

/// Manages subscriptions that continuously emit actions.
pub struct Subscriptions<A> {
    handles: HashMap<SubKey, JoinHandle<()>>,
    action_tx: mpsc::UnboundedSender<A>,
}

impl<A> Subscriptions<A>
where
    A: Action,
{
    pub fn new(action_tx: mpsc::UnboundedSender<A>) -> Self {
        Self {
            handles: HashMap::new(),
            action_tx,
        }
    }

    /// Forward every stream item as an action, in stream order.
    ///
    /// Replaces an existing subscription with the same key. The
    /// subscription ends when the stream ends or the queue is closed.
    pub fn stream<S>(&mut self, key: impl Into<SubKey>, stream: S) -> &mut Self
    where
        S: Stream<Item = A> + Send + 'static,
    {
        let key = key.into();
        self.cancel(&key);

        let tx = self.action_tx.clone();
        let name = key.clone();
        let handle = tokio::spawn(async move {
            tokio::pin!(stream);
            while let Some(action) = stream.next().await {
                if tx.send(action).is_err() {
                    break;
                }
            }
            tracing::debug!(subscription = %name, "Stream subscription ended");
        });

        self.handles.insert(key, handle);
        self
    }

    /// Cancel a subscription by key. No-op for unknown keys.
    pub fn cancel(&mut self, key: &SubKey) {
        if let Some(handle) = self.handles.remove(key) {
            handle.abort();
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}

impl<A> Drop for Subscriptions<A> {
    fn drop(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_stream::wrappers::UnboundedReceiverStream;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Value(usize),
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            "Value"
        }
    }

    fn source() -> (
        mpsc::UnboundedSender<TestAction>,
        UnboundedReceiverStream<TestAction>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, UnboundedReceiverStream::new(rx))
    }

    #[tokio::test]
    async fn test_stream_forwards_items_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut subs = Subscriptions::new(tx);

        subs.stream(
            "values",
            tokio_stream::iter(vec![
                TestAction::Value(1),
                TestAction::Value(2),
                TestAction::Value(3),
            ]),
        );

        let mut values = vec![];
        for _ in 0..3 {
            if let Some(TestAction::Value(v)) = rx.recv().await {
                values.push(v);
            }
        }
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_subscription() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut subs = Subscriptions::new(tx);
        let (source_tx, stream) = source();

        subs.stream("location", stream);
        source_tx.send(TestAction::Value(1)).unwrap();
        assert_eq!(rx.recv().await, Some(TestAction::Value(1)));

        subs.cancel(&SubKey::new("location"));
        tokio::task::yield_now().await;
        let _ = source_tx.send(TestAction::Value(2));

        let result = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(result.is_err(), "nothing forwarded after cancel");
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_key_replaces_and_cancel_all() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut subs = Subscriptions::new(tx);
        let (old_tx, old_stream) = source();
        let (new_tx, new_stream) = source();
        let (other_tx, other_stream) = source();

        subs.stream("location", old_stream);
        subs.stream("location", new_stream);
        subs.stream("other", other_stream);
        assert_eq!(subs.handles.len(), 2);

        tokio::task::yield_now().await;
        let _ = old_tx.send(TestAction::Value(1));
        new_tx.send(TestAction::Value(2)).unwrap();
        assert_eq!(rx.recv().await, Some(TestAction::Value(2)));

        subs.cancel_all();
        assert!(subs.handles.is_empty());
        tokio::task::yield_now().await;
        let _ = other_tx.send(TestAction::Value(3));

        let result = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(result.is_err());
    }
}
