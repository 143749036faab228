//! Task manager for async operations
//!
//! One-shot async jobs (a weather fetch, a geocoding lookup) run as tokio
//! tasks whose output is an action sent back to the runtime queue.
//!
//! - Spawning with a key that is already running cancels the old task.
//! - Spawning with distinct keys (see [`TaskKey::sequenced`]) lets jobs
//!   overlap; every one of them reports back when it finishes.
//!
//! ```ignore
//! let (action_tx, mut action_rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut tasks = TaskManager::new(action_tx);
//!
//! tasks.spawn(TaskKey::sequenced("weather", 7), async move {
//!     match fetcher.fetch(coords).await {
//!         Ok(weather) => Action::WeatherDidLoad { generation: 7, weather },
//!         Err(e) => Action::WeatherDidError { generation: 7, error: e.to_string() },
//!     }
//! });
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};

use crate::Action;

/// Identifies a task for cancellation and replacement.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey(String);

impl TaskKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// A key unique per sequence number, e.g. `weather#3`.
    pub fn sequenced(name: &str, seq: u64) -> Self {
        Self(format!("{name}#{seq}"))
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TaskKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TaskKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Manages async task lifecycle with keyed cancellation.
///
/// Finished tasks are pruned lazily on the next spawn, so a long-running
/// screen that starts one fetch per location update does not accumulate
/// handles.
pub struct TaskManager<A> {
    tasks: HashMap<TaskKey, AbortHandle>,
    action_tx: mpsc::UnboundedSender<A>,
}

impl<A> TaskManager<A>
where
    A: Action,
{
    /// Create a new task manager that reports into `action_tx`.
    pub fn new(action_tx: mpsc::UnboundedSender<A>) -> Self {
        Self {
            tasks: HashMap::new(),
            action_tx,
        }
    }

    /// Spawn a task, cancelling any running task with the same key.
    ///
    /// The action returned by the future is sent to the queue when it
    /// completes. A cancelled task sends nothing.
    pub fn spawn<F>(&mut self, key: impl Into<TaskKey>, future: F) -> &mut Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        let key = key.into();

        self.prune_finished();
        self.cancel(&key);

        let tx = self.action_tx.clone();
        let handle: JoinHandle<()> = tokio::spawn(async move {
            let action = future.await;
            let _ = tx.send(action);
        });

        tracing::trace!(task = %key, "Task spawned");
        self.tasks.insert(key, handle.abort_handle());
        self
    }

    /// Cancel a task by key. No-op for unknown keys.
    pub fn cancel(&mut self, key: &TaskKey) {
        if let Some(handle) = self.tasks.remove(key) {
            if !handle.is_finished() {
                tracing::debug!(task = %key, "Task cancelled");
            }
            handle.abort();
        }
    }

    /// Cancel all running tasks.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }

    /// Forget handles of tasks that already completed.
    pub fn prune_finished(&mut self) {
        self.tasks.retain(|_, handle| !handle.is_finished());
    }
}

impl<A> Drop for TaskManager<A> {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}
