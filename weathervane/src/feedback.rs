//! Feedback sinks
//!
//! A sink records `(weather, liked)` pairs. Recording is fire-and-forget:
//! the machine never sees a sink failure, so sinks log their own errors.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::{self, JoinHandle};
use tracing::{debug, info, warn};

use crate::state::Weather;

/// Durable record of a like/dislike tap.
pub trait FeedbackSink: Send + 'static {
    fn record(&self, weather: &Weather, liked: bool);
}

impl<F> FeedbackSink for F
where
    F: Fn(&Weather, bool) + Send + 'static,
{
    fn record(&self, weather: &Weather, liked: bool) {
        self(weather, liked)
    }
}

/// Writes every tap to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFeedbackSink;

impl FeedbackSink for LogFeedbackSink {
    fn record(&self, weather: &Weather, liked: bool) {
        info!(
            location = %weather.location,
            description = %weather.description,
            temperature = weather.temperature,
            liked,
            "Feedback recorded"
        );
    }
}

#[derive(Debug, Serialize)]
struct FeedbackLine<'a> {
    recorded_at: DateTime<Utc>,
    liked: bool,
    #[serde(flatten)]
    weather: &'a Weather,
}

/// Appends one JSON object per tap to a file.
///
/// `record` only serializes and queues the line. A blocking writer task
/// appends and flushes queued lines in order, so the machine's consumer
/// task never waits on the filesystem. Must be opened inside a tokio
/// runtime.
#[derive(Debug)]
pub struct JsonlFeedbackSink {
    path: PathBuf,
    tx: mpsc::UnboundedSender<String>,
    writer: JoinHandle<()>,
}

impl JsonlFeedbackSink {
    /// Open (creating parent directories) `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let writer = task::spawn_blocking({
            let path = path.clone();
            move || write_lines(file, rx, &path)
        });
        Ok(Self { path, tx, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stop accepting taps and wait until every queued line is written.
    pub async fn close(self) {
        let Self { path, tx, writer } = self;
        drop(tx);
        if let Err(err) = writer.await {
            warn!(path = %path.display(), error = %err, "Feedback writer failed");
        }
    }

    fn line(weather: &Weather, liked: bool) -> serde_json::Result<String> {
        let mut json = serde_json::to_string(&FeedbackLine {
            recorded_at: Utc::now(),
            liked,
            weather,
        })?;
        json.push('\n');
        Ok(json)
    }
}

fn write_lines(mut file: File, mut rx: mpsc::UnboundedReceiver<String>, path: &Path) {
    while let Some(line) = rx.blocking_recv() {
        let written = file
            .write_all(line.as_bytes())
            .and_then(|()| file.flush());
        if let Err(err) = written {
            warn!(path = %path.display(), error = %err, "Failed to record feedback");
        }
    }
    debug!(path = %path.display(), "Feedback writer closed");
}

impl FeedbackSink for JsonlFeedbackSink {
    fn record(&self, weather: &Weather, liked: bool) {
        let line = match Self::line(weather, liked) {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "Failed to serialize feedback");
                return;
            }
        };
        if self.tx.send(line).is_err() {
            warn!(path = %self.path.display(), "Feedback writer gone, tap dropped");
        }
    }
}
