//! Paced reveal of game log entries.
//!
//! Entries are queued on a bounded channel and handed to a [`DisplaySink`] by
//! a single consumer task, one per interval. The simulation never waits on
//! this: state is committed before its log lines are queued.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::PlaybackError;
use crate::model::LogEntry;

/// Receives log entries at display pace.
pub trait DisplaySink: Send + 'static {
    fn display(&mut self, entry: LogEntry);
}

/// In-memory log panel with a show/hide toggle.
///
/// Hiding only affects what [`LogPanel::visible`] returns; every entry is
/// still recorded, in order.
#[derive(Debug, Clone, Default)]
pub struct LogPanel {
    entries: Vec<LogEntry>,
    hidden: bool,
}

impl LogPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.hidden = !self.hidden;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn visible(&self) -> &[LogEntry] {
        if self.hidden { &[] } else { &self.entries }
    }

    /// Everything displayed so far, regardless of visibility.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }
}

impl DisplaySink for LogPanel {
    fn display(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }
}

/// Writes each entry as one JSON object per line.
///
/// The first write error stops output; it is returned by [`JsonlSink::finish`].
pub struct JsonlSink<W> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write + Send + 'static> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_entry(&mut self, entry: &LogEntry) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, entry)?;
        self.writer.write_all(b"\n")
    }
}

impl<W: Write + Send + 'static> DisplaySink for JsonlSink<W> {
    fn display(&mut self, entry: LogEntry) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.write_entry(&entry) {
            warn!(%err, "log sink write failed");
            self.error = Some(err);
        }
    }
}

struct Queued {
    epoch: u64,
    entry: LogEntry,
}

/// Cheap handle that can invalidate everything queued so far.
#[derive(Debug, Clone, Default)]
pub struct PlaybackControl {
    epoch: Arc<AtomicU64>,
}

impl PlaybackControl {
    /// Drop every entry queued before this call. Entries queued afterwards
    /// play normally.
    pub fn reset(&self) {
        let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(epoch, "log playback reset");
    }

    fn current(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }
}

/// Running playback: a queue plus the task draining it into `S`.
pub struct LogPlayback<S: DisplaySink> {
    tx: mpsc::Sender<Queued>,
    control: PlaybackControl,
    task: JoinHandle<S>,
}

impl<S: DisplaySink> LogPlayback<S> {
    /// Spawn the consumer on the current tokio runtime.
    pub fn spawn(sink: S, config: &EngineConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.log_queue_capacity.max(1));
        let control = PlaybackControl::default();
        let period = Duration::from_millis(config.log_interval_ms.max(1));
        let task = tokio::spawn(drain(rx, sink, control.clone(), period));
        Self { tx, control, task }
    }

    pub fn control(&self) -> PlaybackControl {
        self.control.clone()
    }

    /// Queue entries for display, waiting for room if the queue is full.
    pub async fn push(
        &self,
        entries: impl IntoIterator<Item = LogEntry>,
    ) -> Result<(), PlaybackError> {
        let epoch = self.control.current();
        for entry in entries {
            self.tx
                .send(Queued { epoch, entry })
                .await
                .map_err(|_| PlaybackError::Closed)?;
        }
        Ok(())
    }

    pub fn reset(&self) {
        self.control.reset();
    }

    /// Close the queue, let the consumer finish what is still valid, and
    /// hand the sink back.
    pub async fn shutdown(self) -> Result<S, PlaybackError> {
        drop(self.tx);
        Ok(self.task.await?)
    }
}

async fn drain<S: DisplaySink>(
    mut rx: mpsc::Receiver<Queued>,
    mut sink: S,
    control: PlaybackControl,
    period: Duration,
) -> S {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    while let Some(item) = rx.recv().await {
        if item.epoch != control.current() {
            continue;
        }
        ticker.tick().await;
        // A reset may have landed while we waited for our slot.
        if item.epoch != control.current() {
            continue;
        }
        sink.display(item.entry);
    }
    sink
}
