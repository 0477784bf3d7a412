//! Viewer session - the one owner of process-wide viewer state.
//!
//! Holds the watched path, the time window, the cached parse of the file and
//! the fan-out channel for live-update events. Created once at server start;
//! invalidated wholesale whenever the watcher reports a change.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc, RwLock};

use logtree_core::prelude::*;
use logtree_core::{build_forest, select_window, FileStats, LogEntry, TimeWindow};

use crate::watcher::WatchEvent;

/// Capacity of the live-update fan-out; slower viewers lag rather than block
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Events delivered to each connected viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveEvent {
    /// First frame on every connection; a page rendered at an older
    /// generation reloads, so changes missed while disconnected still land
    Hello { generation: u64 },
    /// Periodic liveness signal; the client ignores it
    Keepalive,
    /// The source file changed; the client persists its state and reloads
    Invalidate { generation: u64 },
}

impl LiveEvent {
    /// Event name on the wire
    pub fn name(&self) -> &'static str {
        match self {
            LiveEvent::Hello { .. } => "hello",
            LiveEvent::Keepalive => "keepalive",
            LiveEvent::Invalidate { .. } => "invalidate",
        }
    }
}

/// Parsed view of the file at one generation
#[derive(Debug)]
pub struct Snapshot {
    pub generation: u64,
    /// Minute bucket of the cutoff, so the window keeps sliding while cached
    pub cutoff_minute: i64,
    pub window: TimeWindow,
    pub stats: FileStats,
    pub forest: Vec<LogEntry>,
}

/// State shared by every request for one configured log source
#[derive(Debug)]
pub struct ViewerSession {
    source: Option<PathBuf>,
    window: TimeWindow,
    generation: AtomicU64,
    cache: RwLock<Option<Arc<Snapshot>>>,
    events: broadcast::Sender<LiveEvent>,
}

impl ViewerSession {
    pub fn new(source: Option<PathBuf>, window: TimeWindow) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            source,
            window,
            generation: AtomicU64::new(0),
            cache: RwLock::new(None),
            events,
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Register a new viewer. Dropping the receiver unregisters it.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.events.subscribe()
    }

    /// Number of currently registered viewers
    pub fn viewer_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Parse the window of the configured file, reusing the cache when the
    /// generation and the cutoff minute are unchanged.
    ///
    /// Returns `Ok(None)` when no file was configured.
    pub async fn snapshot(&self, now: DateTime<Utc>) -> Result<Option<Arc<Snapshot>>> {
        let Some(path) = self.source.as_deref() else {
            return Ok(None);
        };

        let generation = self.generation();
        let cutoff_minute = self.window.cutoff(now).timestamp().div_euclid(60);

        if let Some(cached) = self.cache.read().await.as_ref() {
            if cached.generation == generation && cached.cutoff_minute == cutoff_minute {
                trace!("Serving cached snapshot (generation {})", generation);
                return Ok(Some(Arc::clone(cached)));
            }
        }

        let selection = select_window(path, self.window, now).await?;
        let forest = build_forest(&selection.lines);
        let snapshot = Arc::new(Snapshot {
            generation,
            cutoff_minute,
            window: self.window,
            stats: selection.stats,
            forest,
        });

        // A change that raced with the read leaves the newer generation uncached
        if self.generation() == generation {
            *self.cache.write().await = Some(Arc::clone(&snapshot));
        }
        Ok(Some(snapshot))
    }

    /// Drop the cache and notify every viewer. Returns the new generation.
    pub async fn invalidate(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.cache.write().await.take();

        match self.events.send(LiveEvent::Invalidate { generation }) {
            Ok(viewers) => debug!("Invalidation {} sent to {} viewer(s)", generation, viewers),
            Err(_) => trace!("Invalidation {} had no viewers", generation),
        }
        generation
    }
}

/// Drain watcher events and turn them into session invalidations.
///
/// Runs on the server's event loop; the watcher thread only enqueues.
pub async fn run_invalidation_loop(
    session: Arc<ViewerSession>,
    mut watch_rx: mpsc::Receiver<WatchEvent>,
) {
    while let Some(event) = watch_rx.recv().await {
        match event {
            WatchEvent::Changed { count } => {
                debug!("Source changed ({} event(s))", count);
                session.invalidate().await;
            }
            WatchEvent::Error { message } => {
                warn!("Watching is degraded: {}", message);
            }
        }
    }
    debug!("Watcher channel closed, invalidation loop exiting");
}
