//! File watcher module for live updates
//!
//! Watches the directory containing the log file and reports debounced
//! changes to that one file. Watching the directory instead of the file keeps
//! working across truncation and rotate-by-rename.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_full::{new_debouncer, DebounceEventResult};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use logtree_core::prelude::{Error, Result};

/// Default debounce duration in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Messages sent from the watcher thread to the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// The watched file changed; `count` debounced events in this batch
    Changed { count: usize },
    /// Watching failed or degraded; the process keeps running
    Error { message: String },
}

/// Configuration for the file watcher
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Debounce duration
    pub debounce: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

impl WatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set debounce duration in milliseconds
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce = Duration::from_millis(ms);
        self
    }
}

/// Watches a single log file
pub struct FileWatcher {
    /// File being watched
    path: PathBuf,
    /// Configuration
    config: WatcherConfig,
    /// Handle to stop the watcher
    stop_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl FileWatcher {
    /// Create a new watcher for the given file
    pub fn new(path: PathBuf, config: WatcherConfig) -> Self {
        Self {
            path,
            config,
            stop_tx: None,
        }
    }

    /// Start watching for file changes
    ///
    /// Sends `WatchEvent::Changed` or `WatchEvent::Error` to the channel.
    /// The callback never parses anything; it only enqueues.
    pub fn start(&mut self, event_tx: mpsc::Sender<WatchEvent>) -> Result<()> {
        if self.is_running() {
            return Err(Error::watch("Watcher is already running"));
        }

        let Some(file_name) = self.path.file_name().map(|n| n.to_os_string()) else {
            return Err(Error::watch(format!(
                "Not a file path: {}",
                self.path.display()
            )));
        };

        let dir = watch_dir(&self.path);
        let config = self.config.clone();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel();

        self.stop_tx = Some(stop_tx);

        // Spawn the watcher in a blocking task
        tokio::task::spawn_blocking(move || {
            Self::run_watcher(dir, file_name, config, event_tx, stop_rx);
        });

        Ok(())
    }

    /// Stop the file watcher
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Check if watcher is running
    pub fn is_running(&self) -> bool {
        self.stop_tx.is_some()
    }

    /// Internal: run the blocking watcher
    fn run_watcher(
        dir: PathBuf,
        file_name: OsString,
        config: WatcherConfig,
        event_tx: mpsc::Sender<WatchEvent>,
        mut stop_rx: tokio::sync::oneshot::Receiver<()>,
    ) {
        let tx_clone = event_tx.clone();
        let target = file_name.clone();

        let debouncer_result = new_debouncer(
            config.debounce,
            None, // No tick rate override
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    let relevant = events
                        .iter()
                        .filter(|event| {
                            event
                                .paths
                                .iter()
                                .any(|path| path.file_name() == Some(target.as_os_str()))
                        })
                        .count();

                    if relevant == 0 {
                        return;
                    }

                    debug!("File watcher detected {} change(s)", relevant);
                    if let Err(e) = send_event(&tx_clone, WatchEvent::Changed { count: relevant }) {
                        debug!("{}", e);
                    }
                }
                Err(errors) => {
                    for error in errors {
                        warn!("File watcher error: {:?}", error);
                        let event = WatchEvent::Error {
                            message: error.to_string(),
                        };
                        if let Err(e) = send_event(&tx_clone, event) {
                            debug!("{}", e);
                        }
                    }
                }
            },
        );

        let mut debouncer = match debouncer_result {
            Ok(d) => d,
            Err(e) => {
                error!("Failed to create file watcher: {}", e);
                let _ = send_event(
                    &event_tx,
                    WatchEvent::Error {
                        message: format!("Failed to create watcher: {}", e),
                    },
                );
                return;
            }
        };

        if let Err(e) = debouncer.watch(&dir, RecursiveMode::NonRecursive) {
            warn!("Failed to watch {}: {}", dir.display(), e);
            let _ = send_event(
                &event_tx,
                WatchEvent::Error {
                    message: format!("Failed to watch {}: {}", dir.display(), e),
                },
            );
            return;
        }
        info!(
            "Watching: {}",
            dir.join(Path::new(&file_name)).display()
        );

        // Keep running until stop signal
        loop {
            match stop_rx.try_recv() {
                Ok(()) | Err(tokio::sync::oneshot::error::TryRecvError::Closed) => {
                    info!("File watcher stopping");
                    break;
                }
                Err(tokio::sync::oneshot::error::TryRecvError::Empty) => {
                    std::thread::sleep(Duration::from_millis(100));
                }
            }
        }
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Hand an event to the event loop from the watcher thread
fn send_event(tx: &mpsc::Sender<WatchEvent>, event: WatchEvent) -> Result<()> {
    tx.blocking_send(event)
        .map_err(|e| Error::channel_send(format!("Event loop is gone, dropping {:?}", e.0)))
}

/// Directory to watch for `path`; a bare file name means the current directory
fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
