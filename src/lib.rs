//! logtree library
//!
//! Serves an indentation-structured log file as a live, collapsible tree.
//! The binary in `main.rs` only parses arguments and calls into here.

pub mod headless;

pub use headless::{run_headless, PrintOptions};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use logtree_app::{run_invalidation_loop, FileWatcher, Settings, ViewerSession, WatcherConfig};
use logtree_core::prelude::*;
use logtree_core::logging::{self, LogOutput};
use logtree_core::TimeWindow;
use logtree_web::{serve, WebState};

/// Capacity of the watcher-to-event-loop channel
const WATCH_CHANNEL_CAPACITY: usize = 32;

/// Initialize error reporting and logging
pub fn init_runtime(output: LogOutput) -> Result<()> {
    color_eyre::install().map_err(|e| Error::server(e.to_string()))?;
    logging::init(output)?;
    debug!("Writing logs to {}", logging::get_current_log_file().display());
    Ok(())
}

/// Run the viewer server until it fails
///
/// With no `source` the document endpoint serves an informational page and
/// nothing is watched.
pub async fn run_server(source: Option<PathBuf>, settings: Settings) -> Result<()> {
    settings.validate().context("Refusing to start")?;

    info!("═══════════════════════════════════════════════════════");
    info!("logtree starting");
    match &source {
        Some(path) => info!("Source: {}", path.display()),
        None => info!("No source file configured"),
    }
    info!("═══════════════════════════════════════════════════════");

    let window = TimeWindow::from_minutes(settings.window.minutes);
    let session = Arc::new(ViewerSession::new(source.clone(), window));

    // Dropping the watcher stops it, so keep it for the server's lifetime
    let _watcher = match &source {
        Some(path) => start_watcher(path, &settings, &session)?,
        None => None,
    };

    let host = settings.server.host.as_str();
    let port = settings.server.port;
    let listener = TcpListener::bind((host, port))
        .await
        .map_err(|e| Error::server(format!("Failed to bind {}:{}: {}", host, port, e)))?;
    if let Ok(addr) = listener.local_addr() {
        eprintln!("logtree serving on http://{}", addr);
    }

    let result = serve(listener, WebState::new(session, &settings)).await;
    if let Err(ref e) = result {
        error!("Server error: {:?}", e);
    }

    info!("logtree exiting");
    result
}

/// Start watching `path`.
///
/// Recoverable failures leave the server running without live updates.
fn start_watcher(
    path: &Path,
    settings: &Settings,
    session: &Arc<ViewerSession>,
) -> Result<Option<FileWatcher>> {
    let (tx, rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
    let config = WatcherConfig::new().with_debounce_ms(settings.watcher.debounce_ms);
    let mut watcher = FileWatcher::new(path.to_path_buf(), config);

    match watcher.start(tx) {
        Ok(()) => {}
        Err(e) if e.is_recoverable() => {
            warn!("Live updates disabled: {}", e);
            return Ok(None);
        }
        Err(e) => return Err(e),
    }

    tokio::spawn(run_invalidation_loop(Arc::clone(session), rx));
    Ok(Some(watcher))
}
