//! Logging configuration using tracing
//!
//! Diagnostics always go to a daily rolling file, never to stdout, so the
//! headless printer output stays clean. [`LogOutput::FileAndStderr`] mirrors
//! them to stderr for debugging a `--print` run or a server in a terminal.

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Environment variable controlling the log filter
pub const LOG_ENV_VAR: &str = "LOGTREE_LOG";

/// File name prefix; the appender adds `.YYYY-MM-DD` (UTC)
const LOG_FILE_PREFIX: &str = "logtree.log";

/// Crates logged at `info` when `LOGTREE_LOG` is unset
const CRATE_TARGETS: [&str; 4] = ["logtree", "logtree_core", "logtree_app", "logtree_web"];

/// Where diagnostics are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogOutput {
    #[default]
    File,
    FileAndStderr,
}

/// Initialize the logging subsystem
///
/// Log level is controlled by the `LOGTREE_LOG` environment variable.
///
/// # Examples
/// ```bash
/// LOGTREE_LOG=debug logtree app.log
/// LOGTREE_LOG=logtree_app=trace logtree --log-stderr --print app.log
/// ```
pub fn init(output: LogOutput) -> Result<()> {
    let log_dir = get_log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);

    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directives()));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_timer(fmt::time::ChronoLocal::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ));

    let stderr_layer = (output == LogOutput::FileAndStderr).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_timer(fmt::time::ChronoLocal::new("%H:%M:%S%.3f".to_string()))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    tracing::info!("Log directory: {}", log_dir.display());

    Ok(())
}

/// Filter used when `LOGTREE_LOG` is unset: our crates at info, the rest at warn
pub fn default_directives() -> String {
    let mut directives: Vec<String> = CRATE_TARGETS
        .iter()
        .map(|target| format!("{}=info", target))
        .collect();
    directives.push("warn".to_string());
    directives.join(",")
}

fn get_log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("logtree").join("logs")
}

fn log_file_name(day: NaiveDate) -> String {
    format!("{}.{}", LOG_FILE_PREFIX, day.format("%Y-%m-%d"))
}

/// Path of the file the appender is writing today
pub fn get_current_log_file() -> PathBuf {
    get_log_directory().join(log_file_name(Utc::now().date_naive()))
}
