//! Time-window selection and file statistics.
//!
//! The file is streamed line by line; memory is bounded by the lines that
//! survive the window, never by the file size.
//!
//! Policies:
//! - Lines without a detectable timestamp count towards `total_records` but
//!   are never part of the window.
//! - The cutoff is inclusive: a line stamped exactly `now - window` is kept.
//! - A final line without a terminating newline is still being written and is
//!   skipped entirely (it appears in neither count) until it is terminated.
//! - Invalid UTF-8 is replaced, never fatal.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::parse::find_timestamp;
use crate::types::FileStats;

/// Default window length in minutes
pub const DEFAULT_WINDOW_MINUTES: u32 = 60;

/// A trailing window of wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    minutes: u32,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_WINDOW_MINUTES)
    }
}

impl TimeWindow {
    pub fn from_minutes(minutes: u32) -> Self {
        Self { minutes }
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Earliest instant still inside the window
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::minutes(i64::from(self.minutes))
    }
}

/// Lines that entered the window plus counters over the whole file
#[derive(Debug, Clone, Default)]
pub struct WindowSelection {
    pub stats: FileStats,
    /// In-window lines in file order, indentation preserved
    pub lines: Vec<String>,
}

/// Read `path` and keep the lines stamped at or after `now - window`
pub async fn select_window(
    path: &Path,
    window: TimeWindow,
    now: DateTime<Utc>,
) -> Result<WindowSelection> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| Error::source_unavailable(path, e.to_string()))?;
    let size_bytes = file
        .metadata()
        .await
        .map_err(|e| Error::source_unavailable(path, e.to_string()))?
        .len();

    let mut selection = select_from_reader(BufReader::new(file), window.cutoff(now)).await?;
    selection.stats.size_bytes = size_bytes;

    debug!(
        "Selected {}/{} records from {} ({} window)",
        selection.stats.records_in_window,
        selection.stats.total_records,
        path.display(),
        window.minutes()
    );
    Ok(selection)
}

/// Stream lines from any buffered reader, partitioning them by `cutoff`.
///
/// `size_bytes` is left at zero; callers reading from a file fill it in.
pub async fn select_from_reader<R>(mut reader: R, cutoff: DateTime<Utc>) -> Result<WindowSelection>
where
    R: AsyncBufRead + Unpin,
{
    let mut selection = WindowSelection::default();
    let mut buf = Vec::with_capacity(256);

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        if buf.last() != Some(&b'\n') {
            trace!("Skipping unterminated final line ({} bytes)", buf.len());
            break;
        }

        let decoded = String::from_utf8_lossy(&buf);
        let line = decoded.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            continue;
        }

        selection.stats.total_records += 1;
        if let Some((timestamp, _)) = find_timestamp(line) {
            if timestamp >= cutoff {
                selection.stats.records_in_window += 1;
                selection.lines.push(line.to_string());
            }
        }
    }

    Ok(selection)
}
