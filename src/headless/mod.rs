//! Headless mode - print the tree to stdout instead of serving it
//!
//! Uses the same filter and view-mode engine as the browser client, with
//! every entry expanded in structured mode.

pub mod runner;

pub use runner::run_headless;

use logtree_app::{TreeView, VisibleRow};
use logtree_core::{strip_ansi_codes, FileStats, LogEntry, TimeWindow};
use logtree_web::render::entry::format_timestamp;

/// Indentation per depth level in printed output
const PRINT_INDENT: &str = "  ";

/// What to print
#[derive(Debug, Clone, Default)]
pub struct PrintOptions {
    /// Case-insensitive substring filter over raw text
    pub filter: Option<String>,
    /// Flat depth-first list instead of an indented tree
    pub plain: bool,
}

/// One printed line for an entry, ANSI stripped
pub fn format_entry(entry: &LogEntry, indent: bool) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(4);
    if let Some(ts) = entry.timestamp {
        parts.push(format_timestamp(ts));
    }
    if let Some(level) = entry.log_level {
        parts.push(format!("{:<5}", level.label()));
    }
    if let Some(logger) = &entry.logger_name {
        parts.push(format!("[{}]", logger));
    }
    parts.push(strip_ansi_codes(&entry.display_text));

    let line = parts.join(" ");
    if indent {
        format!("{}{}", PRINT_INDENT.repeat(entry.depth), line)
    } else {
        line
    }
}

/// Lines for every row the view currently shows
pub fn format_rows(view: &TreeView<'_>) -> Vec<String> {
    let indent = !view.mode().is_plain();
    view.visible_rows()
        .iter()
        .map(|row: &VisibleRow<'_>| format_entry(row.entry, indent))
        .collect()
}

/// Closing summary line
pub fn format_stats(stats: &FileStats, window: TimeWindow, visible: usize) -> String {
    format!(
        "{} | {} records | {} in last {} min | {} visible",
        stats.formatted_size(),
        stats.total_records,
        stats.records_in_window,
        window.minutes(),
        visible
    )
}
