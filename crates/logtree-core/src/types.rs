//! Core domain type definitions

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::parse::{entry_id, extract_fields};

/// Log severity levels recognised in a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl LogLevel {
    /// Parse a level token, case-insensitively.
    ///
    /// `WARN` and `WARNING` both map to [`LogLevel::Warning`]; Python's
    /// `CRITICAL` maps to [`LogLevel::Fatal`].
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "TRACE" => Some(LogLevel::Trace),
            "DEBUG" => Some(LogLevel::Debug),
            "INFO" => Some(LogLevel::Info),
            "WARN" | "WARNING" => Some(LogLevel::Warning),
            "ERROR" => Some(LogLevel::Error),
            "FATAL" | "CRITICAL" => Some(LogLevel::Fatal),
            _ => None,
        }
    }

    /// Badge label shown in the rendered row
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// CSS class suffix used for badge coloring
    pub fn css_class(&self) -> &'static str {
        match self {
            LogLevel::Trace => "level-trace",
            LogLevel::Debug => "level-debug",
            LogLevel::Info => "level-info",
            LogLevel::Warning => "level-warn",
            LogLevel::Error => "level-error",
            LogLevel::Fatal => "level-fatal",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One parsed, hierarchical log record.
///
/// Children are owned exclusively by their parent and kept in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Truncated digest of `raw_text`; the only key shared with client view state
    pub id: String,
    /// Original line content minus leading indentation
    pub raw_text: String,
    /// Number of leading indentation units
    pub depth: usize,
    /// `raw_text` without timestamp, level and logger
    pub display_text: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub log_level: Option<LogLevel>,
    pub logger_name: Option<String>,
    pub children: Vec<LogEntry>,
}

impl LogEntry {
    /// Parse one indentation-stripped line at the given depth.
    ///
    /// Never fails; fields that cannot be extracted are left empty.
    pub fn parse(raw_text: impl Into<String>, depth: usize) -> Self {
        let raw_text = raw_text.into();
        let fields = extract_fields(&raw_text);
        Self {
            id: entry_id(&raw_text),
            depth,
            display_text: fields.display_text,
            timestamp: fields.timestamp,
            log_level: fields.level,
            logger_name: fields.logger,
            raw_text,
            children: Vec::new(),
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of entries in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(LogEntry::subtree_len).sum::<usize>()
    }
}

/// File-level counters computed during window selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStats {
    pub size_bytes: u64,
    /// Every non-blank, fully terminated line
    pub total_records: u64,
    /// Lines whose timestamp is at or after the window cutoff
    pub records_in_window: u64,
}

impl FileStats {
    /// Human-readable file size (`512 B`, `1.5 KiB`, `3.2 MiB`)
    pub fn formatted_size(&self) -> String {
        const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
        if self.size_bytes < 1024 {
            return format!("{} B", self.size_bytes);
        }
        let mut value = self.size_bytes as f64 / 1024.0;
        let mut unit = 0;
        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        format!("{:.1} {}", value, UNITS[unit])
    }
}
