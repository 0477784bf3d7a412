//! Line-level field extraction.
//!
//! A line produced by the indenting formatter looks like
//!
//! ```text
//! \t\t2025-01-01T12:00:00.123456+00:00 - INFO - Planner - planning started
//! ```
//!
//! Each field is extracted independently and may be missing. Nothing in this
//! module can fail: a line that matches none of the patterns keeps its whole
//! trimmed text as the display text.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::{Captures, Regex};
use sha2::{Digest, Sha256};

use crate::types::LogLevel;

/// The only character that establishes nesting
pub const INDENT_UNIT: char = '\t';

/// Width of the hex digest prefix used as entry id
pub const ID_HEX_LEN: usize = 16;

/// ISO-8601-like timestamp, found anywhere in the line.
///
/// Accepts `T` or space between date and time, `.` or `,` before the
/// fraction, and an optional `Z` / `±HH:MM` / `±HHMM` zone.
static TIMESTAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        (\d{4})-(\d{2})-(\d{2})           # date
        [T\ ]
        (\d{2}):(\d{2}):(\d{2})           # time
        (?:[.,](\d+))?                    # fraction
        ([Zz]|[+-]\d{2}:?\d{2})?          # zone
        ",
    )
    .expect("Timestamp regex pattern is valid")
});

/// `LEVEL -` at the start of the remainder, optionally preceded by `- `
static LEVEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:-\s*)?(trace|debug|info|warning|warn|error|fatal|critical)(?:\s+-(?:\s+|$)|\s*$)",
    )
    .expect("Level regex pattern is valid")
});

/// A lone `-` or `|` left between a removed timestamp and the rest
static SEPARATOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-|](?:\s+|$)").expect("Separator regex pattern is valid")
});

/// `logger -` directly after the level
static LOGGER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+-(?:\s+|$)").expect("Logger regex pattern is valid")
});

/// Fields pulled out of a single line
#[derive(Debug, Clone, PartialEq)]
pub struct LineFields {
    pub timestamp: Option<DateTime<Utc>>,
    pub level: Option<LogLevel>,
    pub logger: Option<String>,
    pub display_text: String,
}

/// Split a raw line into its indentation depth and the remaining text.
///
/// Only leading tab characters count; spaces are content.
pub fn split_indent(line: &str) -> (usize, &str) {
    let rest = line.trim_start_matches(INDENT_UNIT);
    let depth = line.len() - rest.len();
    (depth, rest)
}

/// Stable identifier for a line: truncated SHA-256 of the raw text.
///
/// Identical raw text always yields the identical id.
pub fn entry_id(raw_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_text.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..ID_HEX_LEN].to_string()
}

/// Locate and parse the first timestamp in `text`.
///
/// Returns the parsed instant and the byte range it occupied. A match that is
/// not a real calendar instant (month 13, hour 25) is treated as absent.
pub fn find_timestamp(text: &str) -> Option<(DateTime<Utc>, std::ops::Range<usize>)> {
    let caps = TIMESTAMP_PATTERN.captures(text)?;
    let range = caps.get(0)?.range();
    let instant = instant_from_captures(&caps)?;
    Some((instant, range))
}

fn instant_from_captures(caps: &Captures<'_>) -> Option<DateTime<Utc>> {
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let year = caps.get(1)?.as_str().parse::<i32>().ok()?;
    let date = NaiveDate::from_ymd_opt(year, num(2)?, num(3)?)?;
    let nanos = caps.get(7).map(|m| fraction_to_nanos(m.as_str())).unwrap_or(0);
    let time = NaiveTime::from_hms_nano_opt(num(4)?, num(5)?, num(6)?, nanos)?;
    let naive = NaiveDateTime::new(date, time);

    match caps.get(8).map(|m| m.as_str()) {
        Some("Z") | Some("z") => Some(Utc.from_utc_datetime(&naive)),
        Some(zone) => {
            let offset = parse_offset(zone)?;
            offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc))
        }
        None => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

/// `"123456"` → 123_456_000 nanoseconds; digits beyond nanosecond precision are dropped
fn fraction_to_nanos(digits: &str) -> u32 {
    let truncated: String = digits.chars().take(9).collect();
    let padded = format!("{:0<9}", truncated);
    padded.parse().unwrap_or(0)
}

/// `+05:30`, `-0800` → FixedOffset
fn parse_offset(zone: &str) -> Option<FixedOffset> {
    let sign = if zone.starts_with('-') { -1 } else { 1 };
    let digits: String = zone[1..].chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 4 {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Extract timestamp, level, logger and display text from an
/// indentation-stripped line, in that order.
pub fn extract_fields(raw_text: &str) -> LineFields {
    let (timestamp, remainder) = match find_timestamp(raw_text) {
        Some((instant, range)) => {
            let without = format!("{}{}", &raw_text[..range.start], &raw_text[range.end..]);
            let trimmed = without.trim();
            let rest = match SEPARATOR_PATTERN.find(trimmed) {
                Some(separator) => &trimmed[separator.end()..],
                None => trimmed,
            };
            (Some(instant), rest.to_string())
        }
        None => (None, raw_text.trim().to_string()),
    };

    let Some(level_caps) = LEVEL_PATTERN.captures(&remainder) else {
        return LineFields {
            timestamp,
            level: None,
            logger: None,
            display_text: remainder,
        };
    };

    let level = LogLevel::from_token(&level_caps[1]);
    let after_level = &remainder[level_caps.get(0).map(|m| m.end()).unwrap_or(0)..];

    let (logger, display_text) = match LOGGER_PATTERN.captures(after_level) {
        Some(logger_caps) => {
            let end = logger_caps.get(0).map(|m| m.end()).unwrap_or(0);
            (
                Some(logger_caps[1].to_string()),
                after_level[end..].trim().to_string(),
            )
        }
        None => (None, after_level.trim().to_string()),
    };

    LineFields {
        timestamp,
        level,
        logger,
        display_text,
    }
}
