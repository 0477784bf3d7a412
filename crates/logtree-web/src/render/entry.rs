//! Entry rows: one `.entry` element per [`LogEntry`], children nested inside.
//!
//! Markup per entry:
//!
//! ```text
//! <div class="entry" data-id=ID data-depth=N>
//!   <div class="row" data-id=ID> toggle | time | level | logger | text | copy </div>
//!   <div class="children" data-parent=ID hidden> ...child entries... </div>
//! </div>
//! ```
//!
//! The children container exists only when the entry has children and always
//! starts hidden. Everything after that is decided by the client.

use std::fmt::Write;

use chrono::{DateTime, Local, SecondsFormat, Utc};

use logtree_core::ansi;
use logtree_core::prelude::*;
use logtree_core::LogEntry;

use super::escape::escape_html;

/// Glyph of a collapsed toggle; the client swaps it for [`EXPANDED_GLYPH`]
pub const COLLAPSED_GLYPH: &str = "\u{25B6}";
pub const EXPANDED_GLYPH: &str = "\u{25BC}";
/// Shown in place of the toggle for leaf entries
pub const FILLER_GLYPH: &str = "\u{00B7}";

/// Escaped newline as written by the producer
const LITERAL_NEWLINE: &str = "\\n";

fn fmt_err(e: std::fmt::Error) -> Error {
    Error::render(format!("Failed to write entry markup: {}", e))
}

/// Render a forest in file order
pub fn render_forest(forest: &[LogEntry], out: &mut String) -> Result<()> {
    for entry in forest {
        render_entry(entry, out)?;
    }
    Ok(())
}

/// Render one entry and, recursively, its children
pub fn render_entry(entry: &LogEntry, out: &mut String) -> Result<()> {
    let id = escape_html(&entry.id);
    write!(
        out,
        r#"<div class="entry" data-id="{id}" data-depth="{}">"#,
        entry.depth
    )
    .map_err(fmt_err)?;

    write!(out, r#"<div class="row" data-id="{id}">"#).map_err(fmt_err)?;
    render_toggle(entry, out)?;
    render_timestamp(entry.timestamp, out)?;

    if let Some(level) = entry.log_level {
        write!(
            out,
            r#"<span class="badge level {}">{}</span>"#,
            level.css_class(),
            level.label()
        )
        .map_err(fmt_err)?;
    }
    if let Some(logger) = &entry.logger_name {
        write!(
            out,
            r#"<span class="badge logger">{}</span>"#,
            escape_html(logger)
        )
        .map_err(fmt_err)?;
    }

    out.push_str(r#"<span class="text">"#);
    render_display_text(&entry.display_text, out)?;
    out.push_str("</span>");
    out.push_str(
        r#"<button type="button" class="copy" title="Copy raw line" aria-label="Copy raw line">&#x2398;</button>"#,
    );
    out.push_str("</div>");

    if entry.has_children() {
        write!(out, r#"<div class="children" data-parent="{id}" hidden>"#).map_err(fmt_err)?;
        render_forest(&entry.children, out)?;
        out.push_str("</div>");
    }

    out.push_str("</div>");
    Ok(())
}

fn render_toggle(entry: &LogEntry, out: &mut String) -> Result<()> {
    if entry.has_children() {
        write!(
            out,
            r#"<span class="toggle" role="button" aria-expanded="false" aria-label="Toggle children">{COLLAPSED_GLYPH}</span>"#
        )
        .map_err(fmt_err)
    } else {
        write!(
            out,
            r#"<span class="toggle filler" aria-hidden="true">{FILLER_GLYPH}</span>"#
        )
        .map_err(fmt_err)
    }
}

/// `<time>` carries the instant; the client reformats it in the viewer's locale
fn render_timestamp(timestamp: Option<DateTime<Utc>>, out: &mut String) -> Result<()> {
    match timestamp {
        Some(ts) => write!(
            out,
            r#"<time class="ts" datetime="{}">{}</time>"#,
            ts.to_rfc3339_opts(SecondsFormat::Millis, true),
            format_timestamp(ts)
        )
        .map_err(fmt_err),
        None => {
            out.push_str(r#"<span class="ts"></span>"#);
            Ok(())
        }
    }
}

/// Server-side fallback text for a timestamp
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Display text with ANSI colors as inline spans and escaped newlines as `<br>`
pub fn render_display_text(text: &str, out: &mut String) -> Result<()> {
    for segment in ansi::decode(text) {
        let escaped = escape_html(&segment.text);
        let html = escaped.replace(LITERAL_NEWLINE, "<br>");
        match segment.color {
            Some(color) => {
                write!(out, r#"<span style="color:{}">{}</span>"#, color.hex(), html)
                    .map_err(fmt_err)?
            }
            None => out.push_str(&html),
        }
    }
    Ok(())
}
