//! Full-page documents: the interactive tree and the no-source info page

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use logtree_app::Snapshot;
use logtree_core::prelude::*;
use logtree_core::{count_entries, depth_first};

use super::entry::render_forest;
use super::escape::{escape_html, script_json};

/// Per-page values the client needs besides the tree itself
#[derive(Debug, Clone)]
pub struct PageContext<'a> {
    pub title: &'a str,
    /// Full client storage key (`namespace:source`)
    pub storage_key: &'a str,
    /// Shown in the header; usually the file path
    pub source_label: &'a str,
    pub events_url: &'a str,
}

/// Configuration block read by `client.js`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientConfig<'a> {
    storage_key: &'a str,
    events_url: &'a str,
    generation: u64,
}

fn fmt_err(e: std::fmt::Error) -> Error {
    Error::render(format!("Failed to write document markup: {}", e))
}

fn write_head(out: &mut String, title: &str) -> Result<()> {
    write!(
        out,
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n",
            "<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
            "<title>{}</title>\n",
            "<link rel=\"stylesheet\" href=\"/static/style.css\">\n",
            "</head>\n",
        ),
        escape_html(title)
    )
    .map_err(fmt_err)
}

/// Render the interactive document for one snapshot
pub fn render_document(snapshot: &Snapshot, page: &PageContext<'_>) -> Result<String> {
    let total_entries = count_entries(&snapshot.forest);
    let mut out = String::with_capacity(4096 + total_entries * 512);

    write_head(&mut out, page.title)?;
    out.push_str("<body>\n<header class=\"toolbar\">\n");
    write!(
        out,
        r#"<h1>{}</h1><span class="source" title="{source}">{source}</span>"#,
        escape_html(page.title),
        source = escape_html(page.source_label)
    )
    .map_err(fmt_err)?;
    out.push_str(
        r#"<span id="live-status" class="live-status" data-state="connecting">connecting</span>"#,
    );
    out.push('\n');

    // Stats panel
    let stats = &snapshot.stats;
    write!(
        out,
        concat!(
            "<dl class=\"stats\">",
            "<div><dt>File size</dt><dd>{}</dd></div>",
            "<div><dt>Total records</dt><dd>{}</dd></div>",
            "<div><dt>In window</dt><dd>{}</dd></div>",
            "<div><dt>Window</dt><dd>{} min</dd></div>",
            "<div><dt>Visible</dt><dd id=\"visible-count\">{}</dd></div>",
            "</dl>\n",
        ),
        stats.formatted_size(),
        stats.total_records,
        stats.records_in_window,
        snapshot.window.minutes(),
        total_entries
    )
    .map_err(fmt_err)?;

    // Controls
    out.push_str(concat!(
        "<div class=\"controls\">",
        "<input id=\"filter\" type=\"search\" placeholder=\"Filter (press /)\" autocomplete=\"off\" spellcheck=\"false\">",
        "<button type=\"button\" id=\"mode-toggle\">Plain view</button>",
        "<button type=\"button\" id=\"collapse-all\">Collapse all</button>",
        "<button type=\"button\" id=\"expand-all\">Expand all</button>",
        "</div>\n",
        "</header>\n",
    ));

    // Tree, plus the flat list the client fills in plain mode
    out.push_str("<main id=\"tree\" class=\"tree\">");
    if snapshot.forest.is_empty() {
        write!(
            out,
            r#"<p class="empty">No records in the last {} minutes.</p>"#,
            snapshot.window.minutes()
        )
        .map_err(fmt_err)?;
    } else {
        render_forest(&snapshot.forest, &mut out)?;
    }
    out.push_str("</main>\n<ol id=\"plain-view\" class=\"plain-view\" hidden></ol>\n");

    // Raw text by id, for verbatim copy and filtering. Duplicate lines share
    // an id and a raw text, so collapsing them here loses nothing.
    let raw_lines: BTreeMap<&str, &str> = depth_first(&snapshot.forest)
        .map(|entry| (entry.id.as_str(), entry.raw_text.as_str()))
        .collect();
    let config = ClientConfig {
        storage_key: page.storage_key,
        events_url: page.events_url,
        generation: snapshot.generation,
    };
    write!(
        out,
        concat!(
            "<script id=\"raw-lines\" type=\"application/json\">{}</script>\n",
            "<script id=\"logtree-config\" type=\"application/json\">{}</script>\n",
            "<script src=\"/static/client.js\" defer></script>\n",
            "</body>\n</html>\n",
        ),
        script_json(&raw_lines)?,
        script_json(&config)?
    )
    .map_err(fmt_err)?;

    Ok(out)
}

/// Informational page served when no log file was configured
pub fn render_no_source_page(title: &str) -> Result<String> {
    let mut out = String::with_capacity(1024);
    write_head(&mut out, title)?;
    write!(
        out,
        concat!(
            "<body>\n<main class=\"info\">\n",
            "<h1>{}</h1>\n",
            "<p>No log file was configured.</p>\n",
            "<p>Start the viewer with a file to watch: <code>logtree path/to/app.log</code></p>\n",
            "</main>\n</body>\n</html>\n",
        ),
        escape_html(title)
    )
    .map_err(fmt_err)?;
    Ok(out)
}
