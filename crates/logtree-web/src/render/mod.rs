//! HTML rendering
//!
//! The server decides structure and initial state only (children start
//! collapsed); all later visibility is the client's job.

pub mod document;
pub mod entry;
pub mod escape;

pub use document::{render_document, render_no_source_page, PageContext};
pub use entry::{render_display_text, render_entry, render_forest};
pub use escape::{escape_html, script_json};
