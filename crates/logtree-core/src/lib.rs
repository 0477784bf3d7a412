//! # logtree-core - Core Domain Types
//!
//! Foundation crate for logtree. Provides domain types, error handling,
//! line parsing, tree construction, ANSI decoding and time-window selection.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, regex, sha2, tokio, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`LogEntry`] - One parsed hierarchical record
//! - [`LogLevel`] - Detected severity
//! - [`FileStats`] - Size and record counters for the source file
//!
//! ### Parsing (`parse`, `tree`)
//! - [`extract_fields()`] - Timestamp / level / logger / display text
//! - [`entry_id()`] - Content-addressed entry identity
//! - [`build_forest()`] - Indentation-to-tree construction
//! - [`depth_first()`] - Pre-order traversal in file order
//!
//! ### ANSI (`ansi`)
//! - [`decode()`](ansi::decode) - SGR colors to flat [`StyledSegment`]s
//! - [`strip_ansi_codes()`] - Visible text only
//!
//! ### Time Window (`window`)
//! - [`select_window()`] - Stream a file, keep the recent lines, count the rest
//!
//! ### Error Handling (`error`)
//! - [`Error`], [`Result`], [`ResultExt`]

pub mod ansi;
pub mod error;
pub mod logging;
pub mod parse;
pub mod tree;
pub mod types;
pub mod window;

/// Prelude for common imports used throughout all logtree crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use ansi::{strip_ansi_codes, AnsiColor, StyledSegment};
pub use error::{Error, Result, ResultExt};
pub use parse::{entry_id, extract_fields, find_timestamp, split_indent, LineFields};
pub use tree::{build_forest, count_entries, depth_first, TreeBuilder};
pub use types::{FileStats, LogEntry, LogLevel};
pub use window::{select_window, TimeWindow, WindowSelection, DEFAULT_WINDOW_MINUTES};
