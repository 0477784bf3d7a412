//! logtree-app - Viewer state and orchestration for logtree
//!
//! Owns the configuration, the per-source [`ViewerSession`] (cached parse,
//! live-update fan-out), the file watcher feeding it, and the view-state
//! model ([`ViewState`], [`TreeView`]) that mirrors the browser client.

pub mod config;
pub mod filter;
pub mod session;
pub mod tree_view;
pub mod view_state;
pub mod watcher;

// Re-export primary types
pub use config::Settings;
pub use filter::{compute_visibility, TextFilter, Visibility};
pub use session::{run_invalidation_loop, LiveEvent, Snapshot, ViewerSession};
pub use tree_view::{TreeView, VisibleRow};
pub use view_state::{ViewMode, ViewState};
pub use watcher::{FileWatcher, WatchEvent, WatcherConfig};
