//! Configuration file parsing for logtree
//!
//! Supports `.logtree/config.toml` in the working directory. Command-line
//! flags are applied on top by the binary.

pub mod settings;
pub mod types;

pub use settings::{init_config_dir, load_settings, CONFIG_FILENAME, LOGTREE_DIR};
pub use types::*;
