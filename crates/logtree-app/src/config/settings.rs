//! Settings loading and the default config file

use std::path::Path;

use logtree_core::prelude::*;

use super::types::Settings;

/// Directory holding logtree's per-project files
pub const LOGTREE_DIR: &str = ".logtree";

/// Settings file name inside [`LOGTREE_DIR`]
pub const CONFIG_FILENAME: &str = "config.toml";

// ─────────────────────────────────────────────────────────────────────────────
// Settings Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Load settings from .logtree/config.toml
///
/// Returns default settings if file doesn't exist or can't be parsed.
pub fn load_settings(base_path: &Path) -> Settings {
    let config_path = base_path.join(LOGTREE_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Create a commented default config file in .logtree/
///
/// Leaves an existing file untouched.
pub fn init_config_dir(base_path: &Path) -> Result<()> {
    let logtree_dir = base_path.join(LOGTREE_DIR);

    if !logtree_dir.exists() {
        std::fs::create_dir_all(&logtree_dir)
            .map_err(|e| Error::config(format!("Failed to create .logtree dir: {}", e)))?;
    }

    let config_path = logtree_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_content = r#"# logtree configuration
# Command-line flags override these values.

[server]
host = "127.0.0.1"
port = 3000
keepalive_secs = 30     # interval of keep-alive events on /events

[window]
minutes = 60            # only lines stamped within this window are shown

[watcher]
debounce_ms = 200

[ui]
storage_key = "logtree.viewState"
title = "logtree"
"#;
        std::fs::write(&config_path, default_content)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(())
}
