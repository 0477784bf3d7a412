//! Configuration types for logtree
//!
//! Defines `Settings` (`.logtree/config.toml`) and its sections.

use serde::{Deserialize, Serialize};

use logtree_core::prelude::*;
use logtree_core::DEFAULT_WINDOW_MINUTES;

/// Application settings (.logtree/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub window: WindowSettings,

    #[serde(default)]
    pub watcher: WatcherSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

impl Settings {
    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.server.keepalive_secs == 0 {
            return Err(Error::config_invalid("server.keepalive_secs must be at least 1"));
        }
        if self.window.minutes == 0 {
            return Err(Error::config_invalid("window.minutes must be at least 1"));
        }
        if self.ui.storage_key.trim().is_empty() {
            return Err(Error::config_invalid("ui.storage_key must not be empty"));
        }
        Ok(())
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Interval between keep-alive events on the live-update stream
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            keepalive_secs: default_keepalive_secs(),
        }
    }
}

/// Time-window settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WindowSettings {
    /// Only lines stamped within this many minutes are shown
    #[serde(default = "default_window_minutes")]
    pub minutes: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            minutes: default_window_minutes(),
        }
    }
}

/// File watcher settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WatcherSettings {
    /// Debounce duration in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Browser-side settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiSettings {
    /// Namespace for the persisted view state in browser storage
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Page title prefix
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            title: default_title(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_keepalive_secs() -> u64 {
    30
}

fn default_window_minutes() -> u32 {
    DEFAULT_WINDOW_MINUTES
}

fn default_debounce_ms() -> u64 {
    200
}

fn default_storage_key() -> String {
    "logtree.viewState".to_string()
}

fn default_title() -> String {
    "logtree".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.keepalive_secs, 30);
        assert_eq!(settings.window.minutes, 60);
        assert_eq!(settings.watcher.debounce_ms, 200);
        assert_eq!(settings.ui.storage_key, "logtree.viewState");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let toml = r#"
[server]
port = 8080

[window]
minutes = 15
"#;
        let settings: Settings = toml::from_str(toml).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.window.minutes, 15);
        assert_eq!(settings.ui.title, "logtree");
    }

    #[test]
    fn test_settings_empty_is_default() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let mut settings = Settings::default();
        settings.window.minutes = 0;
        let err = settings.validate().unwrap_err();
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("window.minutes"));
    }

    #[test]
    fn test_validate_rejects_zero_keepalive() {
        let mut settings = Settings::default();
        settings.server.keepalive_secs = 0;
        assert!(settings.validate().is_err());
    }
}
