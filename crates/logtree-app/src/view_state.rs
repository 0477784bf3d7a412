//! Persisted view state - expand map, view mode, filter text and scroll.
//!
//! The browser stores this structure as JSON under
//! `<storage_key>:<source path>`; the field names here are the wire format
//! shared with the client script. Entries absent from `expanded` are
//! collapsed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Presentation mode of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Nested, collapsible rows following indentation
    #[default]
    Structured,
    /// Depth-first flat list; no expand affordances
    Plain,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Structured => ViewMode::Plain,
            ViewMode::Plain => ViewMode::Structured,
        }
    }

    pub fn is_plain(&self) -> bool {
        matches!(self, ViewMode::Plain)
    }
}

/// Client view state keyed per log source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    pub expanded: BTreeMap<String, bool>,
    pub view_mode: ViewMode,
    pub filter_text: String,
    pub scroll_offset: f64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage key for one log source under a namespace
    pub fn storage_key(namespace: &str, source: &str) -> String {
        format!("{}:{}", namespace, source)
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.get(id).copied().unwrap_or(false)
    }

    /// Record one entry; collapsed entries are dropped from the map
    pub fn set_expanded(&mut self, id: &str, expanded: bool) {
        if expanded {
            self.expanded.insert(id.to_string(), true);
        } else {
            self.expanded.remove(id);
        }
    }

    /// Flip one entry; returns the new state
    pub fn toggle(&mut self, id: &str) -> bool {
        let next = !self.is_expanded(id);
        self.set_expanded(id, next);
        next
    }

    /// Collapse everything, forgetting every recorded id
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Mark every given id as expanded
    pub fn expand_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            self.set_expanded(id, true);
        }
    }
}
