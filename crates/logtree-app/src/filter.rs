//! Text filter with ancestor-visibility propagation.
//!
//! An entry is visible when its raw text contains the filter
//! (case-insensitive) or when any of its descendants does. Visibility is
//! computed over the whole forest on every filter change and is independent
//! of expand/collapse state.

use logtree_core::LogEntry;

/// Visibility flags for every entry, indexed in depth-first pre-order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visibility {
    flags: Vec<bool>,
    visible_count: usize,
}

impl Visibility {
    /// Everything visible (empty filter)
    pub fn all(len: usize) -> Self {
        Self {
            flags: vec![true; len],
            visible_count: len,
        }
    }

    /// Visibility of the entry at a depth-first position
    pub fn is_visible(&self, preorder_index: usize) -> bool {
        self.flags.get(preorder_index).copied().unwrap_or(false)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn flags(&self) -> &[bool] {
        &self.flags
    }
}

/// Case-insensitive substring matcher
#[derive(Debug, Clone)]
pub struct TextFilter {
    needle: String,
}

impl TextFilter {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.is_empty() || entry.raw_text.to_lowercase().contains(&self.needle)
    }
}

/// Compute visibility of every entry in the forest for `filter_text`
pub fn compute_visibility(forest: &[LogEntry], filter_text: &str) -> Visibility {
    let len = logtree_core::count_entries(forest);
    let filter = TextFilter::new(filter_text);
    if filter.is_empty() {
        return Visibility::all(len);
    }

    let mut flags = vec![false; len];
    let mut next_index = 0;
    for root in forest {
        mark_subtree(root, &filter, &mut flags, &mut next_index);
    }
    let visible_count = flags.iter().filter(|v| **v).count();

    Visibility {
        flags,
        visible_count,
    }
}

/// Post-order marking; every child is visited, no short-circuit
fn mark_subtree(
    entry: &LogEntry,
    filter: &TextFilter,
    flags: &mut [bool],
    next_index: &mut usize,
) -> bool {
    let index = *next_index;
    *next_index += 1;

    let mut visible = filter.matches(entry);
    for child in &entry.children {
        visible |= mark_subtree(child, filter, flags, next_index);
    }
    flags[index] = visible;
    visible
}
