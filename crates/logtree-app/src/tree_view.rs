//! Interactive tree view model.
//!
//! Combines a parsed forest with a [`ViewState`] and applies the same rules
//! as the browser client: click-to-toggle in structured mode, a flattened
//! depth-first list in plain mode, filter visibility recomputed on every
//! filter change, collapse-all / expand-all. The headless printer renders
//! from this model.

use logtree_core::{depth_first, LogEntry};

use crate::filter::{compute_visibility, Visibility};
use crate::view_state::{ViewMode, ViewState};

/// One row the user currently sees
#[derive(Debug, Clone, Copy)]
pub struct VisibleRow<'a> {
    pub entry: &'a LogEntry,
    /// Whether the row shows an expand affordance
    pub expandable: bool,
    pub expanded: bool,
}

/// A forest plus the view state applied to it
#[derive(Debug)]
pub struct TreeView<'a> {
    forest: &'a [LogEntry],
    state: ViewState,
    visibility: Visibility,
}

impl<'a> TreeView<'a> {
    pub fn new(forest: &'a [LogEntry], state: ViewState) -> Self {
        let visibility = compute_visibility(forest, &state.filter_text);
        Self {
            forest,
            state,
            visibility,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn into_state(self) -> ViewState {
        self.state
    }

    pub fn mode(&self) -> ViewMode {
        self.state.view_mode
    }

    /// Entries passing the filter, regardless of expansion
    pub fn visible_count(&self) -> usize {
        self.visibility.visible_count()
    }

    /// Toggle the children of `id`.
    ///
    /// Returns the new expansion state, or `None` when the click is ignored
    /// (plain mode, unknown id, or an entry without children). Descendants
    /// keep their own recorded state.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        if self.state.view_mode.is_plain() {
            return None;
        }
        let entry = depth_first(self.forest).find(|e| e.id == id)?;
        if !entry.has_children() {
            return None;
        }
        Some(self.state.toggle(id))
    }

    pub fn set_filter(&mut self, text: &str) {
        self.state.filter_text = text.to_string();
        self.visibility = compute_visibility(self.forest, text);
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.state.view_mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.state.view_mode = self.state.view_mode.toggle();
    }

    /// Collapse every entry; no-op in plain mode
    pub fn collapse_all(&mut self) {
        if self.state.view_mode.is_plain() {
            return;
        }
        self.state.collapse_all();
    }

    /// Expand every entry that has children; no-op in plain mode
    pub fn expand_all(&mut self) {
        if self.state.view_mode.is_plain() {
            return;
        }
        let ids: Vec<&str> = depth_first(self.forest)
            .filter(|e| e.has_children())
            .map(|e| e.id.as_str())
            .collect();
        self.state.expand_all(ids);
    }

    /// Rows currently on screen, in display order
    pub fn visible_rows(&self) -> Vec<VisibleRow<'a>> {
        match self.state.view_mode {
            ViewMode::Plain => depth_first(self.forest)
                .enumerate()
                .filter(|(i, _)| self.visibility.is_visible(*i))
                .map(|(_, entry)| VisibleRow {
                    entry,
                    expandable: false,
                    expanded: false,
                })
                .collect(),
            ViewMode::Structured => {
                let mut rows = Vec::new();
                let mut index = 0;
                for root in self.forest {
                    self.collect_structured(root, true, &mut index, &mut rows);
                }
                rows
            }
        }
    }

    /// Walks the whole subtree to keep pre-order indices aligned with the
    /// visibility flags, emitting only rows whose ancestors are all expanded.
    fn collect_structured(
        &self,
        entry: &'a LogEntry,
        shown: bool,
        index: &mut usize,
        rows: &mut Vec<VisibleRow<'a>>,
    ) {
        let mine = *index;
        *index += 1;

        let visible = shown && self.visibility.is_visible(mine);
        let expanded = self.state.is_expanded(&entry.id);
        if visible {
            rows.push(VisibleRow {
                entry,
                expandable: entry.has_children(),
                expanded,
            });
        }
        for child in &entry.children {
            self.collect_structured(child, visible && expanded, index, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logtree_core::build_forest;

    fn sample() -> Vec<LogEntry> {
        build_forest([
            "A start",
            "\tB step one",
            "\tC step two",
            "\t\tD detail timeout",
            "E other root",
        ])
    }

    fn texts(rows: &[VisibleRow<'_>]) -> Vec<String> {
        rows.iter().map(|r| r.entry.raw_text.clone()).collect()
    }

    fn id_of(forest: &[LogEntry], text: &str) -> String {
        depth_first(forest)
            .find(|e| e.raw_text == text)
            .map(|e| e.id.clone())
            .unwrap()
    }

    #[test]
    fn test_initially_only_roots_visible() {
        let forest = sample();
        let view = TreeView::new(&forest, ViewState::new());
        assert_eq!(texts(&view.visible_rows()), vec!["A start", "E other root"]);
        assert!(view.visible_rows()[0].expandable);
        assert!(!view.visible_rows()[1].expandable);
    }

    #[test]
    fn test_toggle_reveals_direct_children_only() {
        let forest = sample();
        let mut view = TreeView::new(&forest, ViewState::new());
        assert_eq!(view.toggle(&id_of(&forest, "A start")), Some(true));
        assert_eq!(
            texts(&view.visible_rows()),
            vec!["A start", "B step one", "C step two", "E other root"]
        );
    }

    #[test]
    fn test_toggle_leaf_is_ignored() {
        let forest = sample();
        let mut view = TreeView::new(&forest, ViewState::new());
        assert_eq!(view.toggle(&id_of(&forest, "E other root")), None);
        assert_eq!(view.toggle("ffffffffffffffff"), None);
    }

    #[test]
    fn test_collapse_keeps_descendant_state() {
        let forest = sample();
        let mut view = TreeView::new(&forest, ViewState::new());
        let a = id_of(&forest, "A start");
        let c = id_of(&forest, "C step two");
        view.toggle(&a);
        view.toggle(&c);
        view.toggle(&a);

        assert!(view.state().is_expanded(&c));
        assert_eq!(texts(&view.visible_rows()), vec!["A start", "E other root"]);

        view.toggle(&a);
        assert!(texts(&view.visible_rows()).contains(&"D detail timeout".to_string()));
    }

    #[test]
    fn test_plain_mode_flattens_and_disables_toggle() {
        let forest = sample();
        let mut view = TreeView::new(&forest, ViewState::new());
        view.set_mode(ViewMode::Plain);

        let rows = view.visible_rows();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| !r.expandable));
        assert_eq!(view.toggle(&id_of(&forest, "A start")), None);
    }

    #[test]
    fn test_mode_switch_round_trip_is_lossless() {
        let forest = sample();
        let mut view = TreeView::new(&forest, ViewState::new());
        view.set_mode(ViewMode::Plain);
        let before = texts(&view.visible_rows());

        view.toggle_mode();
        assert_eq!(view.mode(), ViewMode::Structured);
        view.toggle_mode();

        assert_eq!(texts(&view.visible_rows()), before);
        let parsed: Vec<String> = depth_first(&forest).map(|e| e.raw_text.clone()).collect();
        assert_eq!(before, parsed);
    }

    #[test]
    fn test_filter_does_not_expand() {
        let forest = sample();
        let mut view = TreeView::new(&forest, ViewState::new());
        view.set_filter("TIMEOUT");

        assert_eq!(view.visible_count(), 3);
        assert_eq!(texts(&view.visible_rows()), vec!["A start"]);
        assert!(!view.state().is_expanded(&id_of(&forest, "A start")));

        view.expand_all();
        assert_eq!(
            texts(&view.visible_rows()),
            vec!["A start", "C step two", "D detail timeout"]
        );
    }

    #[test]
    fn test_clearing_filter_restores_visibility_not_expansion() {
        let forest = sample();
        let mut view = TreeView::new(&forest, ViewState::new());
        let a = id_of(&forest, "A start");
        view.toggle(&a);
        view.set_filter("nothing matches this");
        assert_eq!(view.visible_count(), 0);
        assert!(view.visible_rows().is_empty());

        view.set_filter("");
        assert_eq!(view.visible_count(), 5);
        assert!(view.state().is_expanded(&a));
        assert_eq!(view.visible_rows().len(), 4);
    }

    #[test]
    fn test_plain_mode_filter_lists_matches_and_ancestors() {
        let forest = sample();
        let mut view = TreeView::new(&forest, ViewState::new());
        view.set_mode(ViewMode::Plain);
        view.set_filter("detail");
        assert_eq!(
            texts(&view.visible_rows()),
            vec!["A start", "C step two", "D detail timeout"]
        );
    }

    #[test]
    fn test_collapse_all_is_noop_in_plain_mode() {
        let forest = sample();
        let mut view = TreeView::new(&forest, ViewState::new());
        let a = id_of(&forest, "A start");
        view.toggle(&a);
        view.set_mode(ViewMode::Plain);
        view.collapse_all();
        assert!(view.state().is_expanded(&a));

        view.set_mode(ViewMode::Structured);
        view.collapse_all();
        assert!(!view.state().is_expanded(&a));
    }

    #[test]
    fn test_live_update_reload_presents_collapsed_top_same_mode() {
        let forest = sample();
        let mut view = TreeView::new(&forest, ViewState::new());
        view.expand_all();
        view.set_mode(ViewMode::Plain);
        let mut persisted = view.into_state();
        persisted.scroll_offset = 512.0;

        // file changed: rebuilt forest, same ids for unchanged lines
        let rebuilt = build_forest([
            "A start",
            "\tB step one",
            "\tC step two",
            "\t\tD detail timeout",
            "E other root",
            "\tF appended",
        ]);
        // reload after a live update: collapsed, top of page, same mode
        persisted.collapse_all();
        persisted.scroll_offset = 0.0;
        let mut view = TreeView::new(&rebuilt, persisted);

        assert_eq!(view.mode(), ViewMode::Plain);
        assert_eq!(view.state().scroll_offset, 0.0);
        view.set_mode(ViewMode::Structured);
        assert_eq!(texts(&view.visible_rows()), vec!["A start", "E other root"]);
    }
}
