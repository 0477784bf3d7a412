//! Embedded static assets

/// Presentation stylesheet
pub const STYLE_CSS: &str = include_str!("../assets/style.css");

/// Client state and filter engine
pub const CLIENT_JS: &str = include_str!("../assets/client.js");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_script_references_page_ids() {
        for id in [
            "raw-lines",
            "logtree-config",
            "tree",
            "plain-view",
            "filter",
            "mode-toggle",
            "collapse-all",
            "expand-all",
            "visible-count",
            "live-status",
        ] {
            assert!(CLIENT_JS.contains(&format!("'{}'", id)), "missing {}", id);
        }
    }

    #[test]
    fn test_client_script_handles_every_event_name() {
        assert!(CLIENT_JS.contains("'hello'"));
        assert!(CLIENT_JS.contains("'invalidate'"));
        assert!(CLIENT_JS.contains("'keepalive'"));
    }

    #[test]
    fn test_client_script_reloads_on_newer_generation() {
        assert!(CLIENT_JS.contains("Number(event.data) !== config.generation"));
        assert!(CLIENT_JS.contains("addEventListener('invalidate', reloadForChange)"));
    }

    /// Slice of the script from `start` up to the next top-level function
    fn function_body(start: &str) -> &'static str {
        let from = CLIENT_JS.find(start).expect(start);
        let rest = &CLIENT_JS[from..];
        let end = rest.find("\n  }\n").expect("function end");
        &rest[..end]
    }

    #[test]
    fn test_live_reload_collapses_and_scrolls_to_top_keeping_mode() {
        let reload = function_body("function reloadForChange()");
        assert!(reload.contains("saveState()"));
        assert!(reload.contains("sessionStorage.setItem(reloadFlagKey, '1')"));
        assert!(reload.contains("window.location.reload()"));

        let review = function_body("function reviewFromTop(");
        assert!(review.contains("loaded.expanded = {}"));
        assert!(review.contains("loaded.scrollOffset = 0"));
        assert!(!review.contains("viewMode"));
        assert!(!review.contains("filterText"));

        let init = function_body("function init()");
        assert!(init.contains("takeLiveReloadFlag()"));
        assert!(init.contains("if (liveReload) state = reviewFromTop(state)"));
        assert!(init.contains("window.scrollTo(0, liveReload ? 0 : state.scrollOffset)"));
    }

    #[test]
    fn test_reload_flag_is_consumed_once() {
        let take = function_body("function takeLiveReloadFlag()");
        assert!(take.contains("sessionStorage.getItem(reloadFlagKey) === '1'"));
        assert!(take.contains("sessionStorage.removeItem(reloadFlagKey)"));
    }

    #[test]
    fn test_collapsing_forgets_expanded_ids() {
        let set_all = function_body("function setAll(");
        assert!(set_all.contains("state.expanded = {}"));
        assert!(!set_all.contains("= false"));

        let toggle = function_body("function toggleEntry(");
        assert!(toggle.contains("delete state.expanded[id]"));
    }

    #[test]
    fn test_stylesheet_styles_every_level() {
        for class in [
            "level-trace",
            "level-debug",
            "level-info",
            "level-warn",
            "level-error",
            "level-fatal",
        ] {
            assert!(STYLE_CSS.contains(class), "missing {}", class);
        }
    }
}
