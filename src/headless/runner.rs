//! Headless runner - select, parse, filter, print

use std::io::Write;
use std::path::Path;

use chrono::Utc;

use logtree_app::{Settings, TreeView, ViewMode, ViewState};
use logtree_core::prelude::*;
use logtree_core::{build_forest, select_window, TimeWindow};

use super::{format_rows, format_stats, PrintOptions};

/// Print the windowed tree of `path` to stdout
pub async fn run_headless(path: &Path, settings: &Settings, options: PrintOptions) -> Result<()> {
    settings.validate().context("Refusing to print")?;
    info!("Printing {} (headless)", path.display());

    let window = TimeWindow::from_minutes(settings.window.minutes);
    let selection = select_window(path, window, Utc::now())
        .await
        .with_context(|| format!("Reading {}", path.display()))?;
    let forest = build_forest(&selection.lines);

    let mut state = ViewState::new();
    state.view_mode = if options.plain {
        ViewMode::Plain
    } else {
        ViewMode::Structured
    };
    let mut view = TreeView::new(&forest, state);
    view.expand_all();
    if let Some(filter) = &options.filter {
        view.set_filter(filter);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for line in format_rows(&view) {
        writeln!(out, "{}", line)?;
    }
    writeln!(
        out,
        "{}",
        format_stats(&selection.stats, window, view.visible_count())
    )?;
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_settings_rejected_before_reading() {
        let mut settings = Settings::default();
        settings.window.minutes = 0;
        let options = PrintOptions {
            filter: None,
            plain: false,
        };

        let err = run_headless(Path::new("/does/not/exist.log"), &settings, options)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }
}
