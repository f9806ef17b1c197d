//! Presentation stage: render summary views of a cleaned dataset.
//!
//! The core logic only talks to a [`DisplaySurface`]; the hosting dashboard
//! framework owns the actual rendering and transport. [`TermSurface`] is the
//! built-in terminal implementation used by the CLI.

use polars::prelude::*;
use std::path::Path;

use crate::cache::DatasetCache;
use crate::error::Result;
use crate::types::DatasetSummary;

/// Number of rows shown in the preview table.
const PREVIEW_ROWS: usize = 5;

/// Abstract rendering collaborator.
///
/// Implementations decide how each call is displayed; the presentation
/// routines decide only what is shown and in which order.
pub trait DisplaySurface {
    fn heading(&mut self, text: &str);
    fn info(&mut self, text: &str);
    fn success(&mut self, text: &str);
    fn warn(&mut self, text: &str);
    fn error(&mut self, text: &str);
    fn metric(&mut self, label: &str, value: &str);
    fn table(&mut self, frame: &DataFrame);
}

/// Render the fixed overview of a loaded dataset: row/column counts, a
/// preview of the first rows, and per-column summary statistics.
///
/// Non-numeric columns carry null statistics in the describe output rather
/// than failing. The frame is never mutated.
pub fn render_overview(frame: &DataFrame, surface: &mut dyn DisplaySurface) -> Result<()> {
    let summary = DatasetSummary::from_frame(frame);

    surface.success("Data loaded successfully");
    surface.metric("Rows", &summary.rows.to_string());
    surface.metric("Columns", &summary.columns.to_string());

    surface.heading("Preview");
    surface.table(&frame.head(Some(PREVIEW_ROWS)));

    surface.heading("Summary statistics");
    let stats = frame.describe(None)?;
    surface.table(&stats);

    Ok(())
}

/// Render a load failure and stop. No fallback, no partial rendering.
pub fn render_load_failure(err: &crate::error::DashprepError, surface: &mut dyn DisplaySurface) {
    surface.error(&err.to_string());
}

/// Render the empty state: the host has neither data nor an error to show.
pub fn render_empty(surface: &mut dyn DisplaySurface) {
    surface.warn("No data available to display");
}

/// The composed presentation flow: load through the cache, then render the
/// overview, or render the failure and halt this render pass.
///
/// The load result is an explicit branch here; the caller of this function
/// receives the error as well and decides what the process does next.
pub fn render_dashboard(
    cache: &DatasetCache,
    path: impl AsRef<Path>,
    surface: &mut dyn DisplaySurface,
) -> Result<()> {
    match cache.load(path) {
        Ok(outcome) => render_overview(&outcome.frame, surface),
        Err(e) => {
            render_load_failure(&e, surface);
            Err(e)
        }
    }
}

/// Terminal display surface.
///
/// Uses `println!` intentionally: this is user-facing output, not logging,
/// and should be visible regardless of log level settings.
#[derive(Debug, Default)]
pub struct TermSurface;

impl DisplaySurface for TermSurface {
    fn heading(&mut self, text: &str) {
        println!("\n{text}");
        println!("{}", "-".repeat(40));
    }

    fn info(&mut self, text: &str) {
        println!("{text}");
    }

    fn success(&mut self, text: &str) {
        println!("OK: {text}");
    }

    fn warn(&mut self, text: &str) {
        println!("WARNING: {text}");
    }

    fn error(&mut self, text: &str) {
        eprintln!("ERROR: {text}");
    }

    fn metric(&mut self, label: &str, value: &str) {
        println!("  {label}: {value}");
    }

    fn table(&mut self, frame: &DataFrame) {
        println!("{frame}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashprepError;
    use polars::df;
    use pretty_assertions::assert_eq;

    /// Surface that records the sequence of calls for assertions.
    #[derive(Debug, Default)]
    struct RecordingSurface {
        events: Vec<String>,
        tables: usize,
    }

    impl DisplaySurface for RecordingSurface {
        fn heading(&mut self, text: &str) {
            self.events.push(format!("heading:{text}"));
        }
        fn info(&mut self, text: &str) {
            self.events.push(format!("info:{text}"));
        }
        fn success(&mut self, text: &str) {
            self.events.push(format!("success:{text}"));
        }
        fn warn(&mut self, text: &str) {
            self.events.push(format!("warn:{text}"));
        }
        fn error(&mut self, text: &str) {
            self.events.push(format!("error:{text}"));
        }
        fn metric(&mut self, label: &str, value: &str) {
            self.events.push(format!("metric:{label}={value}"));
        }
        fn table(&mut self, _frame: &DataFrame) {
            self.events.push("table".to_string());
            self.tables += 1;
        }
    }

    fn sample_frame() -> DataFrame {
        df!(
            "Region" => ["North", "South", "East", "West", "North", "South"],
            "Revenue" => [120.5, 98.0, 30.0, 95.25, 61.0, 104.0],
        )
        .unwrap()
    }

    #[test]
    fn test_overview_renders_counts_preview_and_stats() {
        let mut surface = RecordingSurface::default();
        render_overview(&sample_frame(), &mut surface).unwrap();

        assert_eq!(surface.tables, 2); // preview + statistics
        assert!(surface.events.contains(&"metric:Rows=6".to_string()));
        assert!(surface.events.contains(&"metric:Columns=2".to_string()));
        assert!(surface.events.contains(&"heading:Preview".to_string()));
        assert!(
            surface
                .events
                .contains(&"heading:Summary statistics".to_string())
        );
        assert_eq!(surface.events[0], "success:Data loaded successfully");
    }

    #[test]
    fn test_load_failure_renders_error_only() {
        let mut surface = RecordingSurface::default();
        let err = DashprepError::DataFileNotFound("cleaned.parquet".to_string());
        render_load_failure(&err, &mut surface);

        assert_eq!(surface.tables, 0);
        assert_eq!(
            surface.events,
            vec!["error:data file not found at cleaned.parquet"]
        );
    }

    #[test]
    fn test_empty_state_warns() {
        let mut surface = RecordingSurface::default();
        render_empty(&mut surface);
        assert_eq!(surface.events, vec!["warn:No data available to display"]);
    }

    #[test]
    fn test_dashboard_halts_on_missing_file() {
        let cache = DatasetCache::new();
        let mut surface = RecordingSurface::default();

        let result = render_dashboard(&cache, "no/such/cleaned.parquet", &mut surface);

        assert!(result.is_err());
        assert_eq!(surface.tables, 0);
        assert!(surface.events[0].starts_with("error:data file not found at"));
    }
}
