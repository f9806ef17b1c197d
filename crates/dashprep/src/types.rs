use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::is_numeric_dtype;

/// Record of a transform step that was skipped because its required
/// columns were absent from the dataset.
///
/// Missing columns are tolerated by design: the step is skipped and the
/// run continues, with the skip recorded here instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipEvent {
    /// Name of the skipped step (e.g., `drop_missing(Revenue)`).
    pub step: String,
    /// Required columns that were not present in the dataset.
    pub missing_columns: Vec<String>,
}

/// Summary of what a preparation run did.
///
/// Serializable so hosts (or `--json` CLI output) can consume it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepReport {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    /// Number of rows before the transform sequence.
    pub rows_before: usize,
    /// Number of rows after the transform sequence.
    pub rows_after: usize,

    /// Number of columns before the transform sequence.
    pub columns_before: usize,
    /// Number of columns after the transform sequence.
    pub columns_after: usize,

    /// Descriptions of the steps that were applied, in order.
    pub applied_steps: Vec<String>,

    /// Steps that were skipped because of missing columns.
    pub skipped_steps: Vec<SkipEvent>,

    /// Where the cleaned dataset was written.
    pub output_path: PathBuf,
}

impl PrepReport {
    /// Number of rows removed by the transform sequence.
    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }
}

/// Shape summary of a loaded dataset, used by the presentation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    /// Column names in frame order.
    pub column_names: Vec<String>,
    /// Columns eligible for numeric summary statistics.
    pub numeric_columns: Vec<String>,
}

impl DatasetSummary {
    /// Build a summary from a loaded frame.
    pub fn from_frame(df: &DataFrame) -> Self {
        let column_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let numeric_columns: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect();

        Self {
            rows: df.height(),
            columns: df.width(),
            column_names,
            numeric_columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summary_from_frame() {
        let frame = df!(
            "Region" => ["North", "South"],
            "Revenue" => [120.5, 98.0],
            "Units" => [12i64, 7],
        )
        .unwrap();

        let summary = DatasetSummary::from_frame(&frame);
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.columns, 3);
        assert_eq!(summary.column_names, vec!["Region", "Revenue", "Units"]);
        assert_eq!(summary.numeric_columns, vec!["Revenue", "Units"]);
    }

    #[test]
    fn test_report_rows_removed() {
        let report = PrepReport {
            duration_ms: 3,
            rows_before: 10,
            rows_after: 7,
            columns_before: 3,
            columns_after: 4,
            applied_steps: vec!["drop_missing(Revenue)".to_string()],
            skipped_steps: Vec::new(),
            output_path: PathBuf::from("out.parquet"),
        };
        assert_eq!(report.rows_removed(), 3);
    }

    #[test]
    fn test_report_serialization_round_trip() {
        let report = PrepReport {
            duration_ms: 1,
            rows_before: 4,
            rows_after: 4,
            columns_before: 2,
            columns_after: 2,
            applied_steps: Vec::new(),
            skipped_steps: vec![SkipEvent {
                step: "drop_missing(Discount)".to_string(),
                missing_columns: vec!["Discount".to_string()],
            }],
            output_path: PathBuf::from("out.parquet"),
        };

        let json = serde_json::to_string(&report).unwrap();
        let back: PrepReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.skipped_steps, report.skipped_steps);
        assert_eq!(back.rows_before, report.rows_before);
    }
}
