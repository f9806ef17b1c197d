//! The preparation pipeline: raw CSV in, cleaned Parquet out.
//!
//! One-shot and offline. The run either completes, producing the cleaned
//! dataset and a [`PrepReport`], or fails with an error. There is no retry.

use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{PrepConfig, WriteMode};
use crate::error::{DashprepError, Result};
use crate::types::{PrepReport, SkipEvent};
use crate::utils::has_column;

/// The preparation pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use dashprep::{PrepConfig, PrepPipeline, TransformSpec};
///
/// let config = PrepConfig::builder()
///     .source_path("data/raw.csv")
///     .output_path("data/cleaned.parquet")
///     .transform(TransformSpec::DropMissing { column: "Revenue".into() })
///     .build()?;
///
/// let report = PrepPipeline::new(config).run()?;
/// println!("wrote {} rows", report.rows_after);
/// ```
pub struct PrepPipeline {
    config: PrepConfig,
}

impl PrepPipeline {
    /// Create a pipeline from a validated configuration.
    pub fn new(config: PrepConfig) -> Self {
        Self { config }
    }

    /// Run the full preparation: read, transform, write.
    ///
    /// # Errors
    ///
    /// Fails if the source does not exist or cannot be parsed, or if the
    /// output cannot be written. Missing transform columns are not errors;
    /// those steps are skipped and recorded in the report.
    pub fn run(&self) -> Result<PrepReport> {
        let start_time = Instant::now();

        if !self.config.source_path.exists() {
            return Err(DashprepError::SourceNotFound(
                self.config.source_path.display().to_string(),
            ));
        }

        info!("Loading dataset from: {}", self.config.source_path.display());
        let df = self.read_source()?;
        info!("Dataset loaded successfully: {:?}", df.shape());

        let rows_before = df.height();
        let columns_before = df.width();

        let (mut df, applied_steps, skipped_steps) = self.apply_transforms(df)?;

        self.write_output(&mut df)?;
        info!(
            "Cleaned dataset written to: {}",
            self.config.output_path.display()
        );

        Ok(PrepReport {
            duration_ms: start_time.elapsed().as_millis() as u64,
            rows_before,
            rows_after: df.height(),
            columns_before,
            columns_after: df.width(),
            applied_steps,
            skipped_steps,
            output_path: self.config.output_path.clone(),
        })
    }

    /// Apply the configured transform steps in order.
    ///
    /// Steps whose required columns are absent are skipped with a warning
    /// and a recorded [`SkipEvent`]; execution continues.
    pub fn apply_transforms(
        &self,
        df: DataFrame,
    ) -> Result<(DataFrame, Vec<String>, Vec<SkipEvent>)> {
        let mut df = df;
        let mut applied_steps = Vec::new();
        let mut skipped_steps = Vec::new();

        for step in &self.config.transforms {
            let missing_columns: Vec<String> = step
                .required_columns()
                .iter()
                .filter(|c| !has_column(&df, c))
                .map(|c| c.to_string())
                .collect();

            if !missing_columns.is_empty() {
                warn!(
                    "Skipping step '{}': missing columns {:?}",
                    step.name(),
                    missing_columns
                );
                skipped_steps.push(SkipEvent {
                    step: step.name(),
                    missing_columns,
                });
                continue;
            }

            let rows_before = df.height();
            df = step.apply(df)?;
            debug!(
                "Applied step '{}' ({} -> {} rows)",
                step.name(),
                rows_before,
                df.height()
            );
            applied_steps.push(step.name());
        }

        Ok((df, applied_steps, skipped_steps))
    }

    fn read_source(&self) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(self.config.source_path.clone()))?
            .finish()?;
        Ok(df)
    }

    /// Write the cleaned frame as Parquet, per the configured write mode.
    ///
    /// Parquet carries its own schema; no row-index labeling is persisted.
    fn write_output(&self, df: &mut DataFrame) -> Result<()> {
        let output = &self.config.output_path;
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
            info!("Created output directory: {}", parent.display());
        }

        match self.config.write_mode {
            WriteMode::AtomicRename => {
                let tmp = sibling_tmp_path(output);
                let file = File::create(&tmp)?;
                ParquetWriter::new(file).finish(df)?;
                std::fs::rename(&tmp, output)?;
            }
            WriteMode::InPlace => {
                let file = File::create(output)?;
                ParquetWriter::new(file).finish(df)?;
            }
        }

        Ok(())
    }
}

/// Build the temp path used for atomic writes: `<output>.tmp` alongside
/// the destination, so the rename never crosses a filesystem boundary.
fn sibling_tmp_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    output.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::TransformSpec;
    use polars::df;
    use pretty_assertions::assert_eq;

    fn pipeline_with(transforms: Vec<TransformSpec>) -> PrepPipeline {
        let config = PrepConfig::builder()
            .source_path("raw.csv")
            .output_path("cleaned.parquet")
            .transforms(transforms)
            .build()
            .unwrap();
        PrepPipeline::new(config)
    }

    fn sample_frame() -> DataFrame {
        df!(
            "Region" => ["North", "South", "East", "West"],
            "Revenue" => [Some(120.5), None, Some(30.0), None],
        )
        .unwrap()
    }

    #[test]
    fn test_transforms_applied_in_order() {
        let pipeline = pipeline_with(vec![
            TransformSpec::DropMissing {
                column: "Revenue".to_string(),
            },
            TransformSpec::DeriveScaled {
                source: "Revenue".to_string(),
                output: "revenue_x2".to_string(),
                factor: 2.0,
            },
        ]);

        let (out, applied, skipped) = pipeline.apply_transforms(sample_frame()).unwrap();
        assert_eq!(out.height(), 2);
        assert!(out.column("revenue_x2").is_ok());
        assert_eq!(
            applied,
            vec!["drop_missing(Revenue)", "derive_scaled(revenue_x2)"]
        );
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_missing_column_records_skip_and_continues() {
        let pipeline = pipeline_with(vec![
            TransformSpec::DropMissing {
                column: "Discount".to_string(),
            },
            TransformSpec::DeriveScaled {
                source: "Revenue".to_string(),
                output: "revenue_x2".to_string(),
                factor: 2.0,
            },
        ]);

        let (out, applied, skipped) = pipeline.apply_transforms(sample_frame()).unwrap();

        // The absent column skips its step; the run continues.
        assert_eq!(out.height(), 4);
        assert_eq!(applied, vec!["derive_scaled(revenue_x2)"]);
        assert_eq!(
            skipped,
            vec![SkipEvent {
                step: "drop_missing(Discount)".to_string(),
                missing_columns: vec!["Discount".to_string()],
            }]
        );
    }

    #[test]
    fn test_run_fails_on_missing_source() {
        let config = PrepConfig::builder()
            .source_path("no/such/file.csv")
            .output_path("cleaned.parquet")
            .build()
            .unwrap();

        let err = PrepPipeline::new(config).run().unwrap_err();
        assert_eq!(err.error_code(), "SOURCE_NOT_FOUND");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_sibling_tmp_path() {
        assert_eq!(
            sibling_tmp_path(Path::new("data/cleaned.parquet")),
            PathBuf::from("data/cleaned.parquet.tmp")
        );
    }
}
