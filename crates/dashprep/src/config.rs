//! Configuration for the preparation pipeline.
//!
//! Uses the builder pattern for ergonomic setup, with validation at
//! build time.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::transforms::TransformSpec;

/// How the output file is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WriteMode {
    /// Write to a sibling temp file, then rename over the destination.
    /// A failure mid-write leaves the previous output intact.
    #[default]
    AtomicRename,
    /// Write directly to the destination. A failure mid-write leaves the
    /// destination in an unspecified state.
    InPlace,
}

/// Configuration for a preparation run.
///
/// Use [`PrepConfig::builder()`] to construct one.
///
/// # Example
///
/// ```rust,ignore
/// use dashprep::{PrepConfig, TransformSpec};
///
/// let config = PrepConfig::builder()
///     .source_path("data/raw.csv")
///     .output_path("data/cleaned.parquet")
///     .transform(TransformSpec::DropMissing { column: "Revenue".into() })
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepConfig {
    /// Path of the raw delimited input file. Must exist at run time.
    pub source_path: PathBuf,

    /// Path the cleaned Parquet output is written to. Fully overwritten
    /// on every run.
    pub output_path: PathBuf,

    /// Transform steps, applied in order. Steps whose required columns are
    /// absent are skipped with a recorded skip event.
    pub transforms: Vec<TransformSpec>,

    /// Output write discipline.
    /// Default: AtomicRename
    pub write_mode: WriteMode,
}

impl PrepConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PrepConfigBuilder {
        PrepConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.source_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::MissingPath("source_path"));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::MissingPath("output_path"));
        }
        if self.source_path == self.output_path {
            return Err(ConfigValidationError::SamePath(self.source_path.clone()));
        }

        for step in &self.transforms {
            if step.required_columns().iter().any(|c| c.is_empty()) {
                return Err(ConfigValidationError::EmptyColumnName(step.name()));
            }
            if let TransformSpec::DeriveScaled { output, factor, .. } = step {
                if output.is_empty() {
                    return Err(ConfigValidationError::EmptyColumnName(step.name()));
                }
                if !factor.is_finite() {
                    return Err(ConfigValidationError::InvalidFactor {
                        step: step.name(),
                        factor: *factor,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("'{0}' must not be empty")]
    MissingPath(&'static str),

    #[error("source and output must differ (both are '{}')", .0.display())]
    SamePath(PathBuf),

    #[error("step '{0}' references an empty column name")]
    EmptyColumnName(String),

    #[error("step '{step}' has non-finite scale factor {factor}")]
    InvalidFactor { step: String, factor: f64 },
}

/// Builder for [`PrepConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PrepConfigBuilder {
    source_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    transforms: Vec<TransformSpec>,
    write_mode: Option<WriteMode>,
}

impl PrepConfigBuilder {
    /// Set the raw input path.
    pub fn source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Set the cleaned output path.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Append a transform step.
    pub fn transform(mut self, step: TransformSpec) -> Self {
        self.transforms.push(step);
        self
    }

    /// Replace the transform step list.
    pub fn transforms(mut self, steps: Vec<TransformSpec>) -> Self {
        self.transforms = steps;
        self
    }

    /// Set the output write discipline.
    pub fn write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = Some(mode);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PrepConfig` or an error if validation fails.
    pub fn build(self) -> Result<PrepConfig, ConfigValidationError> {
        let config = PrepConfig {
            source_path: self.source_path.unwrap_or_default(),
            output_path: self.output_path.unwrap_or_default(),
            transforms: self.transforms,
            write_mode: self.write_mode.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
