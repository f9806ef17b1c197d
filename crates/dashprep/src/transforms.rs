//! Named transform steps for the preparation pipeline.
//!
//! Each step declares the columns it requires; the pipeline checks those
//! requirements before applying a step and records a skip event when they
//! are not met, rather than failing the run.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{DashprepError, Result};
use crate::utils::is_numeric_dtype;

/// A single named transform step.
///
/// Steps are configuration data: serializable, order-preserving, and applied
/// one at a time by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformSpec {
    /// Drop rows that hold a null in `column`.
    DropMissing { column: String },

    /// Add a new column `output` holding `factor * source` for every row.
    DeriveScaled {
        source: String,
        output: String,
        factor: f64,
    },
}

impl TransformSpec {
    /// Human-readable step name, used in reports and skip events.
    pub fn name(&self) -> String {
        match self {
            Self::DropMissing { column } => format!("drop_missing({column})"),
            Self::DeriveScaled { output, .. } => format!("derive_scaled({output})"),
        }
    }

    /// Columns that must be present for this step to apply.
    pub fn required_columns(&self) -> Vec<&str> {
        match self {
            Self::DropMissing { column } => vec![column.as_str()],
            Self::DeriveScaled { source, .. } => vec![source.as_str()],
        }
    }

    /// Apply this step to a frame.
    ///
    /// Callers are expected to have verified `required_columns` first;
    /// failures here are genuine transform errors, not missing columns.
    pub fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        match self {
            Self::DropMissing { column } => df
                .lazy()
                .drop_nulls(Some(by_name([column.as_str()], true)))
                .collect()
                .map_err(|e| DashprepError::TransformFailed {
                    step: self.name(),
                    reason: e.to_string(),
                }),
            Self::DeriveScaled {
                source,
                output,
                factor,
            } => {
                let dtype = df.column(source)?.dtype().clone();
                if !is_numeric_dtype(&dtype) {
                    return Err(DashprepError::TransformFailed {
                        step: self.name(),
                        reason: format!("column '{source}' has non-numeric type {dtype}"),
                    });
                }

                df.lazy()
                    .with_column((col(source.as_str()) * lit(*factor)).alias(output.as_str()))
                    .collect()
                    .map_err(|e| DashprepError::TransformFailed {
                        step: self.name(),
                        reason: e.to_string(),
                    })
            }
        }
    }
}
