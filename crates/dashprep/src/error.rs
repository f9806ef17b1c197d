//! Custom error types for the preparation and load stages.
//!
//! This module provides the error hierarchy using `thiserror`. Errors are
//! serializable as `{code, message}` pairs so a hosting dashboard can route
//! them to its own display without parsing message text.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for dashprep operations.
#[derive(Error, Debug)]
pub enum DashprepError {
    /// The raw source file for the preparation stage does not exist.
    #[error("source file not found: {0}")]
    SourceNotFound(String),

    /// The cleaned data file for the load stage does not exist.
    ///
    /// Detected by an explicit existence check, distinct from any other
    /// read failure.
    #[error("data file not found at {0}")]
    DataFileNotFound(String),

    /// The cleaned data file exists but could not be read as Parquet.
    #[error("failed to load data from '{path}': {reason}")]
    LoadFailed { path: String, reason: String },

    /// A transform step failed while being applied.
    #[error("transform step '{step}' failed: {reason}")]
    TransformFailed { step: String, reason: String },

    /// Invalid configuration provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DashprepError>,
    },
}

impl DashprepError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DashprepError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for host-side handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SourceNotFound(_) => "SOURCE_NOT_FOUND",
            Self::DataFileNotFound(_) => "DATA_FILE_NOT_FOUND",
            Self::LoadFailed { .. } => "LOAD_FAILED",
            Self::TransformFailed { .. } => "TRANSFORM_FAILED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a missing-file condition (source or data).
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::SourceNotFound(_) | Self::DataFileNotFound(_) => true,
            Self::WithContext { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

/// Serialize implementation for host IPC compatibility.
///
/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for DashprepError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DashprepError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for dashprep operations.
pub type Result<T> = std::result::Result<T, DashprepError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DashprepError::Polars(e).with_context(context))
    }
}
