//! Dashboard Data Preparation Toolkit
//!
//! A small Polars-based library for the two stages behind a file-backed
//! dashboard:
//!
//! - **Preparation**: read a raw CSV, apply a configured sequence of named
//!   transform steps, write a cleaned Parquet file. One-shot and offline.
//! - **Presentation**: load the cleaned file through a memoizing
//!   [`DatasetCache`] and render summary views (counts, preview rows,
//!   describe statistics) to an abstract [`DisplaySurface`].
//!
//! Transform steps declare the columns they need; a step whose columns are
//! absent is skipped with a recorded [`SkipEvent`] instead of failing the
//! run. Load failures are typed: a missing file is reported distinctly from
//! an unreadable one, and the caller decides whether rendering continues.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dashprep::{
//!     DatasetCache, PrepConfig, PrepPipeline, TermSurface, TransformSpec,
//!     render_dashboard,
//! };
//!
//! // Stage 1: prepare the cleaned dataset
//! let config = PrepConfig::builder()
//!     .source_path("data/raw.csv")
//!     .output_path("data/cleaned.parquet")
//!     .transform(TransformSpec::DropMissing { column: "Revenue".into() })
//!     .transform(TransformSpec::DeriveScaled {
//!         source: "Revenue".into(),
//!         output: "revenue_x2".into(),
//!         factor: 2.0,
//!     })
//!     .build()?;
//!
//! let report = PrepPipeline::new(config).run()?;
//! println!("{} rows written", report.rows_after);
//!
//! // Stage 2: load (memoized) and render
//! let cache = DatasetCache::new();
//! let mut surface = TermSurface;
//! render_dashboard(&cache, "data/cleaned.parquet", &mut surface)?;
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod transforms;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cache::{DatasetCache, LoadOutcome};
pub use config::{ConfigValidationError, PrepConfig, PrepConfigBuilder, WriteMode};
pub use error::{DashprepError, Result as DashprepResult, ResultExt};
pub use pipeline::PrepPipeline;
pub use render::{
    DisplaySurface, TermSurface, render_dashboard, render_empty, render_load_failure,
    render_overview,
};
pub use transforms::TransformSpec;
pub use types::{DatasetSummary, PrepReport, SkipEvent};
pub use utils::{has_column, is_numeric_dtype, resolve_path};
