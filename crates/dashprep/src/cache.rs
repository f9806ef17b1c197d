//! Memoizing loader for cleaned datasets.
//!
//! The cache is an explicit object owned by the hosting process, keyed by
//! the resolved input path. A miss reads the Parquet file once and stores
//! the frame; later loads of the same path return the stored frame without
//! touching the filesystem. Invalidation is manual via [`DatasetCache::clear`].

use parking_lot::Mutex;
use polars::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

use crate::error::{DashprepError, Result};
use crate::utils::resolve_path;

/// Result of a successful load.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// The loaded dataset. Shared; callers must not mutate it.
    pub frame: Arc<DataFrame>,
    /// Whether this load was served from the cache without a file read.
    pub from_cache: bool,
}

/// Path-keyed dataset cache for the presentation stage.
///
/// Thread-safe: hosts that serve concurrent requests can share one cache
/// behind an `Arc`.
#[derive(Debug, Default)]
pub struct DatasetCache {
    slots: Mutex<HashMap<PathBuf, Arc<DataFrame>>>,
    reads: AtomicUsize,
}

// Hosting frameworks move the cache across request contexts.
static_assertions::assert_impl_all!(DatasetCache: Send, Sync);

impl DatasetCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the dataset at `path`, reading the file at most once per path.
    ///
    /// # Errors
    ///
    /// - [`DashprepError::DataFileNotFound`] if the path does not exist
    ///   (explicit check, before any read is attempted).
    /// - [`DashprepError::LoadFailed`] if the file exists but cannot be
    ///   read as Parquet.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadOutcome> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DashprepError::DataFileNotFound(
                path.display().to_string(),
            ));
        }

        let key = resolve_path(path);
        let mut slots = self.slots.lock();

        if let Some(frame) = slots.get(&key) {
            debug!("Cache hit for {}", key.display());
            return Ok(LoadOutcome {
                frame: Arc::clone(frame),
                from_cache: true,
            });
        }

        self.reads.fetch_add(1, Ordering::SeqCst);
        let frame = read_parquet(path)?;
        info!(
            "Loaded dataset from {}: {} rows, {} columns",
            path.display(),
            frame.height(),
            frame.width()
        );

        let frame = Arc::new(frame);
        slots.insert(key, Arc::clone(&frame));

        Ok(LoadOutcome {
            frame,
            from_cache: false,
        })
    }

    /// Drop all cached frames. Call after regenerating the cleaned dataset.
    pub fn clear(&self) {
        self.slots.lock().clear();
    }

    /// Number of underlying file reads performed so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of cached datasets.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Whether the cache holds no datasets.
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}

fn read_parquet(path: &Path) -> Result<DataFrame> {
    let open_and_read = || -> std::result::Result<DataFrame, String> {
        let file = File::open(path).map_err(|e| e.to_string())?;
        ParquetReader::new(file).finish().map_err(|e| e.to_string())
    };

    open_and_read().map_err(|reason| DashprepError::LoadFailed {
        path: path.display().to_string(),
        reason,
    })
}
