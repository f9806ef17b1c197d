//! Shared helpers used across the preparation and load stages.

use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Resolve a path to its canonical form where possible.
///
/// Canonicalization requires the file to exist; for paths that do not
/// (yet) exist the original path is returned unchanged. Used as the
/// cache key for loaded datasets so `./data.parquet` and `data.parquet`
/// share one slot.
pub fn resolve_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Check whether a frame contains a column with the given name.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(is_numeric_dtype(&DataType::Int32));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_has_column() {
        let frame = df!("Revenue" => [1.0, 2.0]).unwrap();
        assert!(has_column(&frame, "Revenue"));
        assert!(!has_column(&frame, "Discount"));
    }

    #[test]
    fn test_resolve_path_missing_file_passthrough() {
        let path = Path::new("definitely/not/here.parquet");
        assert_eq!(resolve_path(path), path.to_path_buf());
    }
}
