//! IO utilities for file operations
//!
//! This module provides readers and writers for the delimited and Parquet
//! files that surround the pipeline. The pipeline itself never touches disk.

pub mod csv;
pub mod parquet;

use std::path::Path;

use arrow::record_batch::RecordBatch;

use crate::error::Result;

// Re-export commonly used functions for convenience
pub use self::csv::{read_csv, write_csv};
pub use self::parquet::{read_parquet, write_parquet};

/// Default batch size for CSV reading
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Whether a path names a Parquet file
#[must_use]
pub fn is_parquet_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"))
}

/// Read a dataset, choosing the format from the file extension
pub fn read_dataset(path: &Path) -> Result<RecordBatch> {
    if is_parquet_path(path) {
        read_parquet(path)
    } else {
        read_csv(path)
    }
}

/// Write a dataset, choosing the format from the file extension
pub fn write_dataset(path: &Path, batch: &RecordBatch) -> Result<()> {
    if is_parquet_path(path) {
        write_parquet(path, batch)
    } else {
        write_csv(path, batch)
    }
}
