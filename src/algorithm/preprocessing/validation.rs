//! Schema and emptiness checks on the raw dataset

use arrow::record_batch::RecordBatch;

use super::report::ValidationReport;
use crate::config::PreprocessConfig;
use crate::error::{PreprocessError, Result};

/// Check that every required column is present and the dataset is not empty
///
/// All missing columns are reported together. The batch is not modified.
pub fn validate(batch: &RecordBatch, config: &PreprocessConfig) -> Result<ValidationReport> {
    let schema = batch.schema();
    let missing: Vec<String> = config
        .required_columns
        .iter()
        .filter(|c| schema.field_with_name(c).is_err())
        .cloned()
        .collect();

    if !missing.is_empty() {
        return Err(PreprocessError::missing_columns(missing));
    }

    if batch.num_rows() == 0 {
        return Err(PreprocessError::EmptyInput);
    }

    log::debug!(
        "Validated {} rows with {} columns",
        batch.num_rows(),
        batch.num_columns()
    );

    Ok(ValidationReport {
        rows: batch.num_rows(),
        columns: batch.num_columns(),
    })
}
