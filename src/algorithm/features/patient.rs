//! Patient history features computed over the whole dataset

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Int64Array};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;

use crate::config::PreprocessConfig;
use crate::error::Result;
use crate::schema::derived;
use crate::utils::arrow::{get_column_by_name, set_column, string_column};

/// Number of records sharing each record's identifier
///
/// Identifiers are compared after trimming. Null identifiers get a null count.
pub fn visit_counts(identifiers: &ArrayRef, column_name: &str) -> Result<Int64Array> {
    let ids = string_column(identifiers, column_name)?;

    let mut counts: FxHashMap<&str, i64> = FxHashMap::default();
    for id in ids.iter().flatten() {
        *counts.entry(id.trim()).or_insert(0) += 1;
    }

    Ok((0..ids.len())
        .map(|i| {
            if ids.is_null(i) {
                None
            } else {
                counts.get(ids.value(i).trim()).copied()
            }
        })
        .collect())
}

/// Append `patient_visit_count`
pub fn add_patient_features(batch: &RecordBatch, config: &PreprocessConfig) -> Result<RecordBatch> {
    let identifier = &config.columns.identifier;
    let counts = visit_counts(&get_column_by_name(batch, identifier)?, identifier)?;
    set_column(batch, derived::PATIENT_VISIT_COUNT, Arc::new(counts))
}
