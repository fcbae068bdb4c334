//! Binary no-show label from the appointment status

use std::sync::Arc;
use std::time::Instant;

use arrow::array::{Array, BooleanArray, Int8Array};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;

use crate::config::{Outcome, PreprocessConfig, TargetConfig};
use crate::error::{PreprocessError, Result};
use crate::utils::arrow::{filter_rows, get_column_by_name, set_column, string_column};
use crate::utils::logging::{log_stage_complete, log_stage_start};

const STAGE: &str = "Target labeling";

/// What happens to a row with a given status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusResolution {
    /// The row is labeled with this outcome
    Labeled(Outcome),
    /// The row is removed
    Excluded,
}

/// Resolve a status against the mapping; `None` for an unmapped status
#[must_use]
pub fn resolve_status(status: &str, config: &TargetConfig) -> Option<StatusResolution> {
    let status = status.trim();
    if let Some(outcome) = config.status_mapping.get(status) {
        return Some(StatusResolution::Labeled(*outcome));
    }
    config
        .excluded_statuses
        .iter()
        .any(|s| s == status)
        .then_some(StatusResolution::Excluded)
}

/// Drop excluded statuses and append the binary label column
///
/// Fails on the first row whose status is missing or unmapped.
pub fn label(batch: &RecordBatch, config: &PreprocessConfig) -> Result<RecordBatch> {
    let start = Instant::now();
    log_stage_start(STAGE, batch.num_rows());

    let column = &config.columns.status;
    let statuses = string_column(&get_column_by_name(batch, column)?, column)?;

    let mut labels = Vec::with_capacity(statuses.len());
    let mut keep = Vec::with_capacity(statuses.len());
    let mut excluded: FxHashSet<&str> = FxHashSet::default();

    for (row, status) in statuses.iter().enumerate() {
        let resolution = status.and_then(|s| resolve_status(s, &config.target));
        match resolution {
            Some(StatusResolution::Labeled(outcome)) => {
                labels.push(Some(outcome.label()));
                keep.push(true);
            }
            Some(StatusResolution::Excluded) => {
                if let Some(s) = status {
                    excluded.insert(s.trim());
                }
                labels.push(None);
                keep.push(false);
            }
            None => {
                return Err(PreprocessError::UnknownStatus {
                    column: column.clone(),
                    value: status.unwrap_or("<null>").to_string(),
                    row,
                });
            }
        }
    }

    if !excluded.is_empty() {
        let removed = keep.iter().filter(|k| !**k).count();
        log::info!("{STAGE}: removed {removed} rows with excluded statuses {excluded:?}");
    }

    let labeled = set_column(
        batch,
        &config.target.label_column,
        Arc::new(Int8Array::from(labels)),
    )?;
    let labeled = filter_rows(&labeled, &BooleanArray::from(keep))?;

    log_stage_complete(
        STAGE,
        batch.num_rows(),
        labeled.num_rows(),
        Some(start.elapsed()),
    );
    Ok(labeled)
}
