//! Logging utilities
//!
//! This module provides standardized logging functions for pipeline stages.

use std::time::Duration;

/// Log a stage start with consistent format
///
/// # Arguments
/// * `stage` - Name of the pipeline stage
/// * `rows` - Number of rows entering the stage
pub fn log_stage_start(stage: &str, rows: usize) {
    log::info!("{stage}: starting on {rows} rows");
}

/// Log a stage completion with consistent format
///
/// # Arguments
/// * `stage` - Name of the pipeline stage
/// * `rows_in` - Number of rows that entered the stage
/// * `rows_out` - Number of rows that left the stage
/// * `elapsed` - Optional elapsed time
pub fn log_stage_complete(stage: &str, rows_in: usize, rows_out: usize, elapsed: Option<Duration>) {
    match elapsed {
        Some(duration) => {
            log::info!("{stage}: completed {rows_in} -> {rows_out} rows in {duration:?}");
        }
        None => log::info!("{stage}: completed {rows_in} -> {rows_out} rows"),
    }
}

/// Log a stage warning with consistent format
pub fn log_warning(stage: &str, message: &str) {
    log::warn!("{stage}: {message}");
}
