//! Row-level cleaning of the raw dataset
//!
//! The cleaner parses date and timestamp columns, fills configured nulls,
//! removes rows with a missing mandatory date or an invalid identifier, and
//! drops duplicates keeping the first occurrence. Running it on its own
//! output changes nothing.

use std::sync::Arc;
use std::time::Instant;

use arrow::array::{Array, ArrayRef, BooleanArray, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use arrow::row::{RowConverter, SortField};
use rayon::prelude::*;
use rustc_hash::FxHashSet;

use super::report::CleaningReport;
use crate::config::PreprocessConfig;
use crate::error::{PreprocessError, Result};
use crate::schema::ColumnKind;
use crate::utils::arrow::{
    downcast_array, filter_rows, get_column_by_name, set_columns, string_column, to_date32,
    to_timestamp_seconds,
};
use crate::utils::logging::{log_stage_complete, log_stage_start};

const STAGE: &str = "Cleaning";

/// Parse a patient identifier
///
/// Accepts integers and integral decimals (`"1024.0"`, as produced by
/// spreadsheet exports) strictly greater than zero. Exponents, signs and
/// other float spellings are rejected.
#[must_use]
pub fn parse_identifier(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<i64>() {
        return (id > 0).then_some(id);
    }
    let plain_decimal = raw.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && raw.bytes().filter(|b| *b == b'.').count() == 1
        && raw.bytes().any(|b| b.is_ascii_digit());
    if !plain_decimal {
        return None;
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value > 0.0 && value < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

/// Read an identifier column as `Int64`, with null for every invalid value
fn identifiers(array: &ArrayRef, column_name: &str) -> Result<Int64Array> {
    if array.data_type() == &DataType::Int64 {
        let ids = downcast_array::<Int64Array>(array, column_name, "Int64")?;
        return Ok(ids.iter().map(|id| id.filter(|v| *v > 0)).collect());
    }
    let text = string_column(array, column_name)?;
    Ok(text.iter().map(|v| v.and_then(parse_identifier)).collect())
}

/// Parse every configured date and timestamp column that is present
fn parse_temporal_columns(
    batch: &RecordBatch,
    config: &PreprocessConfig,
) -> Result<Vec<(String, ArrayRef)>> {
    let formats = &config.cleaning.date_formats;

    let present = |names: &[String]| -> Vec<(String, ArrayRef)> {
        names
            .iter()
            .filter_map(|name| {
                let column = batch.column_by_name(name).cloned();
                if column.is_none() {
                    log::debug!("{STAGE}: optional column '{name}' not present, skipping");
                }
                column.map(|c| (name.clone(), c))
            })
            .collect()
    };

    let dates = present(&config.cleaning.date_columns)
        .into_par_iter()
        .map(|(name, array)| -> Result<(String, ArrayRef)> {
            let parsed = to_date32(&array, &name, formats)?;
            Ok((name, Arc::new(parsed) as ArrayRef))
        });
    let timestamps = present(&config.cleaning.timestamp_columns)
        .into_par_iter()
        .map(|(name, array)| -> Result<(String, ArrayRef)> {
            let parsed = to_timestamp_seconds(&array, &name, formats)?;
            Ok((name, Arc::new(parsed) as ArrayRef))
        });

    dates.chain(timestamps).collect()
}

/// Replace nulls in the configured text columns; returns the columns and the number of cells filled per row
fn fill_missing(
    batch: &RecordBatch,
    config: &PreprocessConfig,
) -> Result<(Vec<(String, ArrayRef)>, Vec<usize>)> {
    let mut columns = Vec::new();
    let mut filled = vec![0; batch.num_rows()];

    for (name, value) in &config.cleaning.fill_values {
        let Some(array) = batch.column_by_name(name) else {
            continue;
        };
        if !matches!(
            ColumnKind::of(array.data_type()),
            ColumnKind::String | ColumnKind::Categorical
        ) {
            log::warn!(
                "{STAGE}: fill value for '{name}' ignored, column has type {}",
                array.data_type()
            );
            continue;
        }
        if array.null_count() == 0 {
            continue;
        }

        for (row, count) in filled.iter_mut().enumerate() {
            if array.is_null(row) {
                *count += 1;
            }
        }
        let text = string_column(array, name)?;
        let repaired: StringArray = text
            .iter()
            .map(|v| Some(v.unwrap_or(value.as_str())))
            .collect();
        columns.push((name.clone(), Arc::new(repaired) as ArrayRef));
    }

    Ok((columns, filled))
}

/// Mark the first occurrence of every distinct key
fn first_occurrences(batch: &RecordBatch, key: Option<&[String]>) -> Result<BooleanArray> {
    let columns: Vec<ArrayRef> = match key {
        Some(names) => names
            .iter()
            .map(|name| get_column_by_name(batch, name))
            .collect::<Result<_>>()?,
        None => batch.columns().to_vec(),
    };

    if columns.is_empty() {
        return Ok(BooleanArray::from(vec![true; batch.num_rows()]));
    }

    let fields = columns
        .iter()
        .map(|c| SortField::new(c.data_type().clone()))
        .collect();
    let converter = RowConverter::new(fields)?;
    let rows = converter.convert_columns(&columns)?;

    let mut seen = FxHashSet::default();
    Ok(rows.iter().map(|row| Some(seen.insert(row))).collect())
}

/// Remove and repair malformed rows
pub fn clean(batch: &RecordBatch, config: &PreprocessConfig) -> Result<(RecordBatch, CleaningReport)> {
    let start = Instant::now();
    log_stage_start(STAGE, batch.num_rows());

    let schema = batch.schema();
    let missing: Vec<String> = config
        .cleaning
        .mandatory_date_columns
        .iter()
        .chain(std::iter::once(&config.columns.identifier))
        .filter(|c| schema.field_with_name(c).is_err())
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(PreprocessError::missing_columns(missing));
    }

    let mut report = CleaningReport {
        input_rows: batch.num_rows(),
        ..CleaningReport::default()
    };

    // Parse, identify and fill in one pass over the columns
    let mut replaced = parse_temporal_columns(batch, config)?;
    let identifier = &config.columns.identifier;
    let ids = identifiers(&get_column_by_name(batch, identifier)?, identifier)?;
    let (filled, filled_per_row) = fill_missing(batch, config)?;
    replaced.push((identifier.clone(), Arc::new(ids) as ArrayRef));
    replaced.extend(filled);
    let parsed = set_columns(batch, replaced)?;

    let mandatory: Vec<ArrayRef> = config
        .cleaning
        .mandatory_date_columns
        .iter()
        .map(|c| get_column_by_name(&parsed, c))
        .collect::<Result<_>>()?;
    let ids = get_column_by_name(&parsed, identifier)?;

    let mut keep = Vec::with_capacity(parsed.num_rows());
    for row in 0..parsed.num_rows() {
        if mandatory.iter().any(|c| c.is_null(row)) {
            report.malformed_dates += 1;
            keep.push(false);
        } else if ids.is_null(row) {
            report.invalid_identifiers += 1;
            keep.push(false);
        } else {
            keep.push(true);
        }
    }
    let survivors: Vec<usize> = keep
        .iter()
        .enumerate()
        .filter_map(|(row, kept)| kept.then_some(row))
        .collect();
    let valid = filter_rows(&parsed, &BooleanArray::from(keep))?;

    let first = first_occurrences(&valid, config.cleaning.duplicate_key.as_deref())?;
    report.duplicates = first.false_count();
    // Only fills on rows that leave the cleaner are reported
    report.filled_values = survivors
        .iter()
        .zip(first.iter())
        .filter(|(_, is_first)| *is_first == Some(true))
        .map(|(row, _)| filled_per_row[*row])
        .sum();
    let cleaned = filter_rows(&valid, &first)?;
    report.output_rows = cleaned.num_rows();

    log::debug!("{STAGE}: {report}");
    log_stage_complete(
        STAGE,
        report.input_rows,
        report.output_rows,
        Some(start.elapsed()),
    );

    Ok((cleaned, report))
}
