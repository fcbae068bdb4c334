//! Utilities for working with Arrow arrays and record batches.
//!
//! This module provides helpers for looking up, downcasting, replacing and
//! dropping columns, so that pipeline stages can stay focused on their own
//! transformation logic.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, StringArray};
use arrow::compute::{cast, filter_record_batch};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::error::{PreprocessError, Result};

/// Get the column index by name from a record batch
///
/// # Errors
/// Returns a schema error if the column does not exist
pub fn get_column_index(batch: &RecordBatch, column_name: &str) -> Result<usize> {
    batch
        .schema()
        .index_of(column_name)
        .map_err(|_| PreprocessError::schema(column_name, format!("Column '{column_name}' not found")))
}

/// Get a column from a record batch by name
///
/// # Errors
/// Returns a schema error if the column does not exist
pub fn get_column_by_name(batch: &RecordBatch, column_name: &str) -> Result<ArrayRef> {
    let idx = get_column_index(batch, column_name)?;
    Ok(batch.column(idx).clone())
}

/// Get a column if present
#[must_use]
pub fn get_optional_column(batch: &RecordBatch, column_name: &str) -> Option<ArrayRef> {
    batch.column_by_name(column_name).cloned()
}

/// Downcast a column to a specific array type with clear error messages
///
/// # Type Parameters
///
/// * `A` - The target array type to downcast to
///
/// # Arguments
///
/// * `array` - The array reference to downcast
/// * `column_name` - The name of the column (for error messages)
/// * `expected_type_name` - A human-readable name of the expected type (for error messages)
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    expected_type_name: &str,
) -> Result<&'a A> {
    array
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| PreprocessError::InvalidDataType {
            column: column_name.to_string(),
            expected: expected_type_name.to_string(),
            actual: array.data_type().to_string(),
        })
}

/// View any text-like or numeric column as a `StringArray`
///
/// Dictionary, large-string and numeric columns are cast; plain `Utf8`
/// columns are shared without copying.
pub fn string_column(array: &ArrayRef, column_name: &str) -> Result<StringArray> {
    if array.data_type() == &DataType::Utf8 {
        return downcast_array::<StringArray>(array, column_name, "Utf8").cloned();
    }

    let converted = cast(array, &DataType::Utf8).map_err(|e| PreprocessError::InvalidDataType {
        column: column_name.to_string(),
        expected: format!("text-convertible column ({e})"),
        actual: array.data_type().to_string(),
    })?;

    downcast_array::<StringArray>(&converted, column_name, "Utf8").cloned()
}

/// Replace a column in place, or append it when the name is new
///
/// The new field is always nullable and takes the array's data type.
pub fn set_column(batch: &RecordBatch, column_name: &str, array: ArrayRef) -> Result<RecordBatch> {
    set_columns(batch, vec![(column_name.to_string(), array)])
}

/// Replace or append several columns at once, preserving existing column order
pub fn set_columns(batch: &RecordBatch, columns: Vec<(String, ArrayRef)>) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    let mut arrays: Vec<ArrayRef> = batch.columns().to_vec();

    for (name, array) in columns {
        if array.len() != batch.num_rows() {
            return Err(PreprocessError::schema(
                &name,
                format!(
                    "Column '{name}' has {} values, batch has {} rows",
                    array.len(),
                    batch.num_rows()
                ),
            ));
        }

        let field = Field::new(&name, array.data_type().clone(), true);
        match fields.iter().position(|f| f.name() == &name) {
            Some(idx) => {
                fields[idx] = field;
                arrays[idx] = array;
            }
            None => {
                fields.push(field);
                arrays.push(array);
            }
        }
    }

    let schema = Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()));
    Ok(RecordBatch::try_new(schema, arrays)?)
}

/// Remove the named columns that are present; absent names are ignored
pub fn drop_columns(batch: &RecordBatch, column_names: &[String]) -> Result<RecordBatch> {
    let schema = batch.schema();
    let keep: Vec<usize> = schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, f)| !column_names.iter().any(|c| c == f.name()))
        .map(|(i, _)| i)
        .collect();

    Ok(batch.project(&keep)?)
}

/// Keep the rows where `mask` is true
pub fn filter_rows(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    Ok(filter_record_batch(batch, mask)?)
}

/// Names of the columns in schema order
#[must_use]
pub fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect()
}
