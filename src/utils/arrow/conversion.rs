//! Conversions between raw text columns and typed Arrow arrays.
//!
//! Parsing never fails on a bad value: anything that cannot be read becomes
//! null, which is the pipeline's missing-value sentinel.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, Date32Array, DictionaryArray, Int32Array, StringArray,
    TimestampSecondArray,
};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Int32Type, TimeUnit};
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{PreprocessError, Result};
use crate::schema::{DateFormatConfig, parse_date_string, parse_timestamp_string};
use crate::utils::arrow::array_utils::{downcast_array, string_column};

/// Read any date-like column as `Date32`, parsing text with `formats`
pub fn to_date32(array: &ArrayRef, column_name: &str, formats: &DateFormatConfig) -> Result<Date32Array> {
    match array.data_type() {
        DataType::Date32 => downcast_array::<Date32Array>(array, column_name, "Date32").cloned(),
        DataType::Date64 | DataType::Timestamp(_, _) => {
            let converted = cast(array, &DataType::Date32)?;
            downcast_array::<Date32Array>(&converted, column_name, "Date32").cloned()
        }
        DataType::Null => Ok(Date32Array::new_null(array.len())),
        _ => {
            let text = string_column(array, column_name)?;
            Ok(text
                .iter()
                .map(|value| {
                    value
                        .and_then(|s| parse_date_string(s, formats))
                        .map(Date32Type::from_naive_date)
                })
                .collect())
        }
    }
}

/// Read any timestamp-like column as `Timestamp(Second)`, parsing text with `formats`
pub fn to_timestamp_seconds(
    array: &ArrayRef,
    column_name: &str,
    formats: &DateFormatConfig,
) -> Result<TimestampSecondArray> {
    let target = DataType::Timestamp(TimeUnit::Second, None);
    match array.data_type() {
        t if *t == target => {
            downcast_array::<TimestampSecondArray>(array, column_name, "Timestamp(Second)").cloned()
        }
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            let converted = cast(array, &target)?;
            downcast_array::<TimestampSecondArray>(&converted, column_name, "Timestamp(Second)")
                .cloned()
        }
        DataType::Null => Ok(TimestampSecondArray::new_null(array.len())),
        _ => {
            let text = string_column(array, column_name)?;
            Ok(text
                .iter()
                .map(|value| {
                    value
                        .and_then(|s| parse_timestamp_string(s, formats))
                        .map(|dt| dt.and_utc().timestamp())
                })
                .collect())
        }
    }
}

/// Date at `index`, `None` when null
#[must_use]
pub fn date_at(array: &Date32Array, index: usize) -> Option<NaiveDate> {
    if array.is_null(index) {
        None
    } else {
        array.value_as_date(index)
    }
}

/// Timestamp at `index`, `None` when null
#[must_use]
pub fn datetime_at(array: &TimestampSecondArray, index: usize) -> Option<NaiveDateTime> {
    if array.is_null(index) {
        None
    } else {
        array.value_as_datetime(index)
    }
}

/// Dictionary-encode a text column, keeping nulls
#[must_use]
pub fn dictionary_encode(array: &StringArray) -> DictionaryArray<Int32Type> {
    array.iter().collect()
}

/// Build a dictionary column over a fixed label set
///
/// Every label appears in the dictionary even when unused, so the column
/// declares its complete value set. `keys` index into `labels`.
pub fn labeled_dictionary(labels: &[String], keys: Vec<Option<usize>>) -> Result<ArrayRef> {
    let keys = keys
        .into_iter()
        .map(|key| key.map(i32::try_from).transpose())
        .collect::<std::result::Result<Int32Array, _>>()
        .map_err(|_| PreprocessError::config("too many labels for a dictionary column"))?;
    let values = Arc::new(StringArray::from(labels.to_vec()));
    let dictionary = DictionaryArray::<Int32Type>::try_new(keys, values)?;
    Ok(Arc::new(dictionary))
}

/// Cast dictionary-encoded text back to plain `Utf8`
pub fn decode_dictionary(array: &ArrayRef) -> Result<ArrayRef> {
    match array.data_type() {
        DataType::Dictionary(_, value) if value.as_ref() == &DataType::Utf8 => {
            Ok(cast(array, &DataType::Utf8)?)
        }
        _ => Ok(array.clone()),
    }
}
