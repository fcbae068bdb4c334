//! Arrow data handling utilities
//!
//! This module contains utilities for working with Arrow arrays and record
//! batches: column lookup and replacement, and typed conversions of raw text.

pub mod array_utils;
pub mod conversion;

// Re-export commonly used functions for convenience
pub use array_utils::{
    column_names, downcast_array, drop_columns, filter_rows, get_column_by_name,
    get_column_index, get_optional_column, set_column, set_columns, string_column,
};
pub use conversion::{
    date_at, datetime_at, decode_dictionary, dictionary_encode, labeled_dictionary, to_date32,
    to_timestamp_seconds,
};
