//! Console output utilities
//!
//! This module provides utilities for formatted console output.

use arrow::record_batch::RecordBatch;

/// Print detailed schema information for a batch
pub fn print_schema_info(batch: &RecordBatch) {
    println!("Schema:");
    for field in batch.schema().fields() {
        println!("  - {} ({})", field.name(), field.data_type());
    }
}

/// Print the shape of a batch with a label
pub fn print_shape(label: &str, batch: &RecordBatch) {
    println!(
        "   {label}: {} rows x {} columns",
        batch.num_rows(),
        batch.num_columns()
    );
}
