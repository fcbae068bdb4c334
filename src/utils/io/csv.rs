//! Delimited file operations

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::array::ArrayRef;
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::utils::arrow::{decode_dictionary, set_columns};
use crate::utils::io::DEFAULT_BATCH_SIZE;

/// Read a CSV file with a header row into a single batch
///
/// Every column is read as nullable `Utf8`; typing is the cleaner's job.
/// Empty cells become null.
///
/// # Errors
/// Returns an error if the file cannot be opened or is not valid CSV
pub fn read_csv(path: &Path) -> Result<RecordBatch> {
    let start = Instant::now();
    log::info!("Reading CSV file {}", path.display());

    let mut file = File::open(path)?;
    let (header, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, Some(1))?;
    file.rewind()?;

    let schema = Arc::new(Schema::new(
        header
            .fields()
            .iter()
            .map(|f| Field::new(f.name(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(DEFAULT_BATCH_SIZE)
        .build(file)?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    let batch = concat_batches(&schema, &batches)?;

    log::info!(
        "Read {} rows x {} columns from {} in {:?}",
        batch.num_rows(),
        batch.num_columns(),
        path.display(),
        start.elapsed()
    );
    Ok(batch)
}

/// Write a batch to CSV with a header row
///
/// Dictionary columns are written as their text values.
///
/// # Errors
/// Returns an error if the file cannot be created or a column cannot be written
pub fn write_csv(path: &Path, batch: &RecordBatch) -> Result<()> {
    let schema = batch.schema();
    let mut decoded: Vec<(String, ArrayRef)> = Vec::new();
    for (field, array) in schema.fields().iter().zip(batch.columns()) {
        if matches!(field.data_type(), DataType::Dictionary(_, _)) {
            decoded.push((field.name().clone(), decode_dictionary(array)?));
        }
    }
    let plain = set_columns(batch, decoded)?;

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(&plain)?;

    log::info!("Wrote {} rows to {}", plain.num_rows(), path.display());
    Ok(())
}
