//! Parquet file operations

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::error::Result;
use crate::utils::io::DEFAULT_BATCH_SIZE;

/// Read a Parquet file into a single batch
///
/// # Errors
/// Returns an error if the file cannot be opened or if the Parquet file is invalid
pub fn read_parquet(path: &Path) -> Result<RecordBatch> {
    let start = Instant::now();
    log::info!("Reading parquet file {}", path.display());

    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.with_batch_size(DEFAULT_BATCH_SIZE).build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    let batch = concat_batches(&schema, &batches)?;

    log::info!(
        "Read {} rows from {} in {:?}",
        batch.num_rows(),
        path.display(),
        start.elapsed()
    );
    Ok(batch)
}

/// Write a batch to a Snappy-compressed Parquet file
///
/// # Errors
/// Returns an error if the file cannot be created or written
pub fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;

    log::info!("Wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(())
}
