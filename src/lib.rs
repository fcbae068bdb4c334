//! A Rust library for validating, cleaning and feature-engineering hospital
//! appointment records into a model-ready no-show dataset.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod schema;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{BinSpec, Closed, Outcome, PreprocessConfig, RareCategoryRule};
pub use error::{PreprocessError, Result};
pub use schema::ColumnKind;

// Arrow types
pub use arrow::datatypes::Schema as ArrowSchema;
pub use arrow::record_batch::RecordBatch;

// Pipeline stages
pub use algorithm::features::{
    AgeBand, Bucket, LeadTimeBucket, RecencyBucket, Season, derive_features,
};
pub use algorithm::preprocessing::{
    CleaningReport, DatasetSummary, FinalDataset, PreprocessOutput, Preprocessor,
    ValidationReport, clean, finalize, label, normalize, preprocess, validate,
};

// Utility functions
pub use utils::io::{read_csv, read_dataset, write_csv, write_dataset, write_parquet};
