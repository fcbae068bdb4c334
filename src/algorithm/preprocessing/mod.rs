//! Preprocessing pipeline
//!
//! Stages run strictly in order: validation, cleaning, feature derivation,
//! categorical normalization, target labeling and finalization. Each stage
//! takes the previous batch by reference and returns a new one. The first
//! failure aborts the run and is returned unchanged.

pub mod categorical;
pub mod cleaning;
pub mod finalize;
pub mod report;
pub mod target;
pub mod validation;

pub use categorical::normalize;
pub use cleaning::clean;
pub use finalize::{FinalDataset, finalize};
pub use report::{CleaningReport, DatasetSummary, ValidationReport};
pub use target::label;
pub use validation::validate;

use std::time::Instant;

use arrow::record_batch::RecordBatch;

use crate::algorithm::features::derive_features;
use crate::config::PreprocessConfig;
use crate::error::Result;

/// Result of a complete pipeline run
#[derive(Debug, Clone)]
pub struct PreprocessOutput {
    /// The model-ready dataset
    pub dataset: FinalDataset,
    /// Shape of the raw input
    pub validation: ValidationReport,
    /// What the cleaner removed and repaired
    pub cleaning: CleaningReport,
}

/// Run every stage over `batch`
pub fn preprocess(batch: &RecordBatch, config: &PreprocessConfig) -> Result<PreprocessOutput> {
    config.validate()?;
    run_stages(batch, config)
}

fn run_stages(batch: &RecordBatch, config: &PreprocessConfig) -> Result<PreprocessOutput> {
    let start = Instant::now();

    let validation = validate(batch, config)?;
    let (cleaned, cleaning) = clean(batch, config)?;
    let enriched = derive_features(&cleaned, config)?;
    let normalized = normalize(&enriched, config)?;
    let labeled = label(&normalized, config)?;
    let dataset = finalize(&labeled, config)?;

    log::info!(
        "Preprocessed {} raw rows into {} in {:?}",
        validation.rows,
        dataset.summary,
        start.elapsed()
    );

    Ok(PreprocessOutput {
        dataset,
        validation,
        cleaning,
    })
}

/// A pipeline bound to one validated configuration
///
/// Useful when several datasets are processed with the same settings; the
/// configuration is checked once at construction.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    /// Validate `config` and bind it
    pub fn new(config: PreprocessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The bound configuration
    #[must_use]
    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Run every stage over `batch`
    pub fn run(&self, batch: &RecordBatch) -> Result<PreprocessOutput> {
        run_stages(batch, &self.config)
    }
}
