//! Final column selection and encoding

use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;

use super::report::DatasetSummary;
use crate::config::PreprocessConfig;
use crate::error::{PreprocessError, Result};
use crate::utils::arrow::{column_names, dictionary_encode, drop_columns, set_columns, string_column};

/// The model-ready dataset
#[derive(Debug, Clone)]
pub struct FinalDataset {
    /// Retained and derived columns plus the label
    pub batch: RecordBatch,
    /// Shape of `batch`
    pub summary: DatasetSummary,
}

/// Drop configured columns, check the schema, and dictionary-encode remaining text
pub fn finalize(batch: &RecordBatch, config: &PreprocessConfig) -> Result<FinalDataset> {
    let retained = drop_columns(batch, &config.drop_columns)?;
    let names = column_names(&retained);

    let mut seen = FxHashSet::default();
    let duplicates: Vec<String> = names
        .iter()
        .filter(|n| !seen.insert(n.as_str()))
        .cloned()
        .collect();
    if !duplicates.is_empty() {
        return Err(PreprocessError::Schema {
            message: format!("Duplicate column names: {duplicates:?}"),
            columns: duplicates,
        });
    }

    let label_column = &config.target.label_column;
    if !names.contains(label_column) {
        return Err(PreprocessError::schema(
            label_column,
            format!("Label column '{label_column}' is missing"),
        ));
    }

    let mut encoded = Vec::new();
    for (name, array) in names.iter().zip(retained.columns()) {
        if matches!(array.data_type(), DataType::Utf8 | DataType::LargeUtf8) {
            let text = string_column(array, name)?;
            encoded.push((name.clone(), Arc::new(dictionary_encode(&text)) as ArrayRef));
        }
    }
    let batch = set_columns(&retained, encoded)?;

    let summary = DatasetSummary {
        rows: batch.num_rows(),
        columns: batch.num_columns(),
    };
    log::info!("Final dataset: {summary}");

    Ok(FinalDataset { batch, summary })
}
