//! Categorical normalization
//!
//! Free-text categories are canonicalized (trimmed and lowercased) and
//! high-cardinality columns are collapsed to their most frequent values, with
//! everything else grouped under a single "other" label. Results are
//! dictionary encoded.

use std::sync::Arc;
use std::time::Instant;

use arrow::array::{ArrayRef, StringArray};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::config::{CategoricalConfig, PreprocessConfig, RareCategoryRule};
use crate::error::Result;
use crate::utils::arrow::{dictionary_encode, labeled_dictionary, set_columns, string_column};
use crate::utils::logging::{log_stage_complete, log_stage_start, log_warning};

const STAGE: &str = "Categorical normalization";

/// Trim and lowercase a category; blank values become missing
#[must_use]
pub fn canonicalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Values kept by a rare-category rule, most frequent first
///
/// Ties in frequency are broken by value so the result does not depend on
/// row order.
#[must_use]
pub fn frequent_values(values: &StringArray, rule: &RareCategoryRule) -> Vec<String> {
    values
        .iter()
        .flatten()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .counts()
        .into_iter()
        .filter(|(_, count)| *count >= rule.min_count)
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
        .take(rule.top_n)
        .map(|(value, _)| value.to_string())
        .collect()
}

/// Collapse a column to its frequent values plus `other_label`
///
/// Missing values are grouped with the rare ones. The result holds at most
/// `top_n + 1` distinct values. Also returns how many values were kept.
pub fn collapse_rare(
    values: &StringArray,
    rule: &RareCategoryRule,
    other_label: &str,
) -> Result<(ArrayRef, usize)> {
    let mut labels = frequent_values(values, rule);
    let kept = labels.len();
    let other = match labels.iter().position(|l| l == other_label) {
        Some(existing) => existing,
        None => {
            labels.push(other_label.to_string());
            labels.len() - 1
        }
    };

    let index: FxHashMap<&str, usize> = labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();
    let keys = values
        .iter()
        .map(|v| {
            let key = v
                .and_then(|v| index.get(v.trim()).copied())
                .unwrap_or(other);
            Some(key)
        })
        .collect();

    Ok((labeled_dictionary(&labels, keys)?, kept))
}

fn canonical_columns(
    batch: &RecordBatch,
    config: &CategoricalConfig,
) -> Result<Vec<(String, ArrayRef)>> {
    let mut columns = Vec::new();
    for name in &config.text_columns {
        let Some(array) = batch.column_by_name(name) else {
            log_warning(STAGE, &format!("text column '{name}' not present, skipping"));
            continue;
        };
        let text = string_column(array, name)?;
        let canonical: StringArray = text
            .iter()
            .map(|v| v.and_then(canonicalize))
            .collect();
        columns.push((name.clone(), Arc::new(dictionary_encode(&canonical)) as ArrayRef));
    }
    Ok(columns)
}

/// Canonicalize text columns, then apply every rare-category rule
pub fn normalize(batch: &RecordBatch, config: &PreprocessConfig) -> Result<RecordBatch> {
    let start = Instant::now();
    log_stage_start(STAGE, batch.num_rows());
    let categorical = &config.categorical;

    let canonical = set_columns(batch, canonical_columns(batch, categorical)?)?;

    let grouped = categorical
        .rare_rules
        .par_iter()
        .filter_map(|rule| match canonical.column_by_name(&rule.column) {
            Some(array) => Some((rule, array.clone())),
            None => {
                log_warning(
                    STAGE,
                    &format!("rare category column '{}' not present, skipping", rule.column),
                );
                None
            }
        })
        .map(|(rule, array)| -> Result<(String, ArrayRef)> {
            let values = string_column(&array, &rule.column)?;
            let (collapsed, kept) = collapse_rare(&values, rule, &categorical.other_label)?;
            log::debug!(
                "{STAGE}: '{}' -> '{}' keeps {kept} of its values",
                rule.column,
                rule.output_column
            );
            Ok((rule.output_column.clone(), collapsed))
        })
        .collect::<Result<Vec<_>>>()?;

    let normalized = set_columns(&canonical, grouped)?;
    log_stage_complete(
        STAGE,
        batch.num_rows(),
        normalized.num_rows(),
        Some(start.elapsed()),
    );
    Ok(normalized)
}
