//! Billing recency features

use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;

use super::{Bucket, FeatureInputs, bucket_column};
use crate::config::{BinSpec, PreprocessConfig, RecencyConfig};
use crate::error::Result;
use crate::schema::derived;
use crate::utils::arrow::{date_at, set_columns};

/// Days from the previous bill to the appointment
///
/// Negative when the recorded bill is later than the appointment.
#[must_use]
pub fn days_since(previous_bill: Option<NaiveDate>, appointment: Option<NaiveDate>) -> Option<i64> {
    Some((appointment? - previous_bill?).num_days())
}

/// Recency of the previous bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecencyBucket {
    /// Index into the configured recency bins
    Window(usize),
    /// No previous bill, or one dated after the appointment
    NoPriorBill,
}

impl RecencyBucket {
    #[must_use]
    pub fn classify(days: Option<i64>, bins: &BinSpec) -> Self {
        match days {
            Some(d) if d >= 0 => bins.locate(d).map_or(Self::NoPriorBill, Self::Window),
            _ => Self::NoPriorBill,
        }
    }
}

impl Bucket for RecencyBucket {
    type Config = RecencyConfig;

    fn label_set(config: &RecencyConfig) -> Vec<String> {
        let mut labels = config.bins.labels.clone();
        labels.push(config.no_prior_label.clone());
        labels
    }

    fn key(&self, config: &RecencyConfig) -> usize {
        match self {
            Self::Window(i) => *i,
            Self::NoPriorBill => config.bins.labels.len(),
        }
    }
}

pub(super) fn derive_columns(
    inputs: &FeatureInputs,
    config: &RecencyConfig,
) -> Result<Vec<(String, ArrayRef)>> {
    let days: Vec<Option<i64>> = (0..inputs.len())
        .map(|i| {
            let previous = inputs.previous_bill.as_ref().and_then(|p| date_at(p, i));
            days_since(previous, date_at(&inputs.appointment, i))
        })
        .collect();
    let buckets: Vec<RecencyBucket> = days
        .iter()
        .map(|d| RecencyBucket::classify(*d, &config.bins))
        .collect();

    Ok(vec![
        (
            derived::DAYS_SINCE_PREV_BILL.to_string(),
            Arc::new(Int64Array::from(days)) as ArrayRef,
        ),
        (
            derived::RECENCY_BUCKET.to_string(),
            bucket_column(&buckets, config)?,
        ),
    ])
}

/// Append the billing recency features to a cleaned batch
pub fn add_billing_features(batch: &RecordBatch, config: &PreprocessConfig) -> Result<RecordBatch> {
    let inputs = FeatureInputs::from_batch(batch, config)?;
    set_columns(batch, derive_columns(&inputs, &config.recency)?)
}
