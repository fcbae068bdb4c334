//! Age at visit and birth-date calendar features

use std::sync::Arc;

use arrow::array::{ArrayRef, Int32Array};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};

use super::{Bucket, FeatureInputs, bucket_column};
use crate::config::{AgeConfig, BinSpec, PreprocessConfig};
use crate::error::Result;
use crate::schema::derived;
use crate::utils::arrow::{date_at, set_columns};

/// Completed years between `birth` and `visit`
///
/// A birthday not yet reached in the visit year does not count. Returns
/// `None` when the birth date lies after the visit.
#[must_use]
pub fn age_in_years(birth: NaiveDate, visit: NaiveDate) -> Option<i32> {
    if birth > visit {
        return None;
    }
    let mut age = visit.year() - birth.year();
    if (visit.month(), visit.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    Some(age)
}

/// Age cohort of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeBand {
    /// Index into the configured age bins
    Cohort(usize),
    /// Missing birth date, birth after the visit, or an age outside every bin
    Unknown,
}

impl AgeBand {
    /// Place an age into the configured cohorts
    #[must_use]
    pub fn classify(age: Option<i32>, bins: &BinSpec) -> Self {
        age.and_then(|a| bins.locate(i64::from(a)))
            .map_or(Self::Unknown, Self::Cohort)
    }
}

impl Bucket for AgeBand {
    type Config = AgeConfig;

    fn label_set(config: &AgeConfig) -> Vec<String> {
        let mut labels = config.bins.labels.clone();
        labels.push(config.unknown_label.clone());
        labels
    }

    fn key(&self, config: &AgeConfig) -> usize {
        match self {
            Self::Cohort(i) => *i,
            Self::Unknown => config.bins.labels.len(),
        }
    }
}

/// Age-related values of one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRecord {
    pub age: Option<i32>,
    pub band: AgeBand,
    pub birth_year: Option<i32>,
    pub birth_month: Option<i32>,
    pub birth_day: Option<i32>,
    /// Monday = 0
    pub birth_dayofweek: Option<i32>,
}

impl AgeRecord {
    /// Derive the age features of one record
    #[must_use]
    pub fn derive(birth: Option<NaiveDate>, visit: Option<NaiveDate>, config: &AgeConfig) -> Self {
        let age = match (birth, visit) {
            (Some(b), Some(v)) => age_in_years(b, v),
            _ => None,
        };
        let band = AgeBand::classify(age, &config.bins);
        // Ages that fall in no cohort are reported as missing alongside the sentinel band
        let age = if band == AgeBand::Unknown { None } else { age };

        Self {
            age,
            band,
            birth_year: birth.map(|d| d.year()),
            birth_month: birth.map(|d| d.month() as i32),
            birth_day: birth.map(|d| d.day() as i32),
            birth_dayofweek: birth.map(|d| d.weekday().num_days_from_monday() as i32),
        }
    }
}

pub(super) fn derive_columns(
    inputs: &FeatureInputs,
    config: &AgeConfig,
) -> Result<Vec<(String, ArrayRef)>> {
    let records: Vec<AgeRecord> = (0..inputs.len())
        .map(|i| {
            let birth = inputs.birth.as_ref().and_then(|b| date_at(b, i));
            AgeRecord::derive(birth, date_at(&inputs.appointment, i), config)
        })
        .collect();

    let int_column = |f: fn(&AgeRecord) -> Option<i32>| -> ArrayRef {
        Arc::new(records.iter().map(f).collect::<Int32Array>())
    };
    let bands: Vec<AgeBand> = records.iter().map(|r| r.band).collect();

    Ok(vec![
        (derived::AGE_AT_VISIT.to_string(), int_column(|r| r.age)),
        (derived::AGE_BAND.to_string(), bucket_column(&bands, config)?),
        (derived::BIRTH_YEAR.to_string(), int_column(|r| r.birth_year)),
        (derived::BIRTH_MONTH.to_string(), int_column(|r| r.birth_month)),
        (derived::BIRTH_DAY.to_string(), int_column(|r| r.birth_day)),
        (derived::BIRTH_DAYOFWEEK.to_string(), int_column(|r| r.birth_dayofweek)),
    ])
}

/// Append the age features to a cleaned batch
pub fn add_age_features(batch: &RecordBatch, config: &PreprocessConfig) -> Result<RecordBatch> {
    let inputs = FeatureInputs::from_batch(batch, config)?;
    set_columns(batch, derive_columns(&inputs, &config.age)?)
}
