//! Derived feature computation
//!
//! Four record-level derivers (age, appointment calendar, billing recency,
//! booking lead time) each turn a handful of parsed fields into new columns.
//! They share one [`FeatureInputs`] so the date columns are read once. The
//! patient-history deriver runs afterwards because it needs a grouping pass
//! over the whole dataset.
//!
//! Every bucketed feature is an enum with explicit sentinel variants and a
//! finite label set drawn from configuration (see [`Bucket`]).

pub mod age;
pub mod appointment;
pub mod billing;
pub mod booking;
pub mod patient;

use std::time::Instant;

use arrow::array::{ArrayRef, Date32Array, TimestampSecondArray};
use arrow::record_batch::RecordBatch;

use crate::config::PreprocessConfig;
use crate::error::Result;
use crate::utils::arrow::{
    get_column_by_name, get_optional_column, labeled_dictionary, set_columns, to_date32,
    to_timestamp_seconds,
};
use crate::utils::logging::{log_stage_complete, log_stage_start, log_warning};

pub use age::AgeBand;
pub use appointment::Season;
pub use billing::RecencyBucket;
pub use booking::LeadTimeBucket;

const STAGE: &str = "Feature derivation";

/// A categorical feature value with a finite, configuration-defined label set
pub trait Bucket {
    /// Configuration holding the labels
    type Config;

    /// Every label the feature can take, in dictionary order
    fn label_set(config: &Self::Config) -> Vec<String>;

    /// Position of this value in [`Bucket::label_set`]
    fn key(&self, config: &Self::Config) -> usize;

    /// Label of this value
    fn label(&self, config: &Self::Config) -> String {
        Self::label_set(config)[self.key(config)].clone()
    }
}

/// Encode bucket values as a dictionary column declaring the full label set
pub fn bucket_column<B: Bucket>(values: &[B], config: &B::Config) -> Result<ArrayRef> {
    let labels = B::label_set(config);
    let keys = values.iter().map(|v| Some(v.key(config))).collect();
    labeled_dictionary(&labels, keys)
}

/// Parsed temporal inputs shared by the record-level derivers
#[derive(Debug, Clone)]
pub struct FeatureInputs {
    /// Appointment dates
    pub appointment: Date32Array,
    /// Birth dates, when the column exists
    pub birth: Option<Date32Array>,
    /// Previous bill dates, when the column exists
    pub previous_bill: Option<Date32Array>,
    /// Booking timestamps, when the column exists
    pub booked_at: Option<TimestampSecondArray>,
}

impl FeatureInputs {
    /// Read the temporal columns, reusing arrays already parsed by the cleaner
    pub fn from_batch(batch: &RecordBatch, config: &PreprocessConfig) -> Result<Self> {
        let columns = &config.columns;
        let formats = &config.cleaning.date_formats;

        let appointment = to_date32(
            &get_column_by_name(batch, &columns.appointment_date)?,
            &columns.appointment_date,
            formats,
        )?;

        let optional_date = |name: &str| -> Result<Option<Date32Array>> {
            match get_optional_column(batch, name) {
                Some(array) => Ok(Some(to_date32(&array, name, formats)?)),
                None => {
                    log_warning(STAGE, &format!("column '{name}' absent, features use sentinels"));
                    Ok(None)
                }
            }
        };

        let birth = optional_date(&columns.birth_date)?;
        let previous_bill = optional_date(&columns.previous_bill_date)?;
        let booked_at = match get_optional_column(batch, &columns.booked_at) {
            Some(array) => Some(to_timestamp_seconds(&array, &columns.booked_at, formats)?),
            None => {
                log_warning(
                    STAGE,
                    &format!("column '{}' absent, features use sentinels", columns.booked_at),
                );
                None
            }
        };

        Ok(Self {
            appointment,
            birth,
            previous_bill,
            booked_at,
        })
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.appointment.len()
    }

    /// Whether there are no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.appointment.is_empty()
    }
}

/// Run every deriver and append their columns
pub fn derive_features(batch: &RecordBatch, config: &PreprocessConfig) -> Result<RecordBatch> {
    let start = Instant::now();
    log_stage_start(STAGE, batch.num_rows());

    let inputs = FeatureInputs::from_batch(batch, config)?;

    let mut columns = age::derive_columns(&inputs, &config.age)?;
    columns.extend(appointment::derive_columns(&inputs, &config.appointment)?);
    columns.extend(billing::derive_columns(&inputs, &config.recency)?);
    columns.extend(booking::derive_columns(&inputs, &config.lead_time)?);

    let enriched = set_columns(batch, columns)?;
    let enriched = patient::add_patient_features(&enriched, config)?;

    log_stage_complete(
        STAGE,
        batch.num_rows(),
        enriched.num_rows(),
        Some(start.elapsed()),
    );
    Ok(enriched)
}
