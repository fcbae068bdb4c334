//! Booking lead-time features

use std::sync::Arc;

use arrow::array::{ArrayRef, Int8Array, Int32Array, Int64Array};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use super::{Bucket, FeatureInputs, bucket_column};
use crate::config::{BinSpec, LeadTimeConfig, PreprocessConfig};
use crate::error::Result;
use crate::schema::derived;
use crate::utils::arrow::{date_at, datetime_at, set_columns};

/// Whole days between the booking date and the appointment date
///
/// The time of day of the booking is ignored.
#[must_use]
pub fn lead_time_days(booked_at: Option<NaiveDateTime>, appointment: Option<NaiveDate>) -> Option<i64> {
    Some((appointment? - booked_at?.date()).num_days())
}

/// Lead-time category of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadTimeBucket {
    /// Index into the configured positive lead-time bins
    Window(usize),
    /// Booked on the appointment day
    SameDay,
    /// Booked after the appointment date
    Invalid,
    /// No booking timestamp
    Unknown,
}

impl LeadTimeBucket {
    #[must_use]
    pub fn classify(days: Option<i64>, bins: &BinSpec) -> Self {
        match days {
            None => Self::Unknown,
            Some(0) => Self::SameDay,
            Some(d) if d < 0 => Self::Invalid,
            Some(d) => bins.locate(d).map_or(Self::Invalid, Self::Window),
        }
    }
}

impl Bucket for LeadTimeBucket {
    type Config = LeadTimeConfig;

    fn label_set(config: &LeadTimeConfig) -> Vec<String> {
        let mut labels = config.bins.labels.clone();
        labels.extend([
            config.same_day_label.clone(),
            config.invalid_label.clone(),
            config.unknown_label.clone(),
        ]);
        labels
    }

    fn key(&self, config: &LeadTimeConfig) -> usize {
        let n = config.bins.labels.len();
        match self {
            Self::Window(i) => *i,
            Self::SameDay => n,
            Self::Invalid => n + 1,
            Self::Unknown => n + 2,
        }
    }
}

/// Booking-related values of one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRecord {
    pub lead_time: Option<i64>,
    pub bucket: LeadTimeBucket,
    pub book_year: Option<i32>,
    pub book_month: Option<i32>,
    /// Monday = 0
    pub book_dayofweek: Option<i32>,
    pub book_hour: Option<i32>,
    /// Booked on or after the appointment day
    pub same_day: Option<bool>,
}

impl BookingRecord {
    #[must_use]
    pub fn derive(
        booked_at: Option<NaiveDateTime>,
        appointment: Option<NaiveDate>,
        config: &LeadTimeConfig,
    ) -> Self {
        let lead_time = lead_time_days(booked_at, appointment);
        Self {
            lead_time,
            bucket: LeadTimeBucket::classify(lead_time, &config.bins),
            book_year: booked_at.map(|t| t.year()),
            book_month: booked_at.map(|t| t.month() as i32),
            book_dayofweek: booked_at.map(|t| t.weekday().num_days_from_monday() as i32),
            book_hour: booked_at.map(|t| t.hour() as i32),
            same_day: lead_time.map(|d| d <= 0),
        }
    }
}

pub(super) fn derive_columns(
    inputs: &FeatureInputs,
    config: &LeadTimeConfig,
) -> Result<Vec<(String, ArrayRef)>> {
    let records: Vec<BookingRecord> = (0..inputs.len())
        .map(|i| {
            let booked = inputs.booked_at.as_ref().and_then(|b| datetime_at(b, i));
            BookingRecord::derive(booked, date_at(&inputs.appointment, i), config)
        })
        .collect();

    let int_column = |f: fn(&BookingRecord) -> Option<i32>| -> ArrayRef {
        Arc::new(records.iter().map(f).collect::<Int32Array>())
    };
    let lead: Int64Array = records.iter().map(|r| r.lead_time).collect();
    let same_day: Int8Array = records.iter().map(|r| r.same_day.map(i8::from)).collect();
    let buckets: Vec<LeadTimeBucket> = records.iter().map(|r| r.bucket).collect();

    Ok(vec![
        (derived::LEAD_TIME_DAYS.to_string(), Arc::new(lead) as ArrayRef),
        (derived::LEADTIME_BUCKET.to_string(), bucket_column(&buckets, config)?),
        (derived::BOOK_YEAR.to_string(), int_column(|r| r.book_year)),
        (derived::BOOK_MONTH.to_string(), int_column(|r| r.book_month)),
        (derived::BOOK_DAYOFWEEK.to_string(), int_column(|r| r.book_dayofweek)),
        (derived::BOOK_HOUR.to_string(), int_column(|r| r.book_hour)),
        (derived::SAME_DAY_BOOKING.to_string(), Arc::new(same_day)),
    ])
}

/// Append the booking features to a cleaned batch
pub fn add_booking_features(batch: &RecordBatch, config: &PreprocessConfig) -> Result<RecordBatch> {
    let inputs = FeatureInputs::from_batch(batch, config)?;
    set_columns(batch, derive_columns(&inputs, &config.lead_time)?)
}
