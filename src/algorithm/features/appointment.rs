//! Appointment calendar features

use std::sync::Arc;

use arrow::array::{ArrayRef, Int8Array, Int32Array};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};

use super::{Bucket, FeatureInputs, bucket_column};
use crate::config::{AppointmentConfig, PreprocessConfig};
use crate::error::Result;
use crate::schema::derived;
use crate::utils::arrow::{date_at, set_columns};

const SEASON_LABELS: [&str; 4] = ["hot", "warm", "mild", "unknown"];

/// Climate season of the appointment month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    /// May to September
    Hot,
    /// March, April, October and November
    Warm,
    /// December to February
    Mild,
    Unknown,
}

impl Season {
    /// Season of a calendar month (1-12)
    #[must_use]
    pub fn from_month(month: u32) -> Self {
        match month {
            5..=9 => Self::Hot,
            3 | 4 | 10 | 11 => Self::Warm,
            12 | 1 | 2 => Self::Mild,
            _ => Self::Unknown,
        }
    }
}

impl Bucket for Season {
    type Config = ();

    fn label_set(_: &()) -> Vec<String> {
        SEASON_LABELS.iter().map(|s| (*s).to_string()).collect()
    }

    fn key(&self, _: &()) -> usize {
        match self {
            Self::Hot => 0,
            Self::Warm => 1,
            Self::Mild => 2,
            Self::Unknown => 3,
        }
    }
}

/// Calendar breakdown of one appointment date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarRecord {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub quarter: i32,
    /// ISO 8601 week number
    pub week_of_year: i32,
    /// Monday = 0
    pub day_of_week: i32,
    /// 1 for days 1-7, 2 for days 8-14, ...
    pub week_of_month: i32,
    pub is_weekend: bool,
    pub season: Season,
}

impl CalendarRecord {
    /// Break a date down into calendar features
    #[must_use]
    pub fn derive(date: NaiveDate, config: &AppointmentConfig) -> Self {
        let month = date.month();
        let day_of_week = date.weekday().num_days_from_monday();
        Self {
            year: date.year(),
            month: month as i32,
            day: date.day() as i32,
            quarter: ((month - 1) / 3 + 1) as i32,
            week_of_year: date.iso_week().week() as i32,
            day_of_week: day_of_week as i32,
            week_of_month: ((date.day() - 1) / 7 + 1) as i32,
            is_weekend: config.weekend_days.contains(&day_of_week),
            season: Season::from_month(month),
        }
    }
}

pub(super) fn derive_columns(
    inputs: &FeatureInputs,
    config: &AppointmentConfig,
) -> Result<Vec<(String, ArrayRef)>> {
    let records: Vec<Option<CalendarRecord>> = (0..inputs.len())
        .map(|i| date_at(&inputs.appointment, i).map(|d| CalendarRecord::derive(d, config)))
        .collect();

    let int_column = |f: fn(&CalendarRecord) -> i32| -> ArrayRef {
        Arc::new(
            records
                .iter()
                .map(|r| r.as_ref().map(f))
                .collect::<Int32Array>(),
        )
    };
    let weekend: Int8Array = records
        .iter()
        .map(|r| r.map(|r| i8::from(r.is_weekend)))
        .collect();
    let seasons: Vec<Season> = records
        .iter()
        .map(|r| r.map_or(Season::Unknown, |r| r.season))
        .collect();

    Ok(vec![
        (derived::APPT_YEAR.to_string(), int_column(|r| r.year)),
        (derived::APPT_MONTH.to_string(), int_column(|r| r.month)),
        (derived::APPT_DAY.to_string(), int_column(|r| r.day)),
        (derived::APPT_QUARTER.to_string(), int_column(|r| r.quarter)),
        (derived::APPT_WEEKOFYEAR.to_string(), int_column(|r| r.week_of_year)),
        (derived::APPT_DAYOFWEEK.to_string(), int_column(|r| r.day_of_week)),
        (derived::APPT_WEEKOFMONTH.to_string(), int_column(|r| r.week_of_month)),
        (derived::IS_WEEKEND.to_string(), Arc::new(weekend)),
        (derived::SEASON.to_string(), bucket_column(&seasons, &())?),
    ])
}

/// Append the appointment calendar features to a cleaned batch
pub fn add_appointment_features(
    batch: &RecordBatch,
    config: &PreprocessConfig,
) -> Result<RecordBatch> {
    let inputs = FeatureInputs::from_batch(batch, config)?;
    set_columns(batch, derive_columns(&inputs, &config.appointment)?)
}
