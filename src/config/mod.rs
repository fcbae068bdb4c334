//! Configuration for the preprocessing pipeline.
//!
//! A [`PreprocessConfig`] is built once, validated, and then only read. When
//! loaded from JSON every key must be present; nothing is silently defaulted.

pub mod bins;

pub use bins::{BinSpec, Closed};

use std::collections::BTreeMap;
use std::path::Path;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{PreprocessError, Result};
use crate::schema::{DateFormatConfig, TARGET, raw};

/// Names of the raw columns the pipeline interprets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnNames {
    /// Patient identifier, validated by the cleaner
    pub identifier: String,
    /// Date of birth
    pub birth_date: String,
    /// Appointment date, the primary date of every record
    pub appointment_date: String,
    /// Date of the patient's previous bill
    pub previous_bill_date: String,
    /// Timestamp at which the appointment was booked
    pub booked_at: String,
    /// Appointment status used for labeling
    pub status: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            identifier: raw::CUSTOMER_NUMBER.to_string(),
            birth_date: raw::DOB.to_string(),
            appointment_date: raw::APPOINTMENT_DATE.to_string(),
            previous_bill_date: raw::PREVIOUS_BILL_DATE.to_string(),
            booked_at: raw::BOOKED_DATE_TIME.to_string(),
            status: raw::STATUS.to_string(),
        }
    }
}

/// Cleaning rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleaningConfig {
    /// Columns parsed to calendar dates
    pub date_columns: Vec<String>,
    /// Columns parsed to second-resolution timestamps
    pub timestamp_columns: Vec<String>,
    /// Date columns that must parse for a row to survive
    pub mandatory_date_columns: Vec<String>,
    /// Columns defining a duplicate; `null` compares full rows
    pub duplicate_key: Option<Vec<String>>,
    /// Replacement values for nulls, per column
    pub fill_values: BTreeMap<String, String>,
    /// Accepted date and timestamp layouts
    pub date_formats: DateFormatConfig,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        let mut fill_values = BTreeMap::new();
        fill_values.insert(
            raw::LAST_APPOINTMENT_STATUS.to_string(),
            "No Prior Visit".to_string(),
        );
        fill_values.insert(
            raw::PREVIOUS_PAYMENT_MODE.to_string(),
            "FirstTime".to_string(),
        );

        Self {
            date_columns: vec![
                raw::DOB.to_string(),
                raw::APPOINTMENT_DATE.to_string(),
                raw::PREVIOUS_BILL_DATE.to_string(),
            ],
            timestamp_columns: vec![raw::BOOKED_DATE_TIME.to_string()],
            mandatory_date_columns: vec![raw::APPOINTMENT_DATE.to_string()],
            duplicate_key: None,
            fill_values,
            date_formats: DateFormatConfig::default(),
        }
    }
}

/// Age feature settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgeConfig {
    /// Age cohorts in whole years
    pub bins: BinSpec,
    /// Label for missing or out-of-range ages
    pub unknown_label: String,
}

impl Default for AgeConfig {
    fn default() -> Self {
        Self {
            bins: BinSpec::new(
                vec![0, 1, 5, 12, 18, 30, 45, 60, 75, 120],
                [
                    "<1y", "1-4y", "5-11y", "12-17y", "18-29y", "30-44y", "45-59y", "60-74y",
                    "75+",
                ],
                Closed::Left,
            ),
            unknown_label: "unknown".to_string(),
        }
    }
}

/// Appointment calendar settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppointmentConfig {
    /// Weekend days, counted from Monday = 0
    pub weekend_days: Vec<u32>,
}

impl Default for AppointmentConfig {
    fn default() -> Self {
        // Friday and Saturday
        Self {
            weekend_days: vec![4, 5],
        }
    }
}

/// Billing recency settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecencyConfig {
    /// Buckets over days since the previous bill
    pub bins: BinSpec,
    /// Label for a missing or future previous bill
    pub no_prior_label: String,
}

impl Default for RecencyConfig {
    fn default() -> Self {
        Self {
            bins: BinSpec::new(
                vec![0, 30, 90, 180, 365],
                ["≤30d", "31-90d", "91-180d", "181-365d", ">365d"],
                Closed::Right,
            ),
            no_prior_label: "no_prior_bill".to_string(),
        }
    }
}

/// Booking lead-time settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeadTimeConfig {
    /// Buckets over positive lead times in days
    pub bins: BinSpec,
    /// Label for bookings made on the appointment day
    pub same_day_label: String,
    /// Label for bookings recorded after the appointment
    pub invalid_label: String,
    /// Label for a missing booking timestamp
    pub unknown_label: String,
}

impl Default for LeadTimeConfig {
    fn default() -> Self {
        Self {
            bins: BinSpec::new(
                vec![1, 7, 30, 90],
                ["1-7d", "8-30d", "31-90d", ">90d"],
                Closed::Right,
            ),
            same_day_label: "same_day".to_string(),
            invalid_label: "invalid".to_string(),
            unknown_label: "unknown".to_string(),
        }
    }
}

/// Collapse rule for one high-cardinality column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RareCategoryRule {
    /// Source column
    pub column: String,
    /// Column receiving the grouped values
    pub output_column: String,
    /// Number of most frequent values kept
    pub top_n: usize,
    /// Minimum occurrences for a value to be kept
    pub min_count: usize,
}

impl RareCategoryRule {
    /// Keep the `top_n` most frequent values of `column` in `output_column`
    pub fn top(column: &str, output_column: &str, top_n: usize) -> Self {
        Self {
            column: column.to_string(),
            output_column: output_column.to_string(),
            top_n,
            min_count: 1,
        }
    }
}

/// Categorical normalization settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoricalConfig {
    /// Columns lowercased and trimmed in place
    pub text_columns: Vec<String>,
    /// Rare-category collapse rules, applied after text normalization
    pub rare_rules: Vec<RareCategoryRule>,
    /// Replacement for collapsed values
    pub other_label: String,
}

impl Default for CategoricalConfig {
    fn default() -> Self {
        Self {
            text_columns: vec![raw::LOCATION.to_string()],
            rare_rules: vec![
                RareCategoryRule::top(raw::NATIONALITY, "Nationality_grouped", 10),
                RareCategoryRule::top(raw::LOCATION, "Location_grouped", 15),
            ],
            other_label: "Other".to_string(),
        }
    }
}

/// Outcome a status maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The patient did not attend
    NoShow,
    /// The patient attended
    Attended,
}

impl Outcome {
    /// Binary label value
    #[must_use]
    pub fn label(self) -> i8 {
        match self {
            Self::NoShow => 1,
            Self::Attended => 0,
        }
    }
}

/// Target labeling settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Resolved statuses and the outcome each one represents
    pub status_mapping: BTreeMap<String, Outcome>,
    /// Statuses whose rows are dropped before labeling
    pub excluded_statuses: Vec<String>,
    /// Name of the label column
    pub label_column: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        let status_mapping = [
            ("Invoiced", Outcome::Attended),
            ("Visited", Outcome::NoShow),
            ("Confirmed", Outcome::NoShow),
            ("Cancelled", Outcome::NoShow),
            ("Canceled", Outcome::NoShow),
            ("Not Answered", Outcome::NoShow),
            ("Booked", Outcome::NoShow),
        ]
        .into_iter()
        .map(|(status, outcome)| (status.to_string(), outcome))
        .collect();

        Self {
            status_mapping,
            excluded_statuses: Vec::new(),
            label_column: TARGET.to_string(),
        }
    }
}

/// Configuration for the whole preprocessing pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreprocessConfig {
    /// Columns that must be present in the raw input
    pub required_columns: Vec<String>,
    /// Names of the interpreted raw columns
    pub columns: ColumnNames,
    /// Cleaning rules
    pub cleaning: CleaningConfig,
    /// Age features
    pub age: AgeConfig,
    /// Appointment calendar features
    pub appointment: AppointmentConfig,
    /// Billing recency features
    pub recency: RecencyConfig,
    /// Booking lead-time features
    pub lead_time: LeadTimeConfig,
    /// Categorical normalization
    pub categorical: CategoricalConfig,
    /// Target labeling
    pub target: TargetConfig,
    /// Columns removed by the finalizer
    pub drop_columns: Vec<String>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        let required_columns = [
            raw::BRANCH_CODE,
            raw::CUSTOMER_NUMBER,
            raw::DOB,
            raw::LOCATION,
            raw::APPOINTMENT_DATE,
            raw::STATUS,
            raw::DOCTOR_NAME,
            raw::DEPARTMENT,
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let drop_columns = [
            raw::PAYMENT_MODE,
            raw::VISIT_TYPE,
            raw::DOCTOR_NATIONALITY,
            raw::DISTRICT,
            raw::CUSTOMER_NUMBER,
            raw::JOB_LOCATION,
            raw::OCCUPATION,
            raw::COMPANY,
            raw::STATUS,
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self {
            required_columns,
            columns: ColumnNames::default(),
            cleaning: CleaningConfig::default(),
            age: AgeConfig::default(),
            appointment: AppointmentConfig::default(),
            recency: RecencyConfig::default(),
            lead_time: LeadTimeConfig::default(),
            categorical: CategoricalConfig::default(),
            target: TargetConfig::default(),
            drop_columns,
        }
    }
}

impl PreprocessConfig {
    /// Create a configuration with the standard appointment-export settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PreprocessError::config(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content).map_err(|e| match e {
            PreprocessError::Configuration(msg) => {
                PreprocessError::config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Set the duplicate key used by the cleaner
    #[must_use]
    pub fn with_duplicate_key(mut self, key: &[&str]) -> Self {
        self.cleaning.duplicate_key = Some(key.iter().map(|k| (*k).to_string()).collect());
        self
    }

    /// Set the statuses dropped before labeling
    #[must_use]
    pub fn with_excluded_statuses(mut self, statuses: &[&str]) -> Self {
        self.target.excluded_statuses = statuses.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Check every tunable for consistency
    pub fn validate(&self) -> Result<()> {
        if self.required_columns.is_empty() {
            return Err(PreprocessError::config("required_columns is empty"));
        }
        check_unique("required_columns", &self.required_columns)?;

        let required: FxHashSet<&str> = self.required_columns.iter().map(String::as_str).collect();
        for (role, column) in [
            ("identifier", &self.columns.identifier),
            ("appointment_date", &self.columns.appointment_date),
            ("status", &self.columns.status),
        ] {
            if !required.contains(column.as_str()) {
                return Err(PreprocessError::config(format!(
                    "{role} column '{column}' must be listed in required_columns"
                )));
            }
        }

        let dates: FxHashSet<&str> = self
            .cleaning
            .date_columns
            .iter()
            .map(String::as_str)
            .collect();
        if !dates.contains(self.columns.appointment_date.as_str()) {
            return Err(PreprocessError::config(format!(
                "appointment date column '{}' must be listed in cleaning.date_columns",
                self.columns.appointment_date
            )));
        }
        if !self
            .cleaning
            .mandatory_date_columns
            .contains(&self.columns.appointment_date)
        {
            return Err(PreprocessError::config(format!(
                "appointment date column '{}' must be mandatory",
                self.columns.appointment_date
            )));
        }
        if let Some(missing) = self
            .cleaning
            .mandatory_date_columns
            .iter()
            .find(|c| !dates.contains(c.as_str()))
        {
            return Err(PreprocessError::config(format!(
                "mandatory date column '{missing}' is not in cleaning.date_columns"
            )));
        }
        if let Some(overlap) = self
            .cleaning
            .timestamp_columns
            .iter()
            .find(|c| dates.contains(c.as_str()))
        {
            return Err(PreprocessError::config(format!(
                "column '{overlap}' is listed as both a date and a timestamp column"
            )));
        }
        if let Some(key) = &self.cleaning.duplicate_key {
            if key.is_empty() {
                return Err(PreprocessError::config("cleaning.duplicate_key is empty"));
            }
            check_unique("cleaning.duplicate_key", key)?;
        }
        if let Some(column) = self.cleaning.fill_values.keys().find(|c| {
            dates.contains(c.as_str())
                || self.cleaning.timestamp_columns.contains(c)
                || **c == self.columns.identifier
        }) {
            return Err(PreprocessError::config(format!(
                "cleaning.fill_values: '{column}' is parsed by the cleaner and cannot be filled"
            )));
        }
        if self.cleaning.date_formats.date_formats.is_empty() {
            return Err(PreprocessError::config("cleaning.date_formats has no date formats"));
        }

        self.age.bins.validate("age.bins")?;
        if self.age.bins.edges[0] < 0 {
            return Err(PreprocessError::config("age.bins must start at or above 0"));
        }
        check_sentinels("age", &self.age.bins, &[&self.age.unknown_label])?;

        if let Some(day) = self.appointment.weekend_days.iter().find(|d| **d > 6) {
            return Err(PreprocessError::config(format!(
                "appointment.weekend_days: {day} is not a weekday number (0-6)"
            )));
        }

        self.recency.bins.validate("recency.bins")?;
        if self.recency.bins.edges[0] != 0 || !self.recency.bins.is_open_ended() {
            return Err(PreprocessError::config(
                "recency.bins must start at 0 and end with an unbounded bin",
            ));
        }
        check_sentinels("recency", &self.recency.bins, &[&self.recency.no_prior_label])?;

        self.lead_time.bins.validate("lead_time.bins")?;
        if self.lead_time.bins.edges[0] != 1 || !self.lead_time.bins.is_open_ended() {
            return Err(PreprocessError::config(
                "lead_time.bins must start at 1 and end with an unbounded bin; same-day and negative lead times have dedicated labels",
            ));
        }
        check_sentinels(
            "lead_time",
            &self.lead_time.bins,
            &[
                &self.lead_time.same_day_label,
                &self.lead_time.invalid_label,
                &self.lead_time.unknown_label,
            ],
        )?;

        if self.categorical.other_label.is_empty() {
            return Err(PreprocessError::config("categorical.other_label is empty"));
        }
        for rule in &self.categorical.rare_rules {
            if rule.top_n == 0 {
                return Err(PreprocessError::config(format!(
                    "rare category rule for '{}' keeps no values (top_n = 0)",
                    rule.column
                )));
            }
            if rule.output_column.is_empty() {
                return Err(PreprocessError::config(format!(
                    "rare category rule for '{}' has an empty output column",
                    rule.column
                )));
            }
        }
        let outputs: Vec<String> = self
            .categorical
            .rare_rules
            .iter()
            .map(|r| r.output_column.clone())
            .collect();
        check_unique("categorical.rare_rules output columns", &outputs)?;

        if self.target.status_mapping.is_empty() {
            return Err(PreprocessError::config("target.status_mapping is empty"));
        }
        if let Some(both) = self
            .target
            .excluded_statuses
            .iter()
            .find(|s| self.target.status_mapping.contains_key(s.as_str()))
        {
            return Err(PreprocessError::config(format!(
                "status '{both}' is both mapped and excluded"
            )));
        }
        if self.target.label_column.is_empty() {
            return Err(PreprocessError::config("target.label_column is empty"));
        }
        if self.drop_columns.contains(&self.target.label_column) {
            return Err(PreprocessError::config(format!(
                "label column '{}' cannot be dropped",
                self.target.label_column
            )));
        }

        Ok(())
    }
}

fn check_unique(name: &str, values: &[String]) -> Result<()> {
    let mut seen = FxHashSet::default();
    match values.iter().find(|v| !seen.insert(v.as_str())) {
        Some(dup) => Err(PreprocessError::config(format!("{name}: '{dup}' listed twice"))),
        None => Ok(()),
    }
}

fn check_sentinels(name: &str, bins: &BinSpec, sentinels: &[&String]) -> Result<()> {
    let mut seen: FxHashSet<&str> = bins.labels.iter().map(String::as_str).collect();
    for sentinel in sentinels {
        if sentinel.is_empty() {
            return Err(PreprocessError::config(format!("{name}: empty sentinel label")));
        }
        if !seen.insert(sentinel.as_str()) {
            return Err(PreprocessError::config(format!(
                "{name}: sentinel label '{sentinel}' collides with another label"
            )));
        }
    }
    Ok(())
}
