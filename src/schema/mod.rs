//! Column names and semantic types of the raw and engineered datasets.

pub mod date_utils;

pub use date_utils::{DateFormatConfig, parse_date_string, parse_timestamp_string};

use arrow::datatypes::DataType;

/// Semantic type of a column, independent of its physical Arrow layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Free text
    String,
    /// Calendar date
    Date,
    /// Date with time of day
    Timestamp,
    /// Whole number
    Integer,
    /// Floating point number
    Float,
    /// Finite value set (dictionary encoded)
    Categorical,
}

impl ColumnKind {
    /// Classify an Arrow data type
    #[must_use]
    pub fn of(data_type: &DataType) -> Self {
        match data_type {
            DataType::Date32 | DataType::Date64 => Self::Date,
            DataType::Timestamp(_, _) => Self::Timestamp,
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => Self::Integer,
            DataType::Float16 | DataType::Float32 | DataType::Float64 => Self::Float,
            DataType::Dictionary(_, _) => Self::Categorical,
            _ => Self::String,
        }
    }
}

/// Raw appointment export column names
pub mod raw {
    pub const BRANCH_CODE: &str = "BranchCode";
    pub const CUSTOMER_NUMBER: &str = "CustomeNumber";
    pub const DOB: &str = "DOB";
    pub const LOCATION: &str = "Location";
    pub const APPOINTMENT_DATE: &str = "AppointmentDate";
    pub const STATUS: &str = "Status";
    pub const DOCTOR_NAME: &str = "DoctorName";
    pub const DEPARTMENT: &str = "Department";
    pub const NATIONALITY: &str = "Nationality";
    pub const PREVIOUS_BILL_DATE: &str = "Previous_Bill_Date";
    pub const BOOKED_DATE_TIME: &str = "Booked_Date_Time";
    pub const LAST_APPOINTMENT_STATUS: &str = "LastAppointmentStatus";
    pub const PREVIOUS_PAYMENT_MODE: &str = "Previous_Payment_Mode";
    pub const PAYMENT_MODE: &str = "PaymentMode";
    pub const VISIT_TYPE: &str = "VisitType";
    pub const DOCTOR_NATIONALITY: &str = "doctor_Nationality";
    pub const DISTRICT: &str = "District";
    pub const JOB_LOCATION: &str = "Job_Location";
    pub const OCCUPATION: &str = "Occupation";
    pub const COMPANY: &str = "company";
}

/// Engineered column names
pub mod derived {
    // Age
    pub const AGE_AT_VISIT: &str = "age_at_visit";
    pub const AGE_BAND: &str = "age_band";
    pub const BIRTH_YEAR: &str = "birth_year";
    pub const BIRTH_MONTH: &str = "birth_month";
    pub const BIRTH_DAY: &str = "birth_day";
    pub const BIRTH_DAYOFWEEK: &str = "birth_dayofweek";

    // Appointment calendar
    pub const APPT_YEAR: &str = "appt_year";
    pub const APPT_MONTH: &str = "appt_month";
    pub const APPT_DAY: &str = "appt_day";
    pub const APPT_QUARTER: &str = "appt_quarter";
    pub const APPT_WEEKOFYEAR: &str = "appt_weekofyear";
    pub const APPT_DAYOFWEEK: &str = "appt_dayofweek";
    pub const APPT_WEEKOFMONTH: &str = "appt_weekofmonth";
    pub const IS_WEEKEND: &str = "is_weekend";
    pub const SEASON: &str = "season";

    // Billing
    pub const DAYS_SINCE_PREV_BILL: &str = "days_since_prev_bill";
    pub const RECENCY_BUCKET: &str = "recency_bucket";

    // Booking
    pub const BOOK_YEAR: &str = "book_year";
    pub const BOOK_MONTH: &str = "book_month";
    pub const BOOK_DAYOFWEEK: &str = "book_dayofweek";
    pub const BOOK_HOUR: &str = "book_hour";
    pub const LEAD_TIME_DAYS: &str = "lead_time_days";
    pub const LEADTIME_BUCKET: &str = "leadtime_bucket";
    pub const SAME_DAY_BOOKING: &str = "same_day_booking";

    // Patient history
    pub const PATIENT_VISIT_COUNT: &str = "patient_visit_count";
}

/// Default name of the label column
pub const TARGET: &str = "Target";
