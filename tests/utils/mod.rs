use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, StringBuilder};
use arrow::datatypes::{DataType, Field, Int32Type, Int64Type, Int8Type, Schema};
use arrow::record_batch::RecordBatch;
use noshow_prep::schema::raw;
use noshow_prep::utils::arrow::{get_column_by_name, string_column};

/// Raw export columns written by [`raw_batch`], in order
pub const RAW_COLUMNS: [&str; 14] = [
    raw::BRANCH_CODE,
    raw::CUSTOMER_NUMBER,
    raw::DOB,
    raw::LOCATION,
    raw::APPOINTMENT_DATE,
    raw::STATUS,
    raw::DOCTOR_NAME,
    raw::DEPARTMENT,
    raw::NATIONALITY,
    raw::PREVIOUS_BILL_DATE,
    raw::BOOKED_DATE_TIME,
    raw::LAST_APPOINTMENT_STATUS,
    raw::PREVIOUS_PAYMENT_MODE,
    raw::PAYMENT_MODE,
];

/// One raw appointment record, as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAppointment {
    pub branch: Option<&'static str>,
    pub customer: Option<&'static str>,
    pub dob: Option<&'static str>,
    pub location: Option<&'static str>,
    pub appointment: Option<&'static str>,
    pub status: Option<&'static str>,
    pub doctor: Option<&'static str>,
    pub department: Option<&'static str>,
    pub nationality: Option<&'static str>,
    pub previous_bill: Option<&'static str>,
    pub booked_at: Option<&'static str>,
    pub last_status: Option<&'static str>,
    pub previous_payment: Option<&'static str>,
    pub payment: Option<&'static str>,
}

impl RawAppointment {
    /// A complete, valid record
    pub fn new(customer: &'static str, appointment: &'static str, status: &'static str) -> Self {
        Self {
            branch: Some("B01"),
            customer: Some(customer),
            dob: Some("1985-03-20"),
            location: Some("Riyadh"),
            appointment: Some(appointment),
            status: Some(status),
            doctor: Some("Dr. Amal"),
            department: Some("Cardiology"),
            nationality: Some("Saudi"),
            previous_bill: Some("2024-01-02"),
            booked_at: Some("2024-01-10 09:30:00"),
            last_status: Some("Invoiced"),
            previous_payment: Some("Cash"),
            payment: Some("Insurance"),
        }
    }

    pub fn dob(mut self, dob: Option<&'static str>) -> Self {
        self.dob = dob;
        self
    }

    pub fn location(mut self, location: Option<&'static str>) -> Self {
        self.location = location;
        self
    }

    pub fn nationality(mut self, nationality: Option<&'static str>) -> Self {
        self.nationality = nationality;
        self
    }

    pub fn previous_bill(mut self, previous_bill: Option<&'static str>) -> Self {
        self.previous_bill = previous_bill;
        self
    }

    pub fn booked_at(mut self, booked_at: Option<&'static str>) -> Self {
        self.booked_at = booked_at;
        self
    }

    pub fn last_status(mut self, last_status: Option<&'static str>) -> Self {
        self.last_status = last_status;
        self
    }

    fn values(&self) -> [Option<&'static str>; 14] {
        [
            self.branch,
            self.customer,
            self.dob,
            self.location,
            self.appointment,
            self.status,
            self.doctor,
            self.department,
            self.nationality,
            self.previous_bill,
            self.booked_at,
            self.last_status,
            self.previous_payment,
            self.payment,
        ]
    }
}

/// Build a raw all-`Utf8` batch, as read from an export
pub fn raw_batch(rows: &[RawAppointment]) -> RecordBatch {
    let mut builders: Vec<StringBuilder> = RAW_COLUMNS.iter().map(|_| StringBuilder::new()).collect();
    for row in rows {
        for (builder, value) in builders.iter_mut().zip(row.values()) {
            builder.append_option(value);
        }
    }

    let schema = Arc::new(Schema::new(
        RAW_COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = builders
        .into_iter()
        .map(|mut b| Arc::new(b.finish()) as ArrayRef)
        .collect();
    RecordBatch::try_new(schema, arrays).expect("valid raw batch")
}

/// Remove columns from a batch
pub fn without(batch: &RecordBatch, columns: &[&str]) -> RecordBatch {
    let keep: Vec<usize> = batch
        .schema()
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, f)| !columns.contains(&f.name().as_str()))
        .map(|(i, _)| i)
        .collect();
    batch.project(&keep).expect("valid projection")
}

/// Text values of a column, decoding dictionaries
pub fn text_values(batch: &RecordBatch, column: &str) -> Vec<Option<String>> {
    let array = get_column_by_name(batch, column).expect("column present");
    string_column(&array, column)
        .expect("text column")
        .iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

/// Integer values of an `Int8`, `Int32` or `Int64` column
pub fn int_values(batch: &RecordBatch, column: &str) -> Vec<Option<i64>> {
    let array = get_column_by_name(batch, column).expect("column present");
    match array.data_type() {
        DataType::Int8 => array
            .as_primitive::<Int8Type>()
            .iter()
            .map(|v| v.map(i64::from))
            .collect(),
        DataType::Int32 => array
            .as_primitive::<Int32Type>()
            .iter()
            .map(|v| v.map(i64::from))
            .collect(),
        DataType::Int64 => array.as_primitive::<Int64Type>().iter().collect(),
        other => panic!("column '{column}' is not an integer column: {other}"),
    }
}

/// Dictionary values declared by a categorical column
pub fn declared_labels(batch: &RecordBatch, column: &str) -> Vec<String> {
    let array = get_column_by_name(batch, column).expect("column present");
    let dict = array.as_dictionary::<Int32Type>();
    dict.values()
        .as_string::<i32>()
        .iter()
        .flatten()
        .map(str::to_string)
        .collect()
}

/// Whether a column holds no nulls
pub fn fully_populated(batch: &RecordBatch, column: &str) -> bool {
    batch
        .column_by_name(column)
        .is_some_and(|c| c.null_count() == 0)
}
