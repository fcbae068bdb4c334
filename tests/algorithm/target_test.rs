use arrow::datatypes::DataType;
use noshow_prep::{PreprocessConfig, PreprocessError, label};

use crate::utils::{RawAppointment, int_values, raw_batch, text_values};

/// Every mapped status yields a 0/1 label
#[test]
fn test_label_maps_statuses() -> noshow_prep::Result<()> {
    let batch = raw_batch(&[
        RawAppointment::new("1", "2024-01-01", "Invoiced"),
        RawAppointment::new("2", "2024-01-01", "Booked"),
        RawAppointment::new("3", "2024-01-01", "Not Answered"),
        RawAppointment::new("4", "2024-01-01", "Cancelled"),
    ]);

    let labeled = label(&batch, &PreprocessConfig::default())?;
    assert_eq!(
        int_values(&labeled, "Target"),
        vec![Some(0), Some(1), Some(1), Some(1)]
    );
    assert_eq!(labeled.schema().field_with_name("Target")?.data_type(), &DataType::Int8);
    Ok(())
}

/// An unmapped status names the column, value and row
#[test]
fn test_label_rejects_unknown_status() {
    let batch = raw_batch(&[
        RawAppointment::new("1", "2024-01-01", "Invoiced"),
        RawAppointment::new("2", "2024-01-01", "Lost"),
    ]);

    match label(&batch, &PreprocessConfig::default()) {
        Err(PreprocessError::UnknownStatus { column, value, row }) => {
            assert_eq!(column, "Status");
            assert_eq!(value, "Lost");
            assert_eq!(row, 1);
        }
        other => panic!("expected an unknown status error, got {other:?}"),
    }
}

/// A missing status is unknown too
#[test]
fn test_label_rejects_null_status() {
    let mut missing = RawAppointment::new("1", "2024-01-01", "Invoiced");
    missing.status = None;
    let batch = raw_batch(&[missing]);

    let result = label(&batch, &PreprocessConfig::default());
    assert!(matches!(result, Err(PreprocessError::UnknownStatus { row: 0, .. })));
}

/// Excluded statuses are dropped before labeling
#[test]
fn test_label_drops_excluded_statuses() -> noshow_prep::Result<()> {
    let batch = raw_batch(&[
        RawAppointment::new("1", "2024-01-01", "Invoiced"),
        RawAppointment::new("2", "2024-01-01", "Rescheduled"),
        RawAppointment::new("3", "2024-01-01", "Booked"),
    ]);
    let config = PreprocessConfig::default().with_excluded_statuses(&["Rescheduled"]);

    let labeled = label(&batch, &config)?;
    assert_eq!(labeled.num_rows(), 2);
    assert_eq!(
        text_values(&labeled, "CustomeNumber"),
        vec![Some("1".to_string()), Some("3".to_string())]
    );
    assert_eq!(int_values(&labeled, "Target"), vec![Some(0), Some(1)]);
    Ok(())
}

/// The label column name comes from configuration
#[test]
fn test_label_column_is_configurable() -> noshow_prep::Result<()> {
    let batch = raw_batch(&[RawAppointment::new("1", "2024-01-01", "Confirmed")]);
    let mut config = PreprocessConfig::default();
    config.target.label_column = "no_show".to_string();

    let labeled = label(&batch, &config)?;
    assert_eq!(int_values(&labeled, "no_show"), vec![Some(1)]);
    assert!(labeled.column_by_name("Target").is_none());
    Ok(())
}
