use crate::utils::{RawAppointment, raw_batch, without};
use noshow_prep::{PreprocessConfig, PreprocessError, validate};

/// A complete batch passes and reports its shape
#[test]
fn test_validate_accepts_complete_batch() -> noshow_prep::Result<()> {
    let batch = raw_batch(&[
        RawAppointment::new("1", "2024-02-01", "Invoiced"),
        RawAppointment::new("2", "2024-02-02", "Booked"),
    ]);

    let report = validate(&batch, &PreprocessConfig::default())?;
    assert_eq!(report.rows, 2);
    assert_eq!(report.columns, batch.num_columns());
    Ok(())
}

/// Every missing required column is named in one error
#[test]
fn test_validate_lists_all_missing_columns() {
    let batch = raw_batch(&[RawAppointment::new("1", "2024-02-01", "Invoiced")]);
    let batch = without(&batch, &["DOB", "Department"]);

    match validate(&batch, &PreprocessConfig::default()) {
        Err(PreprocessError::Schema { columns, .. }) => {
            assert_eq!(columns, vec!["DOB".to_string(), "Department".to_string()]);
        }
        other => panic!("expected a schema error, got {other:?}"),
    }
}

/// Optional columns may be absent
#[test]
fn test_validate_ignores_optional_columns() -> noshow_prep::Result<()> {
    let batch = raw_batch(&[RawAppointment::new("1", "2024-02-01", "Invoiced")]);
    let batch = without(&batch, &["Nationality", "Booked_Date_Time", "Previous_Bill_Date"]);

    validate(&batch, &PreprocessConfig::default())?;
    Ok(())
}

/// A batch with the right columns but no rows is rejected
#[test]
fn test_validate_rejects_empty_input() {
    let batch = raw_batch(&[]);
    let result = validate(&batch, &PreprocessConfig::default());
    assert!(matches!(result, Err(PreprocessError::EmptyInput)));
}

/// Missing columns are reported before emptiness
#[test]
fn test_validate_schema_checked_first() {
    let batch = without(&raw_batch(&[]), &["Status"]);
    let result = validate(&batch, &PreprocessConfig::default());
    assert!(matches!(result, Err(PreprocessError::Schema { .. })));
}
