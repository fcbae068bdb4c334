use noshow_prep::algorithm::features::age::add_age_features;
use noshow_prep::algorithm::features::appointment::add_appointment_features;
use noshow_prep::algorithm::features::billing::add_billing_features;
use noshow_prep::algorithm::features::booking::add_booking_features;
use noshow_prep::algorithm::features::patient::add_patient_features;
use noshow_prep::schema::derived;
use noshow_prep::utils::arrow::column_names;
use noshow_prep::{
    AgeBand, Bucket, LeadTimeBucket, PreprocessConfig, RecencyBucket, RecordBatch, Season, clean,
    derive_features,
};

use crate::utils::{
    RawAppointment, declared_labels, fully_populated, int_values, raw_batch, text_values, without,
};

fn cleaned(rows: &[RawAppointment]) -> noshow_prep::Result<RecordBatch> {
    let (batch, _) = clean(&raw_batch(rows), &PreprocessConfig::default())?;
    Ok(batch)
}

fn labels(values: &[&str]) -> Vec<Option<String>> {
    values.iter().map(|v| Some((*v).to_string())).collect()
}

/// A birthday one day away does not count yet
#[test]
fn test_age_one_day_before_anniversary() -> noshow_prep::Result<()> {
    let batch = cleaned(&[
        RawAppointment::new("1", "2024-06-15", "Invoiced").dob(Some("1990-06-16")),
        RawAppointment::new("2", "2024-06-15", "Invoiced").dob(Some("1990-06-15")),
        RawAppointment::new("3", "2024-06-15", "Invoiced").dob(Some("2030-01-01")),
        RawAppointment::new("4", "2024-06-15", "Invoiced").dob(None),
    ])?;
    let features = derive_features(&batch, &PreprocessConfig::default())?;

    assert_eq!(
        int_values(&features, derived::AGE_AT_VISIT),
        vec![Some(33), Some(34), None, None]
    );
    assert_eq!(
        text_values(&features, derived::AGE_BAND),
        labels(&["30-44y", "30-44y", "unknown", "unknown"])
    );
    assert_eq!(
        int_values(&features, derived::BIRTH_YEAR),
        vec![Some(1990), Some(1990), Some(2030), None]
    );
    Ok(())
}

/// Same-day, late and ordinary bookings land in their own buckets
#[test]
fn test_lead_time_buckets() -> noshow_prep::Result<()> {
    let batch = cleaned(&[
        RawAppointment::new("1", "2024-03-10", "Booked").booked_at(Some("2024-03-10 08:00:00")),
        RawAppointment::new("2", "2024-03-10", "Booked").booked_at(Some("2024-03-13 10:00:00")),
        RawAppointment::new("3", "2024-03-10", "Booked").booked_at(Some("2024-03-05 23:00:00")),
        RawAppointment::new("4", "2024-03-10", "Booked").booked_at(None),
    ])?;
    let features = derive_features(&batch, &PreprocessConfig::default())?;

    assert_eq!(
        int_values(&features, derived::LEAD_TIME_DAYS),
        vec![Some(0), Some(-3), Some(5), None]
    );
    assert_eq!(
        text_values(&features, derived::LEADTIME_BUCKET),
        labels(&["same_day", "invalid", "1-7d", "unknown"])
    );
    assert_eq!(
        int_values(&features, derived::SAME_DAY_BOOKING),
        vec![Some(1), Some(1), Some(0), None]
    );
    assert_eq!(
        int_values(&features, derived::BOOK_HOUR),
        vec![Some(8), Some(10), Some(23), None]
    );
    Ok(())
}

/// Recency uses the configured windows; missing or future bills are the sentinel
#[test]
fn test_recency_buckets() -> noshow_prep::Result<()> {
    let batch = cleaned(&[
        RawAppointment::new("1", "2024-03-10", "Invoiced").previous_bill(Some("2024-02-29")),
        RawAppointment::new("2", "2024-03-10", "Invoiced").previous_bill(Some("2023-01-01")),
        RawAppointment::new("3", "2024-03-10", "Invoiced").previous_bill(Some("2024-04-01")),
        RawAppointment::new("4", "2024-03-10", "Invoiced").previous_bill(None),
    ])?;
    let features = derive_features(&batch, &PreprocessConfig::default())?;

    assert_eq!(
        int_values(&features, derived::DAYS_SINCE_PREV_BILL),
        vec![Some(10), Some(434), Some(-22), None]
    );
    assert_eq!(
        text_values(&features, derived::RECENCY_BUCKET),
        labels(&["≤30d", ">365d", "no_prior_bill", "no_prior_bill"])
    );
    Ok(())
}

/// Calendar breakdown of a Friday in March
#[test]
fn test_appointment_calendar() -> noshow_prep::Result<()> {
    let batch = cleaned(&[
        RawAppointment::new("1", "2024-03-15", "Invoiced"),
        RawAppointment::new("2", "2024-07-01", "Invoiced"),
    ])?;
    let features = derive_features(&batch, &PreprocessConfig::default())?;

    assert_eq!(int_values(&features, derived::APPT_YEAR), vec![Some(2024), Some(2024)]);
    assert_eq!(int_values(&features, derived::APPT_QUARTER), vec![Some(1), Some(3)]);
    assert_eq!(int_values(&features, derived::APPT_DAYOFWEEK), vec![Some(4), Some(0)]);
    assert_eq!(int_values(&features, derived::APPT_WEEKOFMONTH), vec![Some(3), Some(1)]);
    assert_eq!(int_values(&features, derived::APPT_WEEKOFYEAR), vec![Some(11), Some(27)]);
    assert_eq!(int_values(&features, derived::IS_WEEKEND), vec![Some(1), Some(0)]);
    assert_eq!(text_values(&features, derived::SEASON), labels(&["warm", "hot"]));
    Ok(())
}

/// Every bucket column declares exactly its label set and has no gaps
#[test]
fn test_bucket_values_belong_to_label_sets() -> noshow_prep::Result<()> {
    let config = PreprocessConfig::default();
    let batch = cleaned(&[
        RawAppointment::new("1", "2024-01-05", "Invoiced"),
        RawAppointment::new("2", "2024-06-20", "Booked")
            .dob(Some("bad"))
            .previous_bill(None)
            .booked_at(None),
        RawAppointment::new("3", "2024-11-30", "Cancelled")
            .dob(Some("1900-01-01"))
            .booked_at(Some("2025-01-01 12:00:00")),
    ])?;
    let features = derive_features(&batch, &config)?;

    let expected = [
        (derived::AGE_BAND, AgeBand::label_set(&config.age)),
        (derived::RECENCY_BUCKET, RecencyBucket::label_set(&config.recency)),
        (derived::LEADTIME_BUCKET, LeadTimeBucket::label_set(&config.lead_time)),
        (derived::SEASON, Season::label_set(&())),
    ];
    for (column, label_set) in expected {
        assert_eq!(declared_labels(&features, column), label_set, "{column}");
        assert!(fully_populated(&features, column), "{column}");
        for value in text_values(&features, column).into_iter().flatten() {
            assert!(label_set.contains(&value), "{column}: {value}");
        }
    }
    Ok(())
}

/// Absent optional sources give sentinels and nulls rather than errors
#[test]
fn test_missing_optional_sources() -> noshow_prep::Result<()> {
    let batch = cleaned(&[RawAppointment::new("1", "2024-03-10", "Invoiced")])?;
    let batch = without(&batch, &["Booked_Date_Time", "Previous_Bill_Date"]);
    let features = derive_features(&batch, &PreprocessConfig::default())?;

    assert_eq!(text_values(&features, derived::LEADTIME_BUCKET), labels(&["unknown"]));
    assert_eq!(text_values(&features, derived::RECENCY_BUCKET), labels(&["no_prior_bill"]));
    assert_eq!(int_values(&features, derived::BOOK_YEAR), vec![None]);
    assert_eq!(int_values(&features, derived::DAYS_SINCE_PREV_BILL), vec![None]);
    Ok(())
}

/// Visits are counted per patient over the whole dataset
#[test]
fn test_patient_visit_count() -> noshow_prep::Result<()> {
    let batch = cleaned(&[
        RawAppointment::new("5", "2024-03-10", "Invoiced"),
        RawAppointment::new("9", "2024-03-11", "Invoiced"),
        RawAppointment::new("5.0", "2024-04-02", "Booked"),
    ])?;
    let features = derive_features(&batch, &PreprocessConfig::default())?;

    assert_eq!(
        int_values(&features, derived::PATIENT_VISIT_COUNT),
        vec![Some(2), Some(1), Some(2)]
    );
    assert_eq!(features.num_rows(), batch.num_rows());
    Ok(())
}

/// Each deriver can run on its own and appends only its columns
#[test]
fn test_derivers_run_independently() -> noshow_prep::Result<()> {
    let config = PreprocessConfig::default();
    let batch = cleaned(&[RawAppointment::new("1", "2024-03-10", "Invoiced")])?;
    let before = batch.num_columns();

    let added = |enriched: &RecordBatch| column_names(enriched)[before..].to_vec();

    let age = add_age_features(&batch, &config)?;
    assert_eq!(
        added(&age),
        [
            derived::AGE_AT_VISIT,
            derived::AGE_BAND,
            derived::BIRTH_YEAR,
            derived::BIRTH_MONTH,
            derived::BIRTH_DAY,
            derived::BIRTH_DAYOFWEEK,
        ]
    );
    assert_eq!(add_appointment_features(&batch, &config)?.num_columns(), before + 9);
    assert_eq!(
        added(&add_billing_features(&batch, &config)?),
        [derived::DAYS_SINCE_PREV_BILL, derived::RECENCY_BUCKET]
    );
    assert_eq!(add_booking_features(&batch, &config)?.num_columns(), before + 7);
    assert_eq!(
        added(&add_patient_features(&batch, &config)?),
        [derived::PATIENT_VISIT_COUNT]
    );

    // Running a deriver twice replaces its columns rather than duplicating them
    assert_eq!(add_age_features(&age, &config)?.num_columns(), age.num_columns());
    Ok(())
}
