use std::fs;

use arrow::datatypes::DataType;
use noshow_prep::utils::io::{is_parquet_path, read_parquet};
use noshow_prep::{
    PreprocessConfig, PreprocessError, preprocess, read_csv, read_dataset, write_csv,
    write_dataset, write_parquet,
};
use tempfile::TempDir;

use crate::utils::{RawAppointment, raw_batch, text_values};

fn rows() -> Vec<RawAppointment> {
    vec![
        RawAppointment::new("1", "2024-02-01", "Invoiced"),
        RawAppointment::new("2", "2024-02-02", "Booked")
            .previous_bill(None)
            .location(Some("Jeddah, Old Town")),
    ]
}

/// Raw CSV files are read as text, empty cells as null
#[test]
fn test_csv_round_trip_keeps_text() -> noshow_prep::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("appointments.csv");
    let batch = raw_batch(&rows());

    write_csv(&path, &batch)?;
    let read = read_csv(&path)?;

    assert_eq!(read.num_rows(), 2);
    assert_eq!(read.schema().fields().len(), batch.schema().fields().len());
    assert!(read.schema().fields().iter().all(|f| f.data_type() == &DataType::Utf8));
    assert_eq!(
        text_values(&read, "Location"),
        vec![Some("Riyadh".to_string()), Some("Jeddah, Old Town".to_string())]
    );
    assert_eq!(text_values(&read, "Previous_Bill_Date")[1], None);
    Ok(())
}

/// Numeric-looking CSV columns stay text so the cleaner decides what they are
#[test]
fn test_read_csv_does_not_infer_types() -> noshow_prep::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("numbers.csv");
    fs::write(&path, "CustomeNumber,AppointmentDate\n17,2024-01-01\n18.0,2024-01-02\n")?;

    let read = read_csv(&path)?;
    assert_eq!(
        text_values(&read, "CustomeNumber"),
        vec![Some("17".to_string()), Some("18.0".to_string())]
    );
    Ok(())
}

/// The final dataset persists as CSV (decoded text) and as Parquet (typed)
#[test]
fn test_write_final_dataset() -> noshow_prep::Result<()> {
    let dir = TempDir::new()?;
    let output = preprocess(&raw_batch(&rows()), &PreprocessConfig::default())?;
    let batch = &output.dataset.batch;

    let csv_path = dir.path().join("processed.csv");
    write_dataset(&csv_path, batch)?;
    let from_csv = read_dataset(&csv_path)?;
    assert_eq!(from_csv.num_rows(), batch.num_rows());
    assert_eq!(
        text_values(&from_csv, "Location_grouped"),
        text_values(batch, "Location_grouped")
    );

    let parquet_path = dir.path().join("processed.parquet");
    assert!(is_parquet_path(&parquet_path));
    write_parquet(&parquet_path, batch)?;
    let from_parquet = read_parquet(&parquet_path)?;
    assert_eq!(from_parquet.num_rows(), batch.num_rows());
    assert_eq!(
        from_parquet.schema().field_with_name("Target")?.data_type(),
        &DataType::Int8
    );
    Ok(())
}

/// A missing input file is an IO error
#[test]
fn test_read_missing_file() {
    let result = read_csv(std::path::Path::new("/definitely/not/here.csv"));
    assert!(matches!(result, Err(PreprocessError::Io(_))));
}

/// JSON configuration files load with every key present
#[test]
fn test_config_from_json_file() -> noshow_prep::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("config.json");

    let config = PreprocessConfig::default().with_excluded_statuses(&["Rescheduled"]);
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| PreprocessError::config(e.to_string()))?;
    fs::write(&path, json)?;
    assert_eq!(PreprocessConfig::from_json_file(&path)?, config);

    fs::write(&path, r#"{"required_columns": ["Status"]}"#)?;
    let err = PreprocessConfig::from_json_file(&path).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("config.json"));
    Ok(())
}
