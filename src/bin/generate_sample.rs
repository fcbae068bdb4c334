//! Writes a synthetic appointment export for demos and manual testing.
//!
//! The file follows the raw appointment schema and deliberately contains
//! malformed dates, invalid identifiers, blank categories and duplicate rows
//! so that every cleaning rule has something to do.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use arrow::array::{ArrayRef, StringArray};
use chrono::{Duration, NaiveDate};
use log::info;
use noshow_prep::RecordBatch;
use noshow_prep::schema::raw;
use noshow_prep::utils::io::write_csv;
use rand::prelude::*;

const USAGE: &str = "usage: generate-sample <output.csv> [rows] [seed]";
const DEFAULT_ROWS: usize = 1000;

const BRANCHES: &[&str] = &["B01", "B02", "B03", "B04"];
const DEPARTMENTS: &[&str] = &[
    "Cardiology",
    "Dermatology",
    "ENT",
    "Internal Medicine",
    "Pediatrics",
    "Orthopedics",
];
const NATIONALITIES: &[&str] = &[
    "Saudi", "Egyptian", "Indian", "Pakistani", "Filipino", "Yemeni", "Sudanese", "Syrian",
    "Jordanian", "Bangladeshi", "Lebanese", "Nepali", "Other",
];
const LOCATIONS: &[&str] = &[
    "Riyadh", "Jeddah", "Dammam", "Khobar", "Mecca", "Medina", "Tabuk", "Abha",
];
const STATUSES: &[(&str, u32)] = &[
    ("Invoiced", 70),
    ("Booked", 8),
    ("Cancelled", 8),
    ("Not Answered", 6),
    ("Confirmed", 5),
    ("Visited", 3),
];
const PAYMENT_MODES: &[&str] = &["Cash", "Insurance", "Credit"];
const VISIT_TYPES: &[&str] = &["New", "Follow-up", "Emergency"];

/// Random ASCII letters, for high-cardinality free text
fn random_word(rng: &mut StdRng, len: usize) -> String {
    (0..len)
        .map(|_| {
            let c = rng.random_range(0..52u8);
            if c < 26 { (b'a' + c) as char } else { (b'A' + c - 26) as char }
        })
        .collect()
}

fn pick<'a>(rng: &mut StdRng, values: &[&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}

fn weighted_status(rng: &mut StdRng) -> &'static str {
    let total: u32 = STATUSES.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random_range(0..total);
    for &(status, weight) in STATUSES {
        if roll < weight {
            return status;
        }
        roll -= weight;
    }
    STATUSES[0].0
}

fn random_date(rng: &mut StdRng, from: NaiveDate, span_days: i64) -> NaiveDate {
    from + Duration::days(rng.random_range(0..span_days))
}

/// One raw appointment row, in column order
fn appointment_row(rng: &mut StdRng, patients: i64) -> Vec<Option<String>> {
    let base = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default();
    let appointment = random_date(rng, base, 3 * 365);
    let birth = random_date(rng, NaiveDate::from_ymd_opt(1940, 1, 1).unwrap_or_default(), 83 * 365);

    let lead = rng.random_range(-2..120);
    let booked = (appointment - Duration::days(lead))
        .and_hms_opt(rng.random_range(7..20), rng.random_range(0..60), 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string());

    let previous_bill = rng
        .random_bool(0.7)
        .then(|| random_date(rng, appointment - Duration::days(500), 500).format("%Y-%m-%d").to_string());

    let location = if rng.random_bool(0.85) {
        let place = pick(rng, LOCATIONS);
        // Inconsistent casing and padding from manual entry
        match rng.random_range(0..3) {
            0 => place.to_uppercase(),
            1 => format!(" {place} "),
            _ => place.to_string(),
        }
    } else {
        random_word(rng, 10)
    };

    let no_prior = rng.random_bool(0.2);
    vec![
        Some(pick(rng, BRANCHES).to_string()),
        Some(rng.random_range(1..=patients).to_string()),
        Some(birth.format("%Y-%m-%d").to_string()),
        Some(location),
        Some(appointment.format("%Y-%m-%d").to_string()),
        Some(weighted_status(rng).to_string()),
        Some(format!("Dr. {} {}", random_word(rng, 6), random_word(rng, 8))),
        Some(pick(rng, DEPARTMENTS).to_string()),
        Some(pick(rng, NATIONALITIES).to_string()),
        previous_bill,
        booked,
        (!no_prior).then(|| pick(rng, &["Invoiced", "Cancelled", "Booked"]).to_string()),
        (!no_prior).then(|| pick(rng, PAYMENT_MODES).to_string()),
        Some(pick(rng, PAYMENT_MODES).to_string()),
        Some(pick(rng, VISIT_TYPES).to_string()),
        Some(pick(rng, NATIONALITIES).to_string()),
        Some(random_word(rng, 7)),
    ]
}

/// Corrupt a row in one of the ways real exports go wrong
fn inject_anomaly(rng: &mut StdRng, row: &mut [Option<String>]) {
    match rng.random_range(0..4) {
        0 => row[4] = Some(pick(rng, &["31/13/2024", "not a date", ""]).to_string()),
        1 => row[1] = Some(pick(rng, &["0", "-17", "abc", "12.5"]).to_string()),
        2 => row[4] = None,
        _ => row[3] = Some("   ".to_string()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.len() > 3 {
        bail!(USAGE);
    }
    let output = PathBuf::from(&args[0]);
    let rows = match args.get(1) {
        Some(n) => n.parse::<usize>().with_context(|| format!("invalid row count '{n}'"))?,
        None => DEFAULT_ROWS,
    };
    let mut rng = match args.get(2) {
        Some(seed) => StdRng::seed_from_u64(
            seed.parse().with_context(|| format!("invalid seed '{seed}'"))?,
        ),
        None => StdRng::from_os_rng(),
    };

    let patients = i64::try_from((rows / 3).max(1)).context("row count too large")?;
    let mut table: Vec<Vec<Option<String>>> = Vec::with_capacity(rows);
    let mut anomalies = 0;
    let mut duplicates = 0;
    while table.len() < rows {
        if !table.is_empty() && rng.random_bool(0.02) {
            let source = rng.random_range(0..table.len());
            table.push(table[source].clone());
            duplicates += 1;
            continue;
        }
        let mut row = appointment_row(&mut rng, patients);
        if rng.random_bool(0.04) {
            inject_anomaly(&mut rng, &mut row);
            anomalies += 1;
        }
        table.push(row);
    }

    let names = [
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
        raw::VISIT_TYPE,
        raw::DOCTOR_NATIONALITY,
        raw::OCCUPATION,
    ];
    let columns = names.iter().enumerate().map(|(i, name)| {
        let values: StringArray = table.iter().map(|row| row[i].as_deref()).collect();
        (*name, Arc::new(values) as ArrayRef)
    });
    let batch = RecordBatch::try_from_iter(columns)?;

    write_csv(&output, &batch).with_context(|| format!("writing {}", output.display()))?;
    info!(
        "Generated {rows} appointments ({anomalies} corrupted, {duplicates} duplicated) in {}",
        output.display()
    );
    Ok(())
}
