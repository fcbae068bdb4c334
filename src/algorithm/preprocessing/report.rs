//! Summaries produced by the preprocessing stages

use std::fmt;

/// Shape of the raw dataset as observed by the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of records
    pub rows: usize,
    /// Number of columns
    pub columns: usize,
}

/// Counts of rows removed or repaired by the cleaner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningReport {
    /// Rows entering the cleaner
    pub input_rows: usize,
    /// Rows dropped for a null mandatory date
    pub malformed_dates: usize,
    /// Rows dropped for an invalid identifier
    pub invalid_identifiers: usize,
    /// Rows dropped as duplicates of an earlier row
    pub duplicates: usize,
    /// Null cells replaced by configured fill values, in rows that were kept
    pub filled_values: usize,
    /// Rows leaving the cleaner
    pub output_rows: usize,
}

impl CleaningReport {
    /// Total rows removed
    #[must_use]
    pub fn removed(&self) -> usize {
        self.malformed_dates + self.invalid_identifiers + self.duplicates
    }

    /// Multi-line human-readable summary
    #[must_use]
    pub fn summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("Cleaning Summary:\n");
        summary.push_str(&format!("  Input Rows: {}\n", self.input_rows));
        summary.push_str(&format!("  Malformed Dates: {}\n", self.malformed_dates));
        summary.push_str(&format!(
            "  Invalid Identifiers: {}\n",
            self.invalid_identifiers
        ));
        summary.push_str(&format!("  Duplicates: {}\n", self.duplicates));
        summary.push_str(&format!("  Filled Values: {}\n", self.filled_values));
        summary.push_str(&format!("  Output Rows: {}\n", self.output_rows));
        summary
    }
}

impl fmt::Display for CleaningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} rows ({} removed: {} malformed dates, {} invalid identifiers, {} duplicates)",
            self.input_rows,
            self.output_rows,
            self.removed(),
            self.malformed_dates,
            self.invalid_identifiers,
            self.duplicates
        )
    }
}

/// Shape of the finalized dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSummary {
    /// Number of records
    pub rows: usize,
    /// Number of columns, label included
    pub columns: usize,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows x {} columns", self.rows, self.columns)
    }
}
