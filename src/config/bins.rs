//! Interval binning driven by configured edges and labels.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{PreprocessError, Result};

/// Which side of each interval is inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Closed {
    /// `[lo, hi)`
    Left,
    /// `(lo, hi]`; the first bin also includes its lower edge
    Right,
}

/// Integer bin specification
///
/// `edges` must be strictly increasing. With `labels.len() == edges.len() - 1`
/// every bin is bounded; with `labels.len() == edges.len()` the last bin is
/// unbounded above. Values below the first edge, or above the last edge when
/// every bin is bounded, fall outside every bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BinSpec {
    /// Interval boundaries
    pub edges: Vec<i64>,
    /// One label per bin
    pub labels: Vec<String>,
    /// Inclusive side of each interval
    pub closed: Closed,
}

impl BinSpec {
    /// Create a new bin specification
    pub fn new<S: Into<String>>(
        edges: Vec<i64>,
        labels: impl IntoIterator<Item = S>,
        closed: Closed,
    ) -> Self {
        Self {
            edges,
            labels: labels.into_iter().map(Into::into).collect(),
            closed,
        }
    }

    /// Check edge ordering and label count
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.edges.is_empty() {
            return Err(PreprocessError::config(format!("{name}: no bin edges")));
        }
        if self.edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PreprocessError::config(format!(
                "{name}: bin edges must be strictly increasing, got {:?}",
                self.edges
            )));
        }
        let n = self.edges.len();
        if self.labels.len() != n && self.labels.len() + 1 != n {
            return Err(PreprocessError::config(format!(
                "{name}: {} edges need {} or {} labels, got {}",
                n,
                n - 1,
                n,
                self.labels.len()
            )));
        }
        if self.labels.is_empty() {
            return Err(PreprocessError::config(format!("{name}: no bin labels")));
        }
        let mut seen = FxHashSet::default();
        if let Some(dup) = self.labels.iter().find(|l| !seen.insert(l.as_str())) {
            return Err(PreprocessError::config(format!(
                "{name}: duplicate bin label '{dup}'"
            )));
        }
        Ok(())
    }

    /// Whether the last bin extends to infinity
    #[must_use]
    pub fn is_open_ended(&self) -> bool {
        self.labels.len() == self.edges.len()
    }

    /// Index of the bin containing `value`
    #[must_use]
    pub fn locate(&self, value: i64) -> Option<usize> {
        let first = *self.edges.first()?;
        if value < first {
            return None;
        }

        let bounded = self.edges.len() - 1;
        for (i, w) in self.edges.windows(2).enumerate() {
            let (lo, hi) = (w[0], w[1]);
            let inside = match self.closed {
                Closed::Left => value >= lo && value < hi,
                Closed::Right => (value > lo || i == 0) && value <= hi,
            };
            if inside {
                return Some(i);
            }
        }

        if self.is_open_ended() {
            let last = self.edges[bounded];
            let inside = match self.closed {
                Closed::Left => value >= last,
                // A lone open bin has no earlier bin claiming its lower edge
                Closed::Right => value > last || (bounded == 0 && value == last),
            };
            if inside {
                return Some(bounded);
            }
        }

        None
    }

    /// Label of the bin containing `value`
    #[must_use]
    pub fn label_for(&self, value: i64) -> Option<&str> {
        self.locate(value).map(|i| self.labels[i].as_str())
    }
}
