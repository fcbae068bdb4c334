//! Pipeline stages for appointment datasets
//!
//! This module contains the preprocessing stages (validation, cleaning,
//! categorical normalization, labeling, finalization) and the feature
//! derivers they orchestrate.

pub mod features;
pub mod preprocessing;
