//! Imputation module for handling missing values.
//!
//! Statistics are fit once on the reference (training) split and threaded
//! explicitly into every transform call, so "train-then-apply-unchanged"
//! is enforced by the types rather than by convention.

mod mean;

pub use mean::{ImputeStatistics, MeanImputer};
