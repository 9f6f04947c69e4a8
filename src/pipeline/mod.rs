//! Pipeline module.
//!
//! This module provides the main preprocessing pipeline and the outlier
//! filter it applies to the training split.

mod builder;
pub mod outliers;

pub use builder::{HeldOutInput, ModelInput, Pipeline, PipelineBuilder, PipelineOutput};
pub use outliers::IqrOutlierFilter;
