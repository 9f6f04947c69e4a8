//! Higgs Event Preprocessing Pipeline
//!
//! Transforms raw ATLAS Higgs-boson event tables into a model-ready numeric
//! matrix with an aligned binary label vector, built on Rust and Polars.
//!
//! # Overview
//!
//! The pipeline is a strictly linear sequence of pure transformations:
//!
//! - **Sentinel conversion**: the reserved placeholder (-999 by default)
//!   marking physically undefined measurements becomes an explicit missing
//!   marker in every numeric column.
//! - **Mean imputation**: per-column means are fit on the training split and
//!   applied unchanged to every split.
//! - **Outlier filtering**: training rows outside per-column IQR fences are
//!   dropped; the held-out split is never filtered.
//! - **Standardization**: features are rescaled to zero mean and unit
//!   variance using training-split statistics.
//! - **Label encoding**: the two-valued label maps to 0/1 with a fixed
//!   table, failing on anything else.
//!
//! Fit-time statistics are explicit value types ([`ImputeStatistics`],
//! [`ScaleStatistics`]) threaded into every transform call, so the
//! "fit on the reference split, apply unchanged elsewhere" contract is
//! carried by the types.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use higgs_prep::{Pipeline, PipelineConfig};
//! use polars::prelude::*;
//!
//! let train = CsvReadOptions::default()
//!     .with_has_header(true)
//!     .try_into_reader_with_file_path(Some("training.csv".into()))?
//!     .finish()?;
//!
//! let config = PipelineConfig::builder()
//!     .sentinel(-999.0)
//!     .fence_multiplier(1.5)
//!     .build()?;
//!
//! let output = Pipeline::builder()
//!     .config(config)
//!     .build()?
//!     .run(train, None)?;
//!
//! println!(
//!     "{} events x {} features, {} rows removed",
//!     output.train.features.height(),
//!     output.summary.feature_count,
//!     output.summary.rows_removed,
//! );
//! ```

pub mod cleaner;
pub mod config;
pub mod encoder;
pub mod error;
pub mod imputers;
pub mod pipeline;
pub mod scaler;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::SentinelCleaner;
pub use config::{ConfigValidationError, PipelineConfig, PipelineConfigBuilder};
pub use encoder::LabelEncoder;
pub use error::{PreprocessingError, Result as PreprocessingResult, ResultExt};
pub use imputers::{ImputeStatistics, MeanImputer};
pub use pipeline::{
    HeldOutInput, IqrOutlierFilter, ModelInput, Pipeline, PipelineBuilder, PipelineOutput,
};
pub use scaler::{ColumnScale, ScaleStatistics, StandardScaler};
pub use types::{ActionType, PreprocessingAction, PreprocessingSummary};
