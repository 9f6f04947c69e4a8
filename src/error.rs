//! Custom error types for the event preprocessing pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Every stage
//! failure is unrecoverable for the current run: the pipeline aborts with a
//! specific diagnosis instead of silently degrading the data.

use thiserror::Error;

/// The main error type for the preprocessing pipeline.
#[derive(Error, Debug)]
pub enum PreprocessingError {
    /// A configured column is absent from the input dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A feature column has no non-missing values in the reference split,
    /// so its imputation mean is undefined.
    #[error("Column '{0}' has no non-missing values in the reference split")]
    EmptyReferenceColumn(String),

    /// A feature column has zero variance in the reference split and
    /// cannot be standardized.
    #[error("Column '{0}' has zero variance in the reference split")]
    DegenerateFeature(String),

    /// The label column contained a value outside the configured categories.
    #[error("Unrecognized label '{value}' in column '{column}'")]
    UnknownCategory { column: String, value: String },

    /// A transform-time dataset lacks a column the fitted statistics expect.
    #[error("Dataset lacks column '{column}' expected by fitted statistics")]
    SchemaMismatch { column: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PreprocessingError>,
    },
}

impl PreprocessingError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PreprocessingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this error points at the input data rather than the code
    /// or configuration (useful for CLI exit messaging).
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::ColumnNotFound(_)
                | Self::EmptyReferenceColumn(_)
                | Self::DegenerateFeature(_)
                | Self::UnknownCategory { .. }
                | Self::SchemaMismatch { .. }
        )
    }
}

/// Result type alias for preprocessing operations.
pub type Result<T> = std::result::Result<T, PreprocessingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PreprocessingError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PreprocessingError::EmptyReferenceColumn("DER_mass_MMC".to_string());
        assert!(err.to_string().contains("DER_mass_MMC"));
        assert!(err.to_string().contains("no non-missing values"));
    }

    #[test]
    fn test_unknown_category_display() {
        let err = PreprocessingError::UnknownCategory {
            column: "Label".to_string(),
            value: "x".to_string(),
        };
        assert!(err.to_string().contains("Label"));
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_is_data_error() {
        assert!(PreprocessingError::DegenerateFeature("phi".to_string()).is_data_error());
        assert!(
            PreprocessingError::SchemaMismatch {
                column: "PRI_met".to_string()
            }
            .is_data_error()
        );
        assert!(!PreprocessingError::InvalidConfig("bad".to_string()).is_data_error());
    }

    #[test]
    fn test_with_context() {
        let err = PreprocessingError::ColumnNotFound("Weight".to_string())
            .with_context("While validating training split");
        assert!(err.to_string().contains("While validating training split"));
        assert!(err.to_string().contains("Weight"));
    }

    #[test]
    fn test_result_ext_on_polars_result() {
        let res: std::result::Result<(), polars::error::PolarsError> = Err(
            polars::error::PolarsError::ComputeError("boom".to_string().into()),
        );
        let err = res.context("During scaling").unwrap_err();
        assert!(err.to_string().contains("During scaling"));
    }
}
