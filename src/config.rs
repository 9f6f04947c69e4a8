//! Configuration types for the event preprocessing pipeline.
//!
//! This module provides configuration options using the builder pattern.
//! Every stage takes its parameters from an explicit [`PipelineConfig`]
//! value rather than from module-level constants, so the pipeline can be
//! exercised with alternate sentinels, fences, and column layouts in tests.

use serde::{Deserialize, Serialize};

/// Configuration for the preprocessing pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with the fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use higgs_prep::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .sentinel(-999.0)
///     .fence_multiplier(3.0)
///     .filter_outliers(true)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Reserved numeric value standing in for "physically undefined".
    /// Default: -999.0
    pub sentinel: f64,

    /// Multiplier k in the outlier fence [Q1 - k*IQR, Q3 + k*IQR].
    /// Default: 1.5
    pub fence_multiplier: f64,

    /// Whether to drop outlier rows from the training split.
    /// The held-out split is never filtered regardless of this flag.
    /// Default: true
    pub filter_outliers: bool,

    /// Name of the unique event identifier column (excluded from features).
    /// Default: "EventId"
    pub id_column: String,

    /// Name of the two-valued target column (training split only).
    /// Default: "Label"
    pub label_column: String,

    /// Name of the per-event weight column (training split only).
    /// `None` when the input carries no weights.
    /// Default: Some("Weight")
    pub weight_column: Option<String>,

    /// Label category encoding to 0.
    /// Default: "b"
    pub background_label: String,

    /// Label category encoding to 1.
    /// Default: "s"
    pub signal_label: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sentinel: -999.0,
            fence_multiplier: 1.5,
            filter_outliers: true,
            id_column: "EventId".to_string(),
            label_column: "Label".to_string(),
            weight_column: Some("Weight".to_string()),
            background_label: "b".to_string(),
            signal_label: "s".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Column names reserved for non-feature roles (identifier, label,
    /// weight). Every other numeric column is a feature.
    pub fn reserved_columns(&self) -> Vec<&str> {
        let mut reserved = vec![self.id_column.as_str(), self.label_column.as_str()];
        if let Some(weight) = &self.weight_column {
            reserved.push(weight.as_str());
        }
        reserved
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.sentinel.is_finite() {
            return Err(ConfigValidationError::NonFiniteSentinel(self.sentinel));
        }

        if !self.fence_multiplier.is_finite() || self.fence_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidFenceMultiplier(
                self.fence_multiplier,
            ));
        }

        if self.background_label.is_empty() || self.signal_label.is_empty() {
            return Err(ConfigValidationError::EmptyLabelCategory);
        }

        if self.background_label == self.signal_label {
            return Err(ConfigValidationError::IdenticalLabelCategories(
                self.signal_label.clone(),
            ));
        }

        let reserved = self.reserved_columns();
        for (i, a) in reserved.iter().enumerate() {
            if a.is_empty() {
                return Err(ConfigValidationError::EmptyColumnName);
            }
            if reserved[i + 1..].contains(a) {
                return Err(ConfigValidationError::DuplicateColumnName(a.to_string()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Sentinel value must be finite, got {0}")]
    NonFiniteSentinel(f64),

    #[error("Fence multiplier must be a positive finite number, got {0}")]
    InvalidFenceMultiplier(f64),

    #[error("Label categories must be non-empty")]
    EmptyLabelCategory,

    #[error("Signal and background labels are both '{0}'")]
    IdenticalLabelCategories(String),

    #[error("Reserved column names must be non-empty")]
    EmptyColumnName,

    #[error("Column name '{0}' is used for more than one role")]
    DuplicateColumnName(String),
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    sentinel: Option<f64>,
    fence_multiplier: Option<f64>,
    filter_outliers: Option<bool>,
    id_column: Option<String>,
    label_column: Option<String>,
    weight_column: Option<Option<String>>,
    background_label: Option<String>,
    signal_label: Option<String>,
}

impl PipelineConfigBuilder {
    /// Set the sentinel value that marks physically undefined measurements.
    pub fn sentinel(mut self, sentinel: f64) -> Self {
        self.sentinel = Some(sentinel);
        self
    }

    /// Set the IQR fence multiplier used by the outlier filter.
    pub fn fence_multiplier(mut self, multiplier: f64) -> Self {
        self.fence_multiplier = Some(multiplier);
        self
    }

    /// Enable or disable outlier filtering on the training split.
    pub fn filter_outliers(mut self, filter: bool) -> Self {
        self.filter_outliers = Some(filter);
        self
    }

    /// Set the event identifier column name.
    pub fn id_column(mut self, name: impl Into<String>) -> Self {
        self.id_column = Some(name.into());
        self
    }

    /// Set the target label column name.
    pub fn label_column(mut self, name: impl Into<String>) -> Self {
        self.label_column = Some(name.into());
        self
    }

    /// Set the per-event weight column name.
    pub fn weight_column(mut self, name: impl Into<String>) -> Self {
        self.weight_column = Some(Some(name.into()));
        self
    }

    /// Declare that the input carries no weight column.
    pub fn no_weight_column(mut self) -> Self {
        self.weight_column = Some(None);
        self
    }

    /// Set the label category that encodes to 0.
    pub fn background_label(mut self, label: impl Into<String>) -> Self {
        self.background_label = Some(label.into());
        self
    }

    /// Set the label category that encodes to 1.
    pub fn signal_label(mut self, label: impl Into<String>) -> Self {
        self.signal_label = Some(label.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            sentinel: self.sentinel.unwrap_or(defaults.sentinel),
            fence_multiplier: self.fence_multiplier.unwrap_or(defaults.fence_multiplier),
            filter_outliers: self.filter_outliers.unwrap_or(defaults.filter_outliers),
            id_column: self.id_column.unwrap_or(defaults.id_column),
            label_column: self.label_column.unwrap_or(defaults.label_column),
            weight_column: self.weight_column.unwrap_or(defaults.weight_column),
            background_label: self.background_label.unwrap_or(defaults.background_label),
            signal_label: self.signal_label.unwrap_or(defaults.signal_label),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.sentinel, -999.0);
        assert_eq!(config.fence_multiplier, 1.5);
        assert!(config.filter_outliers);
        assert_eq!(config.id_column, "EventId");
        assert_eq!(config.label_column, "Label");
        assert_eq!(config.weight_column.as_deref(), Some("Weight"));
        assert_eq!(config.background_label, "b");
        assert_eq!(config.signal_label, "s");
    }

    #[test]
    fn test_builder_defaults() {
        let config = PipelineConfig::builder().build().unwrap();
        assert_eq!(config.sentinel, -999.0);
        assert_eq!(config.fence_multiplier, 1.5);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = PipelineConfig::builder()
            .sentinel(-1.0)
            .fence_multiplier(3.0)
            .filter_outliers(false)
            .label_column("target")
            .no_weight_column()
            .background_label("bkg")
            .signal_label("sig")
            .build()
            .unwrap();

        assert_eq!(config.sentinel, -1.0);
        assert_eq!(config.fence_multiplier, 3.0);
        assert!(!config.filter_outliers);
        assert_eq!(config.label_column, "target");
        assert_eq!(config.weight_column, None);
        assert_eq!(config.background_label, "bkg");
        assert_eq!(config.signal_label, "sig");
    }

    #[test]
    fn test_validation_rejects_non_positive_fence() {
        let result = PipelineConfig::builder().fence_multiplier(0.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidFenceMultiplier(_)
        ));
    }

    #[test]
    fn test_validation_rejects_nan_sentinel() {
        let result = PipelineConfig::builder().sentinel(f64::NAN).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::NonFiniteSentinel(_)
        ));
    }

    #[test]
    fn test_validation_rejects_identical_labels() {
        let result = PipelineConfig::builder()
            .background_label("s")
            .signal_label("s")
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::IdenticalLabelCategories(_)
        ));
    }

    #[test]
    fn test_validation_rejects_duplicate_column_roles() {
        let result = PipelineConfig::builder()
            .id_column("Label")
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::DuplicateColumnName(_)
        ));
    }

    #[test]
    fn test_reserved_columns() {
        let config = PipelineConfig::default();
        assert_eq!(config.reserved_columns(), vec!["EventId", "Label", "Weight"]);

        let config = PipelineConfig::builder().no_weight_column().build().unwrap();
        assert_eq!(config.reserved_columns(), vec!["EventId", "Label"]);
    }

    #[test]
    fn test_config_serialization() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PipelineConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config.sentinel, deserialized.sentinel);
        assert_eq!(config.fence_multiplier, deserialized.fence_multiplier);
        assert_eq!(config.label_column, deserialized.label_column);
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "sentinel": -999.0,
            "fence_multiplier": 2.5,
            "filter_outliers": false,
            "id_column": "EventId",
            "label_column": "Label",
            "weight_column": null,
            "background_label": "b",
            "signal_label": "s"
        }"#;

        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.fence_multiplier, 2.5);
        assert!(!config.filter_outliers);
        assert_eq!(config.weight_column, None);
        assert!(config.validate().is_ok());
    }
}
