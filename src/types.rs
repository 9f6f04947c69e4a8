use serde::{Deserialize, Serialize};

/// Human-readable summary of what the pipeline did.
///
/// Serialized and written next to the processed matrices so a downstream
/// consumer can audit the run without re-deriving the counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    /// Number of training rows before preprocessing.
    pub rows_before: usize,
    /// Number of training rows after preprocessing.
    pub rows_after: usize,
    /// Number of training rows removed by the outlier filter.
    pub rows_removed: usize,

    /// Number of feature columns in the output matrix.
    pub feature_count: usize,

    /// Sentinel occurrences rewritten to missing, across all splits.
    pub sentinel_replacements: usize,
    /// Missing values filled with reference-split means, across all splits.
    pub values_imputed: usize,

    /// List of actions taken during preprocessing.
    pub actions: Vec<PreprocessingAction>,

    /// Warnings and notes generated during preprocessing.
    pub warnings: Vec<String>,
}

impl Default for PreprocessingSummary {
    fn default() -> Self {
        Self {
            duration_ms: 0,
            rows_before: 0,
            rows_after: 0,
            rows_removed: 0,
            feature_count: 0,
            sentinel_replacements: 0,
            values_imputed: 0,
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl PreprocessingSummary {
    /// Create a new empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action to the summary.
    pub fn add_action(&mut self, action: PreprocessingAction) {
        self.actions.push(action);
    }

    /// Add a warning to the summary.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Calculate the percentage of training rows removed.
    pub fn rows_removed_percentage(&self) -> f64 {
        if self.rows_before == 0 {
            0.0
        } else {
            (self.rows_removed as f64 / self.rows_before as f64) * 100.0
        }
    }
}

/// A single action taken during preprocessing.
///
/// Actions are logged throughout the pipeline execution to provide
/// an audit trail of what was done to the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingAction {
    /// Type of action performed.
    pub action_type: ActionType,
    /// Target of the action (column name or split name).
    pub target: String,
    /// Human-readable description of the action.
    pub description: String,
}

impl PreprocessingAction {
    /// Create a new preprocessing action.
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
        }
    }
}

/// Types of actions that can be taken during preprocessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Sentinel values were rewritten to explicit missing markers.
    SentinelConverted,
    /// Missing values were filled with reference-split means.
    ValueImputed,
    /// Outlier rows were removed from the training split.
    RowsRemoved,
    /// Features were standardized with reference-split statistics.
    FeatureScaled,
    /// The label column was encoded to a binary vector.
    LabelEncoded,
    /// A non-feature column was split off the feature matrix.
    ColumnExcluded,
}

impl ActionType {
    /// Get a human-readable display name for the action type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SentinelConverted => "Sentinel Converted",
            Self::ValueImputed => "Value Imputed",
            Self::RowsRemoved => "Rows Removed",
            Self::FeatureScaled => "Feature Scaled",
            Self::LabelEncoded => "Label Encoded",
            Self::ColumnExcluded => "Column Excluded",
        }
    }
}
