//! Main preprocessing pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the preprocessing workflow: sentinel conversion, mean
//! imputation, outlier filtering (training split only), label/weight
//! separation, and standardization.
//!
//! Statistics are fit on the training split and applied unchanged to the
//! held-out split; the held-out split never contributes to a fit and is
//! never filtered.

use crate::cleaner::SentinelCleaner;
use crate::config::PipelineConfig;
use crate::encoder::LabelEncoder;
use crate::error::{PreprocessingError, Result, ResultExt};
use crate::imputers::{ImputeStatistics, MeanImputer};
use crate::pipeline::outliers::IqrOutlierFilter;
use crate::scaler::{ScaleStatistics, StandardScaler};
use crate::types::{ActionType, PreprocessingAction, PreprocessingSummary};
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

/// Model-ready training data: standardized feature matrix, aligned binary
/// label vector, and the untouched per-event weights when present.
#[derive(Debug, Clone)]
pub struct ModelInput {
    pub features: DataFrame,
    pub labels: Series,
    pub weights: Option<Series>,
}

/// The held-out split after the same transforms, minus filtering: every
/// input row survives, keyed by its event identifier.
#[derive(Debug, Clone)]
pub struct HeldOutInput {
    pub ids: Series,
    pub features: DataFrame,
}

/// Everything a pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub train: ModelInput,
    pub test: Option<HeldOutInput>,
    pub impute_stats: ImputeStatistics,
    pub scale_stats: ScaleStatistics,
    pub summary: PreprocessingSummary,
}

/// The main preprocessing pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom
/// configuration.
///
/// # Example
///
/// ```rust,ignore
/// use higgs_prep::{Pipeline, PipelineConfig};
///
/// let output = Pipeline::builder()
///     .config(PipelineConfig::builder().fence_multiplier(3.0).build()?)
///     .build()?
///     .run(train_df, Some(test_df))?;
///
/// println!("{} training events ready", output.train.features.height());
/// ```
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
}

static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full preprocessing sequence.
    ///
    /// `train` is the reference split: every fit-time statistic comes from
    /// it, and it alone is outlier-filtered. `test`, when given, receives
    /// the identical sentinel/imputation/scaling transforms row-for-row.
    pub fn run(&self, train: DataFrame, test: Option<DataFrame>) -> Result<PipelineOutput> {
        let start_time = Instant::now();
        let mut summary = PreprocessingSummary::new();
        summary.rows_before = train.height();

        info!(
            "Starting preprocessing: {} training rows, {} held-out rows",
            train.height(),
            test.as_ref().map_or(0, |df| df.height())
        );

        self.validate_training_schema(&train)?;
        if let Some(test_df) = &test {
            self.validate_held_out_schema(test_df)?;
        }

        let feature_columns = self.feature_columns(&train)?;
        summary.feature_count = feature_columns.len();
        debug!("Feature columns: {:?}", feature_columns);

        // Stage 1: sentinel -> missing, on every split
        let mut train = train;
        let replaced_train = SentinelCleaner::convert(&mut train, self.config.sentinel)?;
        let mut test = test;
        let replaced_test = match test.as_mut() {
            Some(test_df) => SentinelCleaner::convert(test_df, self.config.sentinel)?,
            None => Vec::new(),
        };
        let sentinel_total: usize = replaced_train
            .iter()
            .chain(replaced_test.iter())
            .map(|(_, n)| n)
            .sum();
        summary.sentinel_replacements = sentinel_total;
        if sentinel_total > 0 {
            summary.add_action(PreprocessingAction::new(
                ActionType::SentinelConverted,
                "all splits",
                format!(
                    "Rewrote {} occurrences of {} to missing",
                    sentinel_total, self.config.sentinel
                ),
            ));
        }

        // Stage 2: mean imputation, fit on the training split only
        let impute_stats = MeanImputer::fit(&train, &feature_columns)
            .context("While fitting imputation means on the training split")?;
        let filled_train = MeanImputer::transform(&mut train, &impute_stats)?;
        let filled_test = match test.as_mut() {
            Some(test_df) => MeanImputer::transform(test_df, &impute_stats)
                .context("While imputing the held-out split")?,
            None => 0,
        };
        summary.values_imputed = filled_train + filled_test;
        if summary.values_imputed > 0 {
            summary.add_action(PreprocessingAction::new(
                ActionType::ValueImputed,
                "all splits",
                format!(
                    "Filled {} missing values with training-split means",
                    summary.values_imputed
                ),
            ));
        }

        // Stage 3: IQR outlier filtering, training split only
        if self.config.filter_outliers {
            let (filtered, removed) =
                IqrOutlierFilter::filter(train, &feature_columns, self.config.fence_multiplier)?;
            train = filtered;
            summary.rows_removed = removed;
            if removed > 0 {
                summary.add_action(PreprocessingAction::new(
                    ActionType::RowsRemoved,
                    "train",
                    format!("Removed {} rows outside IQR fences", removed),
                ));
            }
            info!("Outlier filter removed {} training rows", removed);
        } else {
            summary.add_warning("Outlier filtering disabled by configuration");
        }

        // Stage 4: label/weight separation
        let labels = train
            .column(&self.config.label_column)?
            .as_materialized_series()
            .clone();
        let weights = match &self.config.weight_column {
            Some(weight_col) => Some(
                train
                    .column(weight_col)?
                    .as_materialized_series()
                    .clone(),
            ),
            None => None,
        };
        let mut train_features = self.drop_reserved(train)?;
        summary.add_action(PreprocessingAction::new(
            ActionType::ColumnExcluded,
            "train",
            format!(
                "Split off {:?} from the feature matrix",
                self.config.reserved_columns()
            ),
        ));

        let (test_ids, mut test_features) = match test {
            Some(test_df) => {
                let ids = test_df
                    .column(&self.config.id_column)?
                    .as_materialized_series()
                    .clone();
                (Some(ids), Some(self.drop_reserved(test_df)?))
            }
            None => (None, None),
        };

        // Stage 5: standardization, fit on the filtered training split
        let scale_stats = StandardScaler::fit(&train_features, &feature_columns)
            .context("While fitting scaling statistics on the training split")?;
        StandardScaler::transform(&mut train_features, &scale_stats)?;
        if let Some(test_features) = test_features.as_mut() {
            StandardScaler::transform(test_features, &scale_stats)
                .context("While scaling the held-out split")?;
        }
        summary.add_action(PreprocessingAction::new(
            ActionType::FeatureScaled,
            "all splits",
            format!("Standardized {} feature columns", feature_columns.len()),
        ));

        // Stage 6: label encoding
        let encoder = LabelEncoder::new(
            self.config.background_label.clone(),
            self.config.signal_label.clone(),
        );
        let encoded_labels = encoder.encode(&labels)?;
        summary.add_action(PreprocessingAction::new(
            ActionType::LabelEncoded,
            self.config.label_column.clone(),
            format!(
                "Encoded '{}' -> 0, '{}' -> 1",
                self.config.background_label, self.config.signal_label
            ),
        ));

        summary.rows_after = train_features.height();
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Preprocessing complete: {} rows x {} features in {} ms",
            summary.rows_after, summary.feature_count, summary.duration_ms
        );

        Ok(PipelineOutput {
            train: ModelInput {
                features: train_features,
                labels: encoded_labels,
                weights,
            },
            test: match (test_ids, test_features) {
                (Some(ids), Some(features)) => Some(HeldOutInput { ids, features }),
                _ => None,
            },
            impute_stats,
            scale_stats,
            summary,
        })
    }

    /// Numeric columns that are neither identifier, label, nor weight.
    fn feature_columns(&self, df: &DataFrame) -> Result<Vec<String>> {
        let reserved = self.config.reserved_columns();
        let features: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|col| {
                is_numeric_dtype(col.dtype()) && !reserved.contains(&col.name().as_str())
            })
            .map(|col| col.name().to_string())
            .collect();

        if features.is_empty() {
            return Err(PreprocessingError::InvalidConfig(
                "Training split has no numeric feature columns".to_string(),
            ));
        }
        Ok(features)
    }

    /// Require identifier and label (and weight, when configured) on the
    /// training split.
    fn validate_training_schema(&self, df: &DataFrame) -> Result<()> {
        let mut required = vec![&self.config.id_column, &self.config.label_column];
        if let Some(weight_col) = &self.config.weight_column {
            required.push(weight_col);
        }
        for name in required {
            df.column(name)
                .map_err(|_| PreprocessingError::ColumnNotFound(name.clone()))
                .context("While validating the training split")?;
        }
        Ok(())
    }

    /// The held-out split carries the identifier but no label or weight.
    fn validate_held_out_schema(&self, df: &DataFrame) -> Result<()> {
        df.column(&self.config.id_column)
            .map_err(|_| PreprocessingError::ColumnNotFound(self.config.id_column.clone()))
            .context("While validating the held-out split")?;
        Ok(())
    }

    /// Drop identifier/label/weight columns, keeping only features.
    fn drop_reserved(&self, df: DataFrame) -> Result<DataFrame> {
        let mut df = df;
        for name in self.config.reserved_columns() {
            if df.column(name).is_ok() {
                df = df.drop(name)?;
            }
        }
        Ok(df)
    }
}

/// Builder for [`Pipeline`].
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
}

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the pipeline, re-validating the configuration.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_default();
        config
            .validate()
            .map_err(|e| PreprocessingError::InvalidConfig(e.to_string()))?;
        Ok(Pipeline { config })
    }
}
