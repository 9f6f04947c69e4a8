//! Feature standardization.
//!
//! Each numeric feature is rescaled to zero mean and unit variance using
//! statistics fit on the reference split. The same statistics are applied
//! unchanged to every other split, so a held-out split generally does not
//! come out with mean 0 / deviation 1. That asymmetry is the contract.

use crate::error::{PreprocessingError, Result};
use crate::utils::{mean, non_null_values, population_std};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Mean and population standard deviation of one feature column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnScale {
    pub mean: f64,
    pub std_dev: f64,
}

/// Per-column scaling statistics, fit on the reference split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleStatistics {
    columns: BTreeMap<String, ColumnScale>,
}

static_assertions::assert_impl_all!(ScaleStatistics: Send, Sync);

impl ScaleStatistics {
    /// The stored scale for a column, if it was fitted.
    pub fn scale(&self, column: &str) -> Option<ColumnScale> {
        self.columns.get(column).copied()
    }

    /// Names of the fitted columns.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Number of fitted columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no columns were fitted.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Standardizing scaler: fit on the reference split, transform any split.
pub struct StandardScaler;

impl StandardScaler {
    /// Compute mean and population standard deviation for every listed
    /// column over the reference split.
    ///
    /// # Errors
    ///
    /// - [`PreprocessingError::ColumnNotFound`] when a listed column is
    ///   absent.
    /// - [`PreprocessingError::EmptyReferenceColumn`] when a column holds
    ///   no non-missing values.
    /// - [`PreprocessingError::DegenerateFeature`] when a column is
    ///   constant; dividing by its zero deviation would poison the matrix.
    pub fn fit(df: &DataFrame, columns: &[String]) -> Result<ScaleStatistics> {
        let mut scales = BTreeMap::new();

        for name in columns {
            let col = df
                .column(name)
                .map_err(|_| PreprocessingError::ColumnNotFound(name.clone()))?;
            let values = non_null_values(col.as_materialized_series())?;
            let col_mean = mean(&values)
                .ok_or_else(|| PreprocessingError::EmptyReferenceColumn(name.clone()))?;
            let std_dev = population_std(&values, col_mean);

            if std_dev == 0.0 {
                return Err(PreprocessingError::DegenerateFeature(name.clone()));
            }

            scales.insert(
                name.clone(),
                ColumnScale {
                    mean: col_mean,
                    std_dev,
                },
            );
        }

        debug!("Fitted scaling statistics for {} columns", scales.len());
        Ok(ScaleStatistics { columns: scales })
    }

    /// Replace each value `v` of a fitted column with `(v - mean) / std`.
    ///
    /// # Errors
    ///
    /// [`PreprocessingError::SchemaMismatch`] when the frame lacks a column
    /// the statistics were fitted on.
    pub fn transform(df: &mut DataFrame, stats: &ScaleStatistics) -> Result<()> {
        for (name, scale) in &stats.columns {
            let col = df
                .column(name)
                .map_err(|_| PreprocessingError::SchemaMismatch {
                    column: name.clone(),
                })?;
            let floats = col.as_materialized_series().cast(&DataType::Float64)?;
            let scaled: Float64Chunked = floats
                .f64()?
                .apply(|v| v.map(|val| (val - scale.mean) / scale.std_dev));
            df.replace(name, scaled.into_series())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature_names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn column_values(df: &DataFrame, name: &str) -> Vec<f64> {
        non_null_values(df.column(name).unwrap().as_materialized_series()).unwrap()
    }

    #[test]
    fn test_fit_computes_population_std() {
        let df = df![
            "pt" => [1.0, 2.0, 3.0, 4.0, 5.0],
        ]
        .unwrap();

        let stats = StandardScaler::fit(&df, &feature_names(&["pt"])).unwrap();
        let scale = stats.scale("pt").unwrap();
        assert!((scale.mean - 3.0).abs() < 1e-12);
        // Population variance of 1..=5 is 2
        assert!((scale.std_dev - 2.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_fit_fails_on_constant_column() {
        let df = df![
            "phi" => [1.5, 1.5, 1.5],
        ]
        .unwrap();

        let err = StandardScaler::fit(&df, &feature_names(&["phi"])).unwrap_err();
        assert!(matches!(err, PreprocessingError::DegenerateFeature(c) if c == "phi"));
    }

    #[test]
    fn test_fit_fails_on_empty_column() {
        let df = df![
            "phi" => [Option::<f64>::None, None],
        ]
        .unwrap();

        let err = StandardScaler::fit(&df, &feature_names(&["phi"])).unwrap_err();
        assert!(matches!(err, PreprocessingError::EmptyReferenceColumn(c) if c == "phi"));
    }

    #[test]
    fn test_transform_standardizes_reference_split() {
        let mut df = df![
            "pt" => [1.0, 2.0, 3.0, 4.0, 5.0],
        ]
        .unwrap();

        let stats = StandardScaler::fit(&df, &feature_names(&["pt"])).unwrap();
        StandardScaler::transform(&mut df, &stats).unwrap();

        let values = column_values(&df, "pt");
        let m = mean(&values).unwrap();
        let s = population_std(&values, m);
        assert!(m.abs() < 1e-12);
        assert!((s - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_transform_other_split_is_not_standardized() {
        let train = df![
            "pt" => [1.0, 2.0, 3.0, 4.0, 5.0],
        ]
        .unwrap();
        let stats = StandardScaler::fit(&train, &feature_names(&["pt"])).unwrap();

        let mut test = df![
            "pt" => [10.0, 20.0, 30.0],
        ]
        .unwrap();
        StandardScaler::transform(&mut test, &stats).unwrap();

        let values = column_values(&test, "pt");
        let m = mean(&values).unwrap();
        // Reference statistics shift the held-out split far from zero mean.
        assert!(m.abs() > 1.0);
    }

    #[test]
    fn test_transform_fails_on_schema_mismatch() {
        let train = df![
            "pt" => [1.0, 2.0, 3.0],
        ]
        .unwrap();
        let stats = StandardScaler::fit(&train, &feature_names(&["pt"])).unwrap();

        let mut other = df![
            "eta" => [1.0, 2.0, 3.0],
        ]
        .unwrap();
        let err = StandardScaler::transform(&mut other, &stats).unwrap_err();
        assert!(matches!(err, PreprocessingError::SchemaMismatch { column } if column == "pt"));
    }

    #[test]
    fn test_transform_exact_values() {
        let mut df = df![
            "x" => [0.0, 10.0],
        ]
        .unwrap();
        let stats = StandardScaler::fit(&df, &feature_names(&["x"])).unwrap();
        StandardScaler::transform(&mut df, &stats).unwrap();

        // mean 5, population std 5 -> values -1 and 1
        let values = column_values(&df, "x");
        assert_eq!(values, vec![-1.0, 1.0]);
    }

    #[test]
    fn test_statistics_serialize_round_trip() {
        let df = df![
            "x" => [0.0, 10.0],
        ]
        .unwrap();
        let stats = StandardScaler::fit(&df, &feature_names(&["x"])).unwrap();

        let json = serde_json::to_string(&stats).unwrap();
        let restored: ScaleStatistics = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.scale("x"), stats.scale("x"));
    }
}
