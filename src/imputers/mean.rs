//! Mean imputation for numeric feature columns.

use crate::error::{PreprocessingError, Result};
use crate::utils::{fill_numeric_nulls, mean, non_null_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-column imputation means, fit on the reference split.
///
/// Immutable once produced; transforms borrow it and never write back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputeStatistics {
    means: BTreeMap<String, f64>,
}

static_assertions::assert_impl_all!(ImputeStatistics: Send, Sync);

impl ImputeStatistics {
    /// The stored mean for a column, if it was fitted.
    pub fn mean(&self, column: &str) -> Option<f64> {
        self.means.get(column).copied()
    }

    /// Names of the fitted columns.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.means.keys().map(String::as_str)
    }

    /// Number of fitted columns.
    pub fn len(&self) -> usize {
        self.means.len()
    }

    /// Whether no columns were fitted.
    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }
}

/// Mean imputation: fit on the reference split, transform any split.
pub struct MeanImputer;

impl MeanImputer {
    /// Compute the arithmetic mean of the non-missing values of every
    /// listed column over the reference split.
    ///
    /// # Errors
    ///
    /// - [`PreprocessingError::ColumnNotFound`] when a listed column is
    ///   absent from the reference split.
    /// - [`PreprocessingError::EmptyReferenceColumn`] when a column holds
    ///   no non-missing values, leaving its mean undefined.
    pub fn fit(df: &DataFrame, columns: &[String]) -> Result<ImputeStatistics> {
        let mut means = BTreeMap::new();

        for name in columns {
            let col = df
                .column(name)
                .map_err(|_| PreprocessingError::ColumnNotFound(name.clone()))?;
            let values = non_null_values(col.as_materialized_series())?;
            let col_mean = mean(&values)
                .ok_or_else(|| PreprocessingError::EmptyReferenceColumn(name.clone()))?;
            means.insert(name.clone(), col_mean);
        }

        debug!("Fitted imputation means for {} columns", means.len());
        Ok(ImputeStatistics { means })
    }

    /// Fill every missing value in the fitted columns with the stored mean.
    ///
    /// Callable on any split, including the reference split itself;
    /// transforming an already-imputed frame is a no-op. Returns the number
    /// of values filled.
    ///
    /// # Errors
    ///
    /// [`PreprocessingError::SchemaMismatch`] when the frame lacks a column
    /// the statistics were fitted on.
    pub fn transform(df: &mut DataFrame, stats: &ImputeStatistics) -> Result<usize> {
        let mut filled_total = 0;

        for (name, col_mean) in &stats.means {
            let col = df
                .column(name)
                .map_err(|_| PreprocessingError::SchemaMismatch {
                    column: name.clone(),
                })?;
            let series = col.as_materialized_series();
            let nulls = series.null_count();
            if nulls == 0 {
                continue;
            }

            let filled = fill_numeric_nulls(series, *col_mean)?;
            df.replace(name, filled)?;
            filled_total += nulls;
            debug!("Imputed {} values in '{}' with mean {:.4}", nulls, name, col_mean);
        }

        Ok(filled_total)
    }
}
