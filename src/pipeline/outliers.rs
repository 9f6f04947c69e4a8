//! Outlier handling for the training split.
//!
//! Rows are dropped by per-column interquartile-range fences. Fences are
//! refined sequentially: each column's quartiles are computed over the rows
//! that survived every previously processed column, so the surviving set
//! depends on column order. The pipeline always passes columns in schema
//! order, and the fixtures pin the resulting row sets.
//!
//! The held-out split must never pass through this filter; the pipeline
//! only routes the training split here.

use crate::error::{PreprocessingError, Result};
use crate::utils::{non_null_values, quantile_sorted, sort_values};
use polars::prelude::*;
use tracing::debug;

/// Removes training rows outside per-column IQR fences.
pub struct IqrOutlierFilter;

impl IqrOutlierFilter {
    /// Filter rows of `df` by the fence `[Q1 - k*IQR, Q3 + k*IQR]` of each
    /// listed column, in order, with `k = multiplier`.
    ///
    /// A row survives a column when its value lies inside that column's
    /// fence; a null value in the column under test does not survive.
    /// Returns the filtered frame and the number of rows removed.
    pub fn filter(
        df: DataFrame,
        columns: &[String],
        multiplier: f64,
    ) -> Result<(DataFrame, usize)> {
        let original_rows = df.height();
        let mut df = df;

        for name in columns {
            let col = df
                .column(name)
                .map_err(|_| PreprocessingError::ColumnNotFound(name.clone()))?;
            let series = col.as_materialized_series();

            let mut values = non_null_values(series)?;
            if values.is_empty() {
                continue;
            }
            sort_values(&mut values);

            // quantile_sorted is total for a non-empty sorted slice
            let q1 = quantile_sorted(&values, 0.25).unwrap_or(values[0]);
            let q3 = quantile_sorted(&values, 0.75).unwrap_or(values[values.len() - 1]);
            let iqr = q3 - q1;

            let lower = q1 - multiplier * iqr;
            let upper = q3 + multiplier * iqr;

            let floats = series.cast(&DataType::Float64)?;
            let mask_values: Vec<bool> = floats
                .f64()?
                .into_iter()
                .map(|v| matches!(v, Some(val) if val >= lower && val <= upper))
                .collect();

            let survivors = mask_values.iter().filter(|&&keep| keep).count();
            if survivors < mask_values.len() {
                debug!(
                    "Column '{}': fence [{:.4}, {:.4}] removes {} rows",
                    name,
                    lower,
                    upper,
                    mask_values.len() - survivors
                );
            }

            let mask = BooleanChunked::from_slice("mask".into(), &mask_values);
            df = df.filter(&mask)?;
        }

        let removed = original_rows - df.height();
        Ok((df, removed))
    }
}
