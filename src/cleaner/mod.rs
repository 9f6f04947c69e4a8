//! Sentinel handling for raw event tables.
//!
//! Detector simulation encodes "physically undefined" measurements (for
//! example jet kinematics of an event with no reconstructed jets) as a
//! reserved numeric sentinel. This module rewrites that sentinel into an
//! explicit missing marker so downstream stages treat it as absence, not
//! as data.

use crate::error::Result;
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use tracing::debug;

/// Rewrites the reserved sentinel value to null across numeric columns.
pub struct SentinelCleaner;

impl SentinelCleaner {
    /// Replace every occurrence of `sentinel` in a numeric column with null.
    ///
    /// Non-numeric columns are left untouched. Converted numeric columns
    /// come back as `Float64`; the matrix is floating point from this stage
    /// on. Returns the per-column replacement counts for columns where at
    /// least one sentinel was found.
    ///
    /// The operation is total: a frame without sentinels passes through
    /// with zero replacements, and a second pass is a no-op.
    pub fn convert(df: &mut DataFrame, sentinel: f64) -> Result<Vec<(String, usize)>> {
        let col_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut replacements = Vec::new();

        for name in &col_names {
            let series = df.column(name)?.as_materialized_series();
            if !is_numeric_dtype(series.dtype()) {
                continue;
            }

            let floats = series.cast(&DataType::Float64)?;
            let ca = floats.f64()?;

            let replaced = ca
                .into_iter()
                .filter(|v| matches!(v, Some(val) if *val == sentinel))
                .count();

            let converted: Float64Chunked = ca.apply(|v| match v {
                Some(val) if val == sentinel => None,
                other => other,
            });
            df.replace(name, converted.into_series())?;

            if replaced > 0 {
                debug!("Converted {} sentinel values in '{}'", replaced, name);
                replacements.push((name.clone(), replaced));
            }
        }

        Ok(replacements)
    }
}
