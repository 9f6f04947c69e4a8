//! Shared numeric helpers for the preprocessing pipeline.
//!
//! Quartiles and standard deviations are computed manually over the sorted
//! non-null values rather than through the lazy engine, since every caller
//! already holds a materialized column.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Collect the non-null values of a numeric Series as `f64`.
pub fn non_null_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let floats = series.cast(&DataType::Float64)?;
    Ok(floats.f64()?.into_iter().flatten().collect())
}

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population (ddof = 0) standard deviation around `mean`.
pub fn population_std(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Quantile by linear interpolation over an ascending-sorted slice.
///
/// `None` for an empty slice or a `q` outside `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = pos - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Sort values ascending. Total order over floats; the pipeline never
/// produces NaN (sentinels become nulls, not NaN), but the ordering is
/// well defined even if one slips in.
pub fn sort_values(values: &mut [f64]) {
    values.sort_by(f64::total_cmp);
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always `Float64`.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let floats = series.cast(&DataType::Float64)?;
    let filled: Float64Chunked = floats
        .f64()?
        .apply(|v| Some(v.unwrap_or(fill_value)));
    Ok(filled.into_series())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_non_null_values() {
        let series = Series::new("test".into(), &[Some(1.0), None, Some(3.0)]);
        assert_eq!(non_null_values(&series).unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_non_null_values_integer_column() {
        let series = Series::new("jets".into(), &[0i64, 1, 2]);
        assert_eq!(non_null_values(&series).unwrap(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_population_std() {
        // Values 1..=5: mean 3, population variance 2, std sqrt(2)
        let std = population_std(&[1.0, 2.0, 3.0, 4.0, 5.0], 3.0);
        assert!((std - 2.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_population_std_constant() {
        assert_eq!(population_std(&[5.0, 5.0, 5.0], 5.0), 0.0);
    }

    #[test]
    fn test_quantile_sorted_interpolates() {
        // 10 values 1..=9 plus 1000: Q1 at position 2.25 -> 3.25,
        // Q3 at position 6.75 -> 7.75
        let values: Vec<f64> = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 1000.0];
        assert_eq!(quantile_sorted(&values, 0.25), Some(3.25));
        assert_eq!(quantile_sorted(&values, 0.75), Some(7.75));
    }

    #[test]
    fn test_quantile_sorted_exact_positions() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile_sorted(&values, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&values, 0.5), Some(3.0));
        assert_eq!(quantile_sorted(&values, 1.0), Some(5.0));
    }

    #[test]
    fn test_quantile_sorted_single_value() {
        assert_eq!(quantile_sorted(&[42.0], 0.25), Some(42.0));
        assert_eq!(quantile_sorted(&[42.0], 0.75), Some(42.0));
    }

    #[test]
    fn test_quantile_sorted_empty_or_out_of_range() {
        assert_eq!(quantile_sorted(&[], 0.5), None);
        assert_eq!(quantile_sorted(&[1.0], 1.5), None);
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("test".into(), &[Some(1.0), None, Some(3.0)]);
        let filled = fill_numeric_nulls(&series, 0.0).unwrap();

        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.get(0).unwrap().try_extract::<f64>().unwrap(), 1.0);
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 0.0);
        assert_eq!(filled.get(2).unwrap().try_extract::<f64>().unwrap(), 3.0);
    }

    #[test]
    fn test_fill_numeric_nulls_promotes_to_float() {
        let series = Series::new("jets".into(), &[Some(0i64), None, Some(2)]);
        let filled = fill_numeric_nulls(&series, 1.0).unwrap();
        assert!(matches!(filled.dtype(), DataType::Float64));
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 1.0);
    }
}
