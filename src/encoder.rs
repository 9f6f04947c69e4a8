//! Binary label encoding.

use crate::error::{PreprocessingError, Result};
use polars::prelude::*;

/// Maps the two-valued string label to a binary code with a fixed,
/// explicit table: background -> 0, signal -> 1.
///
/// Any other value, including a missing label, aborts the run.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    background: String,
    signal: String,
}

static_assertions::assert_impl_all!(LabelEncoder: Send, Sync);

impl LabelEncoder {
    /// Create an encoder for the given category pair.
    pub fn new(background: impl Into<String>, signal: impl Into<String>) -> Self {
        Self {
            background: background.into(),
            signal: signal.into(),
        }
    }

    /// Encode a string label column into a `UInt32` series of 0/1 codes.
    ///
    /// # Errors
    ///
    /// [`PreprocessingError::UnknownCategory`] on any value outside the
    /// two configured categories, or on a null label.
    pub fn encode(&self, series: &Series) -> Result<Series> {
        let strings = series.cast(&DataType::String)?;
        let ca = strings.str()?;

        let mut codes: Vec<u32> = Vec::with_capacity(ca.len());
        for value in ca.into_iter() {
            match value {
                Some(v) if v == self.background => codes.push(0),
                Some(v) if v == self.signal => codes.push(1),
                other => {
                    return Err(PreprocessingError::UnknownCategory {
                        column: series.name().to_string(),
                        value: other.unwrap_or("<missing>").to_string(),
                    });
                }
            }
        }

        Ok(Series::new(series.name().clone(), codes))
    }

    /// The category behind a code, for reporting.
    pub fn decode(&self, code: u32) -> Option<&str> {
        match code {
            0 => Some(self.background.as_str()),
            1 => Some(self.signal.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_maps_categories() {
        let encoder = LabelEncoder::new("b", "s");
        let labels = Series::new("Label".into(), &["b", "s", "s", "b"]);

        let encoded = encoder.encode(&labels).unwrap();
        assert!(matches!(encoded.dtype(), DataType::UInt32));

        let codes: Vec<u32> = encoded.u32().unwrap().into_iter().flatten().collect();
        assert_eq!(codes, vec![0, 1, 1, 0]);
    }

    #[test]
    fn test_encode_fails_on_unknown_value() {
        let encoder = LabelEncoder::new("b", "s");
        let labels = Series::new("Label".into(), &["b", "x"]);

        let err = encoder.encode(&labels).unwrap_err();
        assert!(matches!(
            err,
            PreprocessingError::UnknownCategory { column, value }
                if column == "Label" && value == "x"
        ));
    }

    #[test]
    fn test_encode_fails_on_null_label() {
        let encoder = LabelEncoder::new("b", "s");
        let labels = Series::new("Label".into(), &[Some("b"), None]);

        let err = encoder.encode(&labels).unwrap_err();
        assert!(matches!(
            err,
            PreprocessingError::UnknownCategory { value, .. } if value == "<missing>"
        ));
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let encoder = LabelEncoder::new("b", "s");
        assert_eq!(encoder.decode(0), Some("b"));
        assert_eq!(encoder.decode(1), Some("s"));
        assert_eq!(encoder.decode(2), None);
    }

    #[test]
    fn test_encode_with_alternate_categories() {
        let encoder = LabelEncoder::new("background", "higgs");
        let labels = Series::new("Label".into(), &["higgs", "background"]);

        let codes: Vec<u32> = encoder
            .encode(&labels)
            .unwrap()
            .u32()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(codes, vec![1, 0]);
    }
}
