//! Validated indicator weights
//!
//! Weights are read from a JSON object mapping indicator name to a
//! non-negative weight, e.g. `{"volatility": 2.0, "cds_spread": 1.0}`.
//! Validation happens on construction, so a held `IndicatorWeights` is always
//! non-empty, finite, non-negative, and has a positive total.

use crate::RiskError;
use bellwether_frame::{ColumnData, Frame};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-indicator weights for the risk index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct IndicatorWeights {
    weights: BTreeMap<String, f64>,
}

impl IndicatorWeights {
    /// Build weights from `(indicator, weight)` pairs.
    ///
    /// # Errors
    /// Rejects an empty list, a repeated indicator, a negative or non-finite
    /// weight, and weights that sum to zero.
    pub fn new<I, S>(pairs: I) -> Result<Self, RiskError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut weights = BTreeMap::new();
        for (name, weight) in pairs {
            let name = name.into();
            if weights.contains_key(&name) {
                return Err(RiskError::DuplicateIndicator(name));
            }
            weights.insert(name, weight);
        }
        Self::try_from(weights)
    }

    /// Weight 1.0 for each named indicator.
    pub fn equal<I, S>(names: I) -> Result<Self, RiskError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(|name| (name, 1.0)))
    }

    /// Weight for an indicator, if it has one
    pub fn get(&self, indicator: &str) -> Option<f64> {
        self.weights.get(indicator).copied()
    }

    /// Weighted indicator names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    /// Number of weighted indicators
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether no indicator is weighted
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of all weights
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Strict schema check against a table.
    ///
    /// Every weighted indicator must be a numeric column of `frame`, and every
    /// numeric column must carry a weight.
    pub fn validate_columns(&self, frame: &Frame) -> Result<(), RiskError> {
        for name in self.names() {
            let column = frame
                .column(name)
                .map_err(|_| RiskError::UnknownIndicator(name.to_string()))?;
            if !matches!(column.data(), ColumnData::Numeric(_)) {
                return Err(RiskError::NonNumericColumn(name.to_string()));
            }
        }
        if let Some(missing) = frame
            .numeric_column_names()
            .into_iter()
            .find(|name| !self.weights.contains_key(*name))
        {
            return Err(RiskError::MissingWeight(missing.to_string()));
        }
        Ok(())
    }
}

impl TryFrom<BTreeMap<String, f64>> for IndicatorWeights {
    type Error = RiskError;

    fn try_from(weights: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        if weights.is_empty() {
            return Err(RiskError::EmptyWeights);
        }
        if let Some((name, &weight)) = weights
            .iter()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(RiskError::InvalidWeight {
                indicator: name.clone(),
                weight,
            });
        }
        if weights.values().sum::<f64>() <= 0.0 {
            return Err(RiskError::ZeroTotalWeight);
        }
        Ok(Self { weights })
    }
}

impl From<IndicatorWeights> for BTreeMap<String, f64> {
    fn from(weights: IndicatorWeights) -> Self {
        weights.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bellwether_frame::Column;
    use chrono::NaiveDate;
    use rstest::rstest;

    #[test]
    fn test_deserialize_from_json_object() {
        let weights: IndicatorWeights =
            serde_json::from_str(r#"{"volatility": 2.0, "cds_spread": 1.0}"#).unwrap();
        assert_eq!(weights.get("volatility"), Some(2.0));
        assert_eq!(weights.get("cds_spread"), Some(1.0));
        assert_eq!(weights.get("vix"), None);
        assert_eq!(weights.total(), 3.0);
        assert_eq!(
            weights.names().collect::<Vec<_>>(),
            vec!["cds_spread", "volatility"]
        );
    }

    #[rstest]
    #[case(r#"{}"#)]
    #[case(r#"{"vix": -1.0}"#)]
    #[case(r#"{"vix": 0.0, "ltv": 0.0}"#)]
    #[case(r#"{"vix": "high"}"#)]
    #[case(r#"["vix"]"#)]
    fn test_invalid_json_is_rejected(#[case] json: &str) {
        assert!(serde_json::from_str::<IndicatorWeights>(json).is_err());
    }

    #[test]
    fn test_constructor_errors() {
        assert!(matches!(
            IndicatorWeights::new(Vec::<(String, f64)>::new()),
            Err(RiskError::EmptyWeights)
        ));
        assert!(matches!(
            IndicatorWeights::new([("vix", 1.0), ("vix", 2.0)]),
            Err(RiskError::DuplicateIndicator(_))
        ));
        assert!(matches!(
            IndicatorWeights::new([("vix", f64::NAN)]),
            Err(RiskError::InvalidWeight { .. })
        ));
        assert!(matches!(
            IndicatorWeights::new([("vix", 0.0)]),
            Err(RiskError::ZeroTotalWeight)
        ));
    }

    #[test]
    fn test_zero_weight_allowed_when_total_positive() {
        let weights = IndicatorWeights::new([("vix", 0.0), ("ltv", 1.0)]).unwrap();
        assert_eq!(weights.len(), 2);
    }

    #[test]
    fn test_json_roundtrip_keeps_mapping() {
        let weights = IndicatorWeights::new([("vix", 0.5), ("ltv", 1.5)]).unwrap();
        let json = serde_json::to_string(&weights).unwrap();
        assert_eq!(json, r#"{"ltv":1.5,"vix":0.5}"#);
    }

    fn indicator_frame() -> Frame {
        let index = (1..=2)
            .map(|d| NaiveDate::from_ymd_opt(2020, 6, d).unwrap())
            .collect();
        Frame::new(index)
            .unwrap()
            .with_column(Column::numeric("vix", vec![Some(20.0), Some(30.0)]))
            .unwrap()
            .with_column(Column::numeric("ltv", vec![Some(0.7), Some(0.8)]))
            .unwrap()
            .with_column(Column::text("region", vec![None, None]))
            .unwrap()
    }

    #[test]
    fn test_validate_columns() {
        let frame = indicator_frame();

        assert!(
            IndicatorWeights::equal(["vix", "ltv"])
                .unwrap()
                .validate_columns(&frame)
                .is_ok()
        );
        assert!(matches!(
            IndicatorWeights::equal(["vix", "ltv", "cpi"])
                .unwrap()
                .validate_columns(&frame),
            Err(RiskError::UnknownIndicator(name)) if name == "cpi"
        ));
        assert!(matches!(
            IndicatorWeights::equal(["vix"]).unwrap().validate_columns(&frame),
            Err(RiskError::MissingWeight(name)) if name == "ltv"
        ));
        assert!(matches!(
            IndicatorWeights::equal(["vix", "ltv", "region"])
                .unwrap()
                .validate_columns(&frame),
            Err(RiskError::NonNumericColumn(_))
        ));
    }
}
