//! Rolling Pearson correlation between two aligned series.

use crate::{FeatureError, check_window};
use bellwether_frame::{TimeSeries, rolling};
use serde::{Deserialize, Serialize};

/// Configuration for rolling correlation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Rolling window size in periods (default: 30)
    pub window: usize,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self { window: 30 }
    }
}

/// Rolling correlation of `series1` against `series2`.
///
/// Both series must share the same date index. Rows are undefined during
/// warm-up, when either window contains an undefined cell, and when either
/// window has zero variance.
pub fn rolling_correlation(
    series1: &TimeSeries,
    series2: &TimeSeries,
    window: usize,
) -> Result<TimeSeries, FeatureError> {
    check_window(window, 2)?;
    if !series1.is_aligned_with(series2) {
        return Err(FeatureError::Misaligned {
            left: series1.name().to_string(),
            right: series2.name().to_string(),
        });
    }

    let name = "rolling_correlation";
    if window > series1.len() {
        return Ok(series1.derive(name, vec![None; series1.len()])?);
    }
    Ok(series1.evaluate_pair(series2, name, |x, y| {
        rolling::rolling_corr(x, y, window)
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(name: &str, start_day: u32, values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2024, 5, start_day).unwrap();
        TimeSeries::from_observations(
            name,
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| (start + chrono::Days::new(i as u64), v)),
        )
        .unwrap()
    }

    #[test]
    fn test_perfect_correlation() {
        let a = series("a", 1, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let b = series("b", 1, &[2.0, 4.0, 6.0, 8.0, 10.0]);
        let corr = rolling_correlation(&a, &b, 3).unwrap();

        assert_eq!(corr.len(), 5);
        assert_eq!(corr.get(1), None);
        for row in 2..5 {
            assert_relative_eq!(corr.get(row).unwrap(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_anti_correlation() {
        let a = series("a", 1, &[1.0, 2.0, 3.0]);
        let b = series("b", 1, &[3.0, 2.0, 1.0]);
        let corr = rolling_correlation(&a, &b, 3).unwrap();
        assert_relative_eq!(corr.get(2).unwrap(), -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_misaligned_index_is_an_error() {
        let a = series("a", 1, &[1.0, 2.0, 3.0]);
        let b = series("b", 2, &[1.0, 2.0, 3.0]);
        assert!(matches!(
            rolling_correlation(&a, &b, 2),
            Err(FeatureError::Misaligned { .. })
        ));
    }

    #[test]
    fn test_gap_in_either_series_leaves_window_undefined() {
        let a = series("a", 1, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let b = TimeSeries::new(
            "b",
            a.dates().to_vec(),
            vec![Some(2.0), None, Some(5.0), Some(9.0), Some(10.0)],
        )
        .unwrap();
        let corr = rolling_correlation(&a, &b, 2).unwrap();
        assert_eq!(corr.get(1), None);
        assert_eq!(corr.get(2), None);
        assert!(corr.get(3).is_some());
    }

    #[test]
    fn test_flat_window_is_undefined() {
        let a = series("a", 1, &[1.0, 1.0, 1.0, 2.0]);
        let b = series("b", 1, &[1.0, 2.0, 3.0, 4.0]);
        let corr = rolling_correlation(&a, &b, 3).unwrap();
        assert_eq!(corr.get(2), None);
        assert!(corr.get(3).is_some());
    }
}
