//! Rolling Z-score
//!
//! Standardizes each value against the mean and sample deviation of the
//! window ending at that row.

use crate::{Feature, FeatureError, check_window, rolling_feature};
use bellwether_frame::{TimeSeries, rolling};
use polars::prelude::{lit, when};
use serde::{Deserialize, Serialize};

/// Configuration for the rolling Z-score
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZScoreConfig {
    /// Rolling window size in periods (default: 30)
    pub window: usize,
}

impl Default for ZScoreConfig {
    fn default() -> Self {
        Self { window: 30 }
    }
}

/// Rolling Z-score feature
#[derive(Debug, Default)]
pub struct ZScore {
    config: ZScoreConfig,
}

impl ZScore {
    /// Create with the given configuration
    pub const fn new(config: ZScoreConfig) -> Self {
        Self { config }
    }
}

impl Feature for ZScore {
    fn name(&self) -> &str {
        "z_score"
    }

    fn compute(&self, series: &TimeSeries) -> Result<TimeSeries, FeatureError> {
        z_score(series, self.config.window)
    }
}

/// `(x - rolling_mean) / rolling_std` over `window` rows.
///
/// Undefined during warm-up and wherever the window's standard deviation is
/// exactly zero; a flat window never produces an infinite score.
pub fn z_score(series: &TimeSeries, window: usize) -> Result<TimeSeries, FeatureError> {
    check_window(window, 2)?;

    rolling_feature(series, "z_score", window, |x| {
        let mean = rolling::rolling_mean(x.clone(), window);
        let sd = rolling::rolling_std(x.clone(), window);
        when(sd.clone().eq(lit(0.0)))
            .then(rolling::undefined())
            .otherwise((x - mean) / sd)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        TimeSeries::from_observations(
            "spread",
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| (start + chrono::Days::new(i as u64), v)),
        )
        .unwrap()
    }

    #[test]
    fn test_z_score_values() {
        let z = z_score(&series(&[1.0, 2.0, 3.0, 10.0]), 3).unwrap();
        assert_eq!(z.get(0), None);
        assert_eq!(z.get(1), None);
        // Window [1, 2, 3]: mean 2, sd 1
        assert_relative_eq!(z.get(2).unwrap(), 1.0, epsilon = 1e-10);
        // Window [2, 3, 10]: mean 5, sd sqrt(19)
        assert_relative_eq!(z.get(3).unwrap(), 5.0 / 19.0_f64.sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn test_flat_window_is_undefined() {
        let z = z_score(&series(&[4.0, 4.0, 4.0, 5.0]), 3).unwrap();
        assert_eq!(z.get(2), None);
        assert!(z.get(3).is_some());
    }

    #[test]
    fn test_flat_non_dyadic_window_is_undefined() {
        let z = z_score(&series(&[0.1, 0.1, 0.1]), 3).unwrap();
        assert_eq!(z.get(2), None);

        let z = z_score(&series(&[0.3, 0.1, 0.1, 0.1, 0.2]), 3).unwrap();
        assert!(z.get(2).is_some());
        assert_eq!(z.get(3), None);
        assert!(z.get(4).is_some());
    }

    #[test]
    fn test_window_too_small() {
        assert!(z_score(&series(&[1.0, 2.0]), 1).is_err());
    }
}
