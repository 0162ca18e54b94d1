//! Volatility Index
//!
//! Measures market uncertainty as the rolling standard deviation of returns,
//! scaled by the square root of the window length.

use crate::{Feature, FeatureError, check_window, rolling_feature};
use bellwether_frame::{TimeSeries, rolling};
use polars::prelude::lit;
use serde::{Deserialize, Serialize};

/// Configuration for the volatility index
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityConfig {
    /// Rolling window size in periods (default: 30)
    pub window: usize,
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        Self { window: 30 }
    }
}

/// Rolling volatility of period returns
#[derive(Debug, Default)]
pub struct VolatilityIndex {
    config: VolatilityConfig,
}

impl VolatilityIndex {
    /// Create with the given configuration
    pub const fn new(config: VolatilityConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub const fn config(&self) -> &VolatilityConfig {
        &self.config
    }
}

impl Feature for VolatilityIndex {
    fn name(&self) -> &str {
        "volatility"
    }

    fn compute(&self, series: &TimeSeries) -> Result<TimeSeries, FeatureError> {
        volatility_index(series, self.config.window)
    }
}

/// Rolling volatility of `prices`.
///
/// Returns are undefined for the first row and the rolling deviation needs
/// `window` returns, so the first `window` rows of the output are undefined.
/// `window` must be at least 2.
pub fn volatility_index(prices: &TimeSeries, window: usize) -> Result<TimeSeries, FeatureError> {
    check_window(window, 2)?;

    let scale = (window as f64).sqrt();
    rolling_feature(prices, "volatility", window, |x| {
        rolling::rolling_std(rolling::pct_change(x), window) * lit(scale)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn prices(values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        TimeSeries::from_observations(
            "close",
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| (start + chrono::Days::new(i as u64), v)),
        )
        .unwrap()
    }

    #[test]
    fn test_config_default() {
        assert_eq!(VolatilityConfig::default().window, 30);
        assert_eq!(VolatilityIndex::default().name(), "volatility");
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    #[case(5)]
    #[case(8)]
    fn test_undefined_prefix_then_non_negative(#[case] window: usize) {
        let series = prices(&[10.0, 10.5, 10.2, 11.0, 10.8, 10.9, 11.4, 11.1, 12.0]);
        let vol = volatility_index(&series, window).unwrap();

        assert_eq!(vol.len(), series.len());
        assert!(vol.values()[..window].iter().all(Option::is_none));
        for value in &vol.values()[window..] {
            let v = value.expect("defined after warm-up");
            assert!(v >= 0.0);
        }
    }

    #[test]
    fn test_window_two_is_absolute_return_difference() {
        // With two returns, sd * sqrt(2) = |r1 - r0|
        let series = prices(&[100.0, 102.0, 101.0, 150.0, 99.0, 98.0]);
        let vol = volatility_index(&series, 2).unwrap();

        let r: [f64; 4] = [0.02, 101.0 / 102.0 - 1.0, 150.0 / 101.0 - 1.0, 99.0 / 150.0 - 1.0];
        assert_eq!(vol.get(0), None);
        assert_eq!(vol.get(1), None);
        assert_relative_eq!(vol.get(2).unwrap(), (r[1] - r[0]).abs(), epsilon = 1e-10);
        assert_relative_eq!(vol.get(3).unwrap(), (r[2] - r[1]).abs(), epsilon = 1e-10);
        assert_relative_eq!(vol.get(4).unwrap(), (r[3] - r[2]).abs(), epsilon = 1e-10);
    }

    #[test]
    fn test_constant_prices_have_zero_volatility() {
        let vol = volatility_index(&prices(&[5.0; 6]), 3).unwrap();
        assert_eq!(vol.values()[3..], [Some(0.0), Some(0.0), Some(0.0)]);
    }

    #[test]
    fn test_invalid_window() {
        let series = prices(&[1.0, 2.0, 3.0]);
        assert!(matches!(
            volatility_index(&series, 1),
            Err(FeatureError::InvalidWindow { window: 1, min: 2 })
        ));
        assert!(volatility_index(&series, 0).is_err());
    }

    #[test]
    fn test_window_longer_than_series() {
        let vol = volatility_index(&prices(&[1.0, 2.0, 3.0]), 10).unwrap();
        assert_eq!(vol.defined_count(), 0);
    }
}
