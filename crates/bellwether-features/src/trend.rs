//! Simple moving average, used to detect trend shifts.

use crate::{Feature, FeatureError, check_window, rolling_feature};
use bellwether_frame::{TimeSeries, rolling};
use serde::{Deserialize, Serialize};

/// Configuration for the moving average
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovingAverageConfig {
    /// Rolling window size in periods (default: 20)
    pub window: usize,
}

impl Default for MovingAverageConfig {
    fn default() -> Self {
        Self { window: 20 }
    }
}

/// Rolling arithmetic mean
#[derive(Debug, Default)]
pub struct MovingAverage {
    config: MovingAverageConfig,
}

impl MovingAverage {
    /// Create with the given configuration
    pub const fn new(config: MovingAverageConfig) -> Self {
        Self { config }
    }
}

impl Feature for MovingAverage {
    fn name(&self) -> &str {
        "moving_average"
    }

    fn compute(&self, series: &TimeSeries) -> Result<TimeSeries, FeatureError> {
        moving_average(series, self.config.window)
    }
}

/// Rolling mean of `prices` over `window` rows.
///
/// The first `window - 1` rows are undefined.
pub fn moving_average(prices: &TimeSeries, window: usize) -> Result<TimeSeries, FeatureError> {
    check_window(window, 1)?;
    rolling_feature(prices, "moving_average", window, |x| {
        rolling::rolling_mean(x, window)
    })
}
