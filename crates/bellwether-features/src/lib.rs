#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bellwether-risk/bellwether/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod correlation;
pub mod error;
pub mod housing;
pub mod returns;
pub mod trend;
pub mod volatility;
pub mod zscore;

use bellwether_frame::TimeSeries;
use polars::prelude::Expr;

pub use correlation::{CorrelationConfig, rolling_correlation};
pub use error::FeatureError;
pub use housing::{loan_to_value_ratio, price_to_income_ratio};
pub use returns::pct_change;
pub use trend::{MovingAverage, MovingAverageConfig, moving_average};
pub use volatility::{VolatilityConfig, VolatilityIndex, volatility_index};
pub use zscore::{ZScore, ZScoreConfig, z_score};

/// A single-series feature.
///
/// Implementations are pure: the output depends only on the input series and
/// the feature's configuration, and has one cell per input row.
pub trait Feature {
    /// Name of the produced column
    fn name(&self) -> &str;

    /// Compute the feature over a series.
    fn compute(&self, series: &TimeSeries) -> Result<TimeSeries, FeatureError>;
}

/// Reject windows shorter than `min`.
pub(crate) const fn check_window(window: usize, min: usize) -> Result<(), FeatureError> {
    if window < min {
        return Err(FeatureError::InvalidWindow { window, min });
    }
    Ok(())
}

/// Evaluate a rolling expression, skipping polars when no window fits.
pub(crate) fn rolling_feature<F>(
    series: &TimeSeries,
    name: &str,
    window: usize,
    f: F,
) -> Result<TimeSeries, FeatureError>
where
    F: FnOnce(Expr) -> Expr,
{
    if window > series.len() {
        return Ok(series.derive(name, vec![None; series.len()])?);
    }
    Ok(series.evaluate(name, f)?)
}
