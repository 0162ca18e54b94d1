//! Period-over-period returns.

use crate::FeatureError;
use bellwether_frame::{TimeSeries, rolling};

/// Percentage change from the previous row.
///
/// Undefined for the first row, wherever either neighbour is undefined, and
/// where the previous value is zero.
pub fn pct_change(series: &TimeSeries) -> Result<TimeSeries, FeatureError> {
    Ok(series.evaluate("returns", rolling::pct_change)?)
}
