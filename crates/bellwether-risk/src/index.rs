//! Weighted market risk index

use crate::category::categorize_risk;
use crate::normalize::{SCALE_MAX, SCALE_MIN, normalize};
use crate::{IndicatorWeights, RiskError};
use bellwether_frame::{Column, Frame, TimeSeries};
use tracing::{debug, warn};

/// Name of the risk score series and column
pub const RISK_SCORE_COLUMN: &str = "market_risk_score";

/// Name of the risk category column
pub const RISK_CATEGORY_COLUMN: &str = "risk_category";

/// Weighted mean of the normalized indicators, per row, on `[0, 100]`.
///
/// Only columns that carry a weight take part; weighted names absent from the
/// table are ignored with a warning. Without `weights` every numeric column
/// except a previous `market_risk_score` gets weight 1.0.
///
/// # Errors
/// - [`RiskError::NoMatchingColumns`] if no weighted indicator is in the table
/// - [`RiskError::ZeroTotalWeight`] if the matching weights sum to zero
/// - any error from [`normalize`]
pub fn compute_weighted_risk_index(
    frame: &Frame,
    weights: Option<&IndicatorWeights>,
) -> Result<TimeSeries, RiskError> {
    let selected = weighted_columns(frame, weights);
    if selected.is_empty() {
        return Err(RiskError::NoMatchingColumns {
            weights: weights
                .map(|w| w.names().map(str::to_string).collect())
                .unwrap_or_default(),
            columns: frame
                .numeric_column_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        });
    }

    let total: f64 = selected.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return Err(RiskError::ZeroTotalWeight);
    }

    let names: Vec<&str> = selected.iter().map(|(name, _)| *name).collect();
    let normalized = normalize(&frame.select(&names)?)?;
    let columns = names
        .iter()
        .map(|&name| normalized.numeric(name))
        .collect::<Result<Vec<_>, _>>()?;

    let scores = (0..frame.height())
        .map(|row| {
            let weighted: f64 = columns
                .iter()
                .zip(&selected)
                .map(|(values, (_, weight))| values[row].unwrap_or(SCALE_MIN) * weight)
                .sum();
            Some((weighted / total).clamp(SCALE_MIN, SCALE_MAX))
        })
        .collect();

    debug!(
        indicators = ?names,
        total_weight = total,
        rows = frame.height(),
        "computed weighted risk index"
    );

    Ok(TimeSeries::new(
        RISK_SCORE_COLUMN,
        frame.index().to_vec(),
        scores,
    )?)
}

/// Copy of `frame` with the risk score and its category appended.
pub fn attach_risk_score(
    frame: &Frame,
    weights: Option<&IndicatorWeights>,
) -> Result<Frame, RiskError> {
    let score = compute_weighted_risk_index(frame, weights)?;
    let categories = score
        .values()
        .iter()
        .map(|cell| cell.map(|s| categorize_risk(s).to_string()))
        .collect();

    Ok(frame
        .clone()
        .with_series(&score)?
        .with_column(Column::text(RISK_CATEGORY_COLUMN, categories))?)
}

/// Columns taking part in the index with their weights, in table order.
fn weighted_columns<'a>(
    frame: &'a Frame,
    weights: Option<&IndicatorWeights>,
) -> Vec<(&'a str, f64)> {
    match weights {
        None => frame
            .numeric_column_names()
            .into_iter()
            .filter(|&name| name != RISK_SCORE_COLUMN)
            .map(|name| (name, 1.0))
            .collect(),
        Some(weights) => {
            for ignored in weights.names().filter(|name| !frame.contains(name)) {
                warn!(indicator = ignored, "weighted indicator not in table, ignoring");
            }
            frame
                .column_names()
                .into_iter()
                .filter_map(|name| weights.get(name).map(|w| (name, w)))
                .collect()
        }
    }
}
