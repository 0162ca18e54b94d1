//! Min-max normalization onto the common 0-100 scale
//!
//! Indicators arrive on different schedules (daily prices, monthly spreads,
//! quarterly housing data), so gaps are filled before scaling: forward first,
//! then backward for the leading rows.

use crate::RiskError;
use bellwether_frame::{Column, ColumnData, Frame, fill};

/// Lower bound of the normalized scale
pub const SCALE_MIN: f64 = 0.0;

/// Upper bound of the normalized scale
pub const SCALE_MAX: f64 = 100.0;

/// Fill and min-max scale every column of `frame` onto `[0, 100]`.
///
/// A column with a single distinct value maps to 0 everywhere. Fails if the
/// table has no rows, if a column is entirely undefined, holds text, or holds
/// an infinite or NaN cell.
pub fn normalize(frame: &Frame) -> Result<Frame, RiskError> {
    if frame.is_empty() {
        return Err(RiskError::EmptyFrame);
    }

    let mut normalized = Frame::new(frame.index().to_vec())?;
    for column in frame.columns() {
        let ColumnData::Numeric(values) = column.data() else {
            return Err(RiskError::NonNumericColumn(column.name().to_string()));
        };
        let scaled = scale_column(column.name(), values)?;
        normalized = normalized.with_column(Column::numeric(column.name(), scaled))?;
    }
    Ok(normalized)
}

fn scale_column(name: &str, values: &[Option<f64>]) -> Result<Vec<Option<f64>>, RiskError> {
    if let Some(row) = values.iter().position(|v| v.is_some_and(|x| !x.is_finite())) {
        return Err(RiskError::NonFiniteValue {
            column: name.to_string(),
            row,
        });
    }
    let filled = fill::fill_both(values)?;

    let (min, max) = filled
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return Err(RiskError::UndefinedColumn(name.to_string()));
    }

    let range = max - min;
    Ok(filled
        .into_iter()
        .map(|cell| {
            cell.map(|v| {
                if range > 0.0 {
                    (SCALE_MIN + (v - min) / range * (SCALE_MAX - SCALE_MIN))
                        .clamp(SCALE_MIN, SCALE_MAX)
                } else {
                    SCALE_MIN
                }
            })
        })
        .collect())
}
