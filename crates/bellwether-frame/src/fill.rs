//! Forward and backward filling of undefined cells.

use crate::error::Result;
use polars::prelude::{FillNullStrategy, NamedFrom, Series};

fn fill<I>(values: &[Option<f64>], strategies: I) -> Result<Vec<Option<f64>>>
where
    I: IntoIterator<Item = FillNullStrategy>,
{
    let mut series = Series::new("values".into(), values);
    for strategy in strategies {
        series = series.fill_null(strategy)?;
    }
    Ok(series.f64()?.into_iter().collect())
}

/// Carry the last defined value forward over undefined cells.
///
/// Leading undefined cells stay undefined.
pub fn forward_fill(values: &[Option<f64>]) -> Result<Vec<Option<f64>>> {
    fill(values, [FillNullStrategy::Forward(None)])
}

/// Carry the next defined value backward over undefined cells.
///
/// Trailing undefined cells stay undefined.
pub fn backward_fill(values: &[Option<f64>]) -> Result<Vec<Option<f64>>> {
    fill(values, [FillNullStrategy::Backward(None)])
}

/// Forward fill, then backward fill.
///
/// The result is fully defined whenever at least one input cell is defined.
pub fn fill_both(values: &[Option<f64>]) -> Result<Vec<Option<f64>>> {
    fill(
        values,
        [FillNullStrategy::Forward(None), FillNullStrategy::Backward(None)],
    )
}
