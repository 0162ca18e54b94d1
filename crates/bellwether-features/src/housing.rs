//! Housing indicators
//!
//! Affordability and leverage ratios built from two aligned series, usually
//! economic series outer-joined into one table first.

use crate::FeatureError;
use bellwether_frame::TimeSeries;

/// Median home price over median household income.
pub fn price_to_income_ratio(
    house_prices: &TimeSeries,
    incomes: &TimeSeries,
) -> Result<TimeSeries, FeatureError> {
    ratio(house_prices, incomes, "price_to_income_ratio")
}

/// Outstanding mortgage debt over property value.
pub fn loan_to_value_ratio(
    total_loans: &TimeSeries,
    property_values: &TimeSeries,
) -> Result<TimeSeries, FeatureError> {
    ratio(total_loans, property_values, "loan_to_value_ratio")
}

/// Element-wise quotient; undefined where either side is undefined or the
/// denominator is zero.
fn ratio(
    numerator: &TimeSeries,
    denominator: &TimeSeries,
    name: &str,
) -> Result<TimeSeries, FeatureError> {
    if !numerator.is_aligned_with(denominator) {
        return Err(FeatureError::Misaligned {
            left: numerator.name().to_string(),
            right: denominator.name().to_string(),
        });
    }

    let values = numerator
        .values()
        .iter()
        .zip(denominator.values())
        .map(|pair| match pair {
            (Some(n), Some(d)) if *d != 0.0 => Some(n / d),
            _ => None,
        })
        .collect();

    Ok(numerator.derive(name, values)?)
}
