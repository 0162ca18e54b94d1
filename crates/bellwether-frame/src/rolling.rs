//! Fixed-window statistics as polars expressions
//!
//! Every window asks for `window` defined cells, so the first `window - 1`
//! rows of a rolling statistic, and any window touching an undefined cell,
//! come out undefined. Evaluate the expressions with
//! [`TimeSeries::evaluate`](crate::TimeSeries::evaluate).

use polars::prelude::{DataType, Expr, NULL, RollingOptionsFixedWindow, lit, when};

/// Window options requiring a full window of defined cells.
pub fn fixed_window(window: usize) -> RollingOptionsFixedWindow {
    RollingOptionsFixedWindow {
        window_size: window,
        min_periods: window,
        ..Default::default()
    }
}

/// An undefined `Float64` cell.
pub fn undefined() -> Expr {
    lit(NULL).cast(DataType::Float64)
}

/// Percentage change from the previous row.
///
/// Undefined for the first row, next to an undefined cell, and where the
/// previous value is zero.
pub fn pct_change(values: Expr) -> Expr {
    let previous = values.clone().shift(lit(1));
    when(previous.clone().eq(lit(0.0)))
        .then(undefined())
        .otherwise(values / previous - lit(1.0))
}

/// Rolling arithmetic mean.
pub fn rolling_mean(values: Expr, window: usize) -> Expr {
    values.rolling_mean(fixed_window(window))
}

/// Whether every cell of the window holds the same value.
pub fn rolling_flat(values: Expr, window: usize) -> Expr {
    (values.clone().rolling_max(fixed_window(window)) - values.rolling_min(fixed_window(window)))
        .eq(lit(0.0))
}

/// Rolling sample standard deviation (ddof 1), exactly zero on a flat window.
pub fn rolling_std(values: Expr, window: usize) -> Expr {
    when(rolling_flat(values.clone(), window))
        .then(lit(0.0))
        .otherwise(values.rolling_std(fixed_window(window)))
}

/// Rolling Pearson correlation of two columns.
///
/// Undefined where either window is flat. Rounding is clamped onto `[-1, 1]`.
pub fn rolling_corr(x: Expr, y: Expr, window: usize) -> Expr {
    let n = window as f64;
    // Sample covariance from rolling first and second moments
    let covariance = (rolling_mean(x.clone() * y.clone(), window)
        - rolling_mean(x.clone(), window) * rolling_mean(y.clone(), window))
        * lit(n / (n - 1.0));
    let deviations = rolling_std(x, window) * rolling_std(y, window);
    let r = covariance / deviations.clone();

    when(deviations.eq(lit(0.0)))
        .then(undefined())
        .when(r.clone().gt(lit(1.0)))
        .then(lit(1.0))
        .when(r.clone().lt(lit(-1.0)))
        .then(lit(-1.0))
        .otherwise(r)
}
