//! Conversion to polars DataFrames and evaluation of polars expressions.

use crate::DATE_COLUMN;
use crate::error::{FrameError, Result};
use crate::frame::{ColumnData, Frame};
use crate::series::TimeSeries;
use polars::prelude::{
    DataFrame, DataType, DateChunked, Expr, IntoColumn, IntoLazy, IntoSeries, LazyFrame,
    NamedFrom, Series, col,
};

const VALUE: &str = "value";
const LEFT: &str = "left";
const RIGHT: &str = "right";

impl Frame {
    /// Convert to a polars `DataFrame` with a leading `date` column.
    ///
    /// Undefined cells become polars nulls.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.width() + 1);
        let dates = DateChunked::from_naive_date(DATE_COLUMN.into(), self.index().iter().copied());
        columns.push(dates.into_series().into_column());

        for column in self.columns() {
            let series = match column.data() {
                ColumnData::Numeric(values) => Series::new(column.name().into(), values),
                ColumnData::Text(values) => Series::new(column.name().into(), values),
            };
            columns.push(series.into_column());
        }

        Ok(DataFrame::new(columns)?)
    }
}

impl TimeSeries {
    /// Evaluate a polars expression over the series values.
    ///
    /// `f` receives the value column and must yield one cell per row. The
    /// result is a new series named `name` on the same index; polars nulls and
    /// NaN become undefined cells.
    pub fn evaluate<F>(&self, name: impl Into<String>, f: F) -> Result<Self>
    where
        F: FnOnce(Expr) -> Expr,
    {
        let df = DataFrame::new(vec![
            Series::new(VALUE.into(), self.values()).into_column(),
        ])?;
        let values = collect_values(df.lazy().select([f(col(VALUE)).alias(VALUE)]))?;
        self.derive(name, values)
    }

    /// Evaluate a polars expression over two series sharing one date index.
    ///
    /// `f` receives this series' values and `other`'s values, in that order.
    pub fn evaluate_pair<F>(&self, other: &Self, name: impl Into<String>, f: F) -> Result<Self>
    where
        F: FnOnce(Expr, Expr) -> Expr,
    {
        if !self.is_aligned_with(other) {
            return Err(FrameError::Misaligned(other.name().to_string()));
        }
        let df = DataFrame::new(vec![
            Series::new(LEFT.into(), self.values()).into_column(),
            Series::new(RIGHT.into(), other.values()).into_column(),
        ])?;
        let values = collect_values(df.lazy().select([f(col(LEFT), col(RIGHT)).alias(VALUE)]))?;
        self.derive(name, values)
    }
}

fn collect_values(lf: LazyFrame) -> Result<Vec<Option<f64>>> {
    let df = lf.collect()?;
    let values = df
        .column(VALUE)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(values
        .f64()?
        .into_iter()
        .map(|cell| cell.filter(|v| !v.is_nan()))
        .collect())
}
