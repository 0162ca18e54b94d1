//! Date-indexed series
//!
//! A `TimeSeries` is the unit every feature consumes and produces: prices,
//! single economic indicators, and derived signals like volatility.

use crate::error::{FrameError, Result, validate_index};
use chrono::NaiveDate;
use serde::Serialize;

/// A named sequence of `(date, value)` observations.
///
/// Dates are strictly ascending. A `None` value is an undefined cell, for
/// example the warm-up rows of a rolling statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    name: String,
    dates: Vec<NaiveDate>,
    values: Vec<Option<f64>>,
}

impl TimeSeries {
    /// Create a series, validating the index and the value count.
    pub fn new(
        name: impl Into<String>,
        dates: Vec<NaiveDate>,
        values: Vec<Option<f64>>,
    ) -> Result<Self> {
        let name = name.into();
        if dates.len() != values.len() {
            return Err(FrameError::LengthMismatch {
                column: name,
                index: dates.len(),
                values: values.len(),
            });
        }
        validate_index(&dates)?;
        Ok(Self {
            name,
            dates,
            values,
        })
    }

    /// Create a fully defined series from `(date, value)` pairs.
    pub fn from_observations<I>(name: impl Into<String>, observations: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let (dates, values): (Vec<_>, Vec<_>) = observations
            .into_iter()
            .map(|(date, value)| (date, Some(value)))
            .unzip();
        Self::new(name, dates, values)
    }

    /// A new series on the same index with different values.
    ///
    /// Used by transforms that keep the input dates and produce one cell per row.
    pub fn derive(&self, name: impl Into<String>, values: Vec<Option<f64>>) -> Result<Self> {
        let name = name.into();
        if values.len() != self.dates.len() {
            return Err(FrameError::LengthMismatch {
                column: name,
                index: self.dates.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            name,
            dates: self.dates.clone(),
            values,
        })
    }

    /// Rename the series.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Series name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Date index
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Cell values, `None` where undefined
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Number of rows, defined or not
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no rows
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a row, `None` if out of range or undefined.
    pub fn get(&self, row: usize) -> Option<f64> {
        self.values.get(row).copied().flatten()
    }

    /// Value on a date, `None` if the date is absent or the cell undefined.
    pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .and_then(|row| self.get(row))
    }

    /// Number of defined cells
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Whether both series share the same date index.
    pub fn is_aligned_with(&self, other: &Self) -> bool {
        self.dates == other.dates
    }

    /// Iterate over `(date, value)` rows.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Option<f64>)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}
