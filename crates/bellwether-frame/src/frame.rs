//! Date-indexed tables
//!
//! A `Frame` holds a strictly ascending date index and a list of named
//! columns, each with exactly one cell per index row. Feature tables,
//! labeled tables and indicator tables are all frames.

use crate::error::{FrameError, Result, validate_index};
use crate::series::TimeSeries;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Cells of a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Numeric cells, `None` where undefined
    Numeric(Vec<Option<f64>>),
    /// Categorical text cells, `None` where undefined
    Text(Vec<Option<String>>),
}

impl ColumnData {
    /// Number of cells
    pub const fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Text(values) => values.len(),
        }
    }

    /// Whether the column has no cells
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric cells, if this is a numeric column
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match self {
            Self::Numeric(values) => Some(values),
            Self::Text(_) => None,
        }
    }

    /// Text cells, if this is a text column
    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match self {
            Self::Numeric(_) => None,
            Self::Text(values) => Some(values),
        }
    }

    /// Whether the cell at `row` holds a value.
    pub fn is_defined(&self, row: usize) -> bool {
        match self {
            Self::Numeric(values) => values.get(row).is_some_and(Option::is_some),
            Self::Text(values) => values.get(row).is_some_and(Option::is_some),
        }
    }

    /// Cell rendered as text, `None` if undefined.
    pub fn render(&self, row: usize) -> Option<String> {
        match self {
            Self::Numeric(values) => values.get(row).copied().flatten().map(|v| v.to_string()),
            Self::Text(values) => values.get(row).cloned().flatten(),
        }
    }

    fn take(&self, rows: &[usize]) -> Self {
        match self {
            Self::Numeric(values) => Self::Numeric(rows.iter().map(|&r| values[r]).collect()),
            Self::Text(values) => Self::Text(rows.iter().map(|&r| values[r].clone()).collect()),
        }
    }
}

/// A named column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Create a column from raw cells
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Create a numeric column
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values))
    }

    /// Create a text column
    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self::new(name, ColumnData::Text(values))
    }

    /// Column name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column cells
    pub const fn data(&self) -> &ColumnData {
        &self.data
    }
}

/// A date-indexed table of named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    index: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl Frame {
    /// Create an empty table over a date index.
    pub fn new(index: Vec<NaiveDate>) -> Result<Self> {
        validate_index(&index)?;
        Ok(Self {
            index,
            columns: Vec::new(),
        })
    }

    /// Outer-join several series into one table.
    ///
    /// The index is the sorted union of all series dates; dates missing from a
    /// series become undefined cells in its column.
    pub fn from_series(series: &[TimeSeries]) -> Result<Self> {
        let index: Vec<NaiveDate> = series
            .iter()
            .flat_map(|s| s.dates().iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut frame = Self {
            index,
            columns: Vec::with_capacity(series.len()),
        };
        for s in series {
            let values = if s.dates() == frame.index.as_slice() {
                s.values().to_vec()
            } else {
                frame.index.iter().map(|&d| s.value_at(d)).collect()
            };
            frame = frame.with_column(Column::numeric(s.name(), values))?;
        }
        Ok(frame)
    }

    /// Date index
    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    /// Number of rows
    pub const fn height(&self) -> usize {
        self.index.len()
    }

    /// Number of columns
    pub const fn width(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no rows
    pub const fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// All columns, in insertion order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names, in insertion order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Names of the numeric columns, in insertion order
    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| matches!(c.data, ColumnData::Numeric(_)))
            .map(Column::name)
            .collect()
    }

    /// Whether a column exists
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| FrameError::ColumnNotFound(name.to_string()))
    }

    /// Numeric cells of a column.
    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>]> {
        self.column(name)?
            .data
            .as_numeric()
            .ok_or_else(|| FrameError::NotNumeric(name.to_string()))
    }

    /// A numeric column as a series over the table index.
    pub fn series(&self, name: &str) -> Result<TimeSeries> {
        let values = self.numeric(name)?.to_vec();
        TimeSeries::new(name, self.index.clone(), values)
    }

    /// Add a column, replacing any existing column of the same name.
    pub fn with_column(mut self, column: Column) -> Result<Self> {
        if column.data.len() != self.index.len() {
            return Err(FrameError::LengthMismatch {
                column: column.name,
                index: self.index.len(),
                values: column.data.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(self)
    }

    /// Add a series as a numeric column. The series must share the table index.
    pub fn with_series(self, series: &TimeSeries) -> Result<Self> {
        if series.dates() != self.index.as_slice() {
            return Err(FrameError::Misaligned(series.name().to_string()));
        }
        self.with_column(Column::numeric(series.name(), series.values().to_vec()))
    }

    /// Project onto the named columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        let mut seen = BTreeSet::new();
        let mut columns = Vec::with_capacity(names.len());
        for &name in names {
            if !seen.insert(name) {
                return Err(FrameError::DuplicateColumn(name.to_string()));
            }
            columns.push(self.column(name)?.clone());
        }
        Ok(Self {
            index: self.index.clone(),
            columns,
        })
    }

    /// Row positions where every named column is defined.
    pub fn defined_rows(&self, names: &[&str]) -> Result<Vec<usize>> {
        let columns = names
            .iter()
            .map(|&name| self.column(name))
            .collect::<Result<Vec<_>>>()?;
        Ok((0..self.height())
            .filter(|&row| columns.iter().all(|c| c.data.is_defined(row)))
            .collect())
    }

    /// Keep only rows where every named column is defined.
    pub fn drop_undefined(&self, names: &[&str]) -> Result<Self> {
        let rows = self.defined_rows(names)?;
        Ok(self.take_rows(&rows))
    }

    /// Keep only the given row positions, which must be ascending and in range.
    pub fn take_rows(&self, rows: &[usize]) -> Self {
        Self {
            index: rows.iter().map(|&r| self.index[r]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.data.take(rows)))
                .collect(),
        }
    }
}
