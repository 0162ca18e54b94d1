//! CSV and JSON loading.
//!
//! Input tables have a header row, one date column (`%Y-%m-%d`) and numeric
//! columns. Empty, `NaN`, `nan` and `null` cells are undefined. Rows are
//! sorted by date on load.

use bellwether::frame::{Column, Frame, FrameError};
use bellwether::risk::IndicatorWeights;
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Error type for file loading.
#[derive(Debug, thiserror::Error)]
pub(crate) enum LoadError {
    /// File could not be opened or read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed weights file.
    #[error("Failed to parse weights: {0}")]
    Json(#[from] serde_json::Error),

    /// Header has no date column.
    #[error("Date column '{0}' not found")]
    MissingDateColumn(String),

    /// Date cell does not parse.
    #[error("Invalid date '{value}' on line {line}")]
    InvalidDate { value: String, line: u64 },

    /// Numeric cell does not parse.
    #[error("Invalid number '{value}' in column '{column}' on line {line}")]
    InvalidNumber {
        value: String,
        column: String,
        line: u64,
    },

    /// Two rows share a date.
    #[error("Duplicate date: {0}")]
    DuplicateDate(NaiveDate),

    /// Table construction failed.
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Load a CSV file into a table indexed by `date_column`.
pub(crate) fn load_frame(path: &Path, date_column: &str) -> Result<Frame, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let frame = read_frame(BufReader::new(file), date_column)?;
    debug!(
        path = %path.display(),
        rows = frame.height(),
        columns = ?frame.column_names(),
        "loaded table"
    );
    Ok(frame)
}

/// Load indicator weights from a JSON object file.
pub(crate) fn load_weights(path: &Path) -> Result<IndicatorWeights, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn read_frame<R: Read>(reader: R, date_column: &str) -> Result<Frame, LoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();

    let date_idx = headers
        .iter()
        .position(|h| h == date_column)
        .ok_or_else(|| LoadError::MissingDateColumn(date_column.to_string()))?;
    let value_columns: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_idx)
        .collect();

    let mut rows: Vec<(NaiveDate, Vec<Option<f64>>)> = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);

        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|_| {
            LoadError::InvalidDate {
                value: raw_date.to_string(),
                line,
            }
        })?;

        let cells = value_columns
            .iter()
            .map(|&(idx, name)| {
                let raw = record.get(idx).unwrap_or_default();
                parse_cell(raw).ok_or_else(|| LoadError::InvalidNumber {
                    value: raw.to_string(),
                    column: name.to_string(),
                    line,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push((date, cells));
    }

    rows.sort_by_key(|(date, _)| *date);
    if let Some(pair) = rows.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(LoadError::DuplicateDate(pair[0].0));
    }

    let index = rows.iter().map(|(date, _)| *date).collect();
    let mut frame = Frame::new(index)?;
    for (position, &(_, name)) in value_columns.iter().enumerate() {
        let values = rows.iter().map(|(_, cells)| cells[position]).collect();
        frame = frame.with_column(Column::numeric(name, values))?;
    }
    Ok(frame)
}

/// `Some(Some(v))` for a finite number, `Some(None)` for an undefined marker,
/// `None` if the cell does not parse or is infinite.
fn parse_cell(raw: &str) -> Option<Option<f64>> {
    match raw {
        "" | "NaN" | "nan" | "null" => Some(None),
        _ => match raw.parse::<f64>() {
            Ok(v) if v.is_nan() => Some(None),
            Ok(v) if v.is_finite() => Some(Some(v)),
            _ => None,
        },
    }
}
