//! Error types for table operations.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, FrameError>;

/// Errors that can occur while building or reshaping series and tables.
#[derive(Debug, Error)]
pub enum FrameError {
    /// A column does not have one cell per index row
    #[error("Length mismatch for '{column}': index has {index} rows, column has {values}")]
    LengthMismatch {
        /// Column being inserted
        column: String,
        /// Number of rows in the index
        index: usize,
        /// Number of cells supplied
        values: usize,
    },

    /// The date index is not ascending
    #[error("Date index is not ascending: {current} follows {previous}")]
    UnsortedIndex {
        /// Date at the earlier position
        previous: NaiveDate,
        /// Date at the later position
        current: NaiveDate,
    },

    /// The same date appears twice in an index
    #[error("Duplicate date in index: {0}")]
    DuplicateDate(NaiveDate),

    /// A series does not share the table's date index
    #[error("Series '{0}' is not aligned with the table index")]
    Misaligned(String),

    /// Column lookup failed
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Two columns with the same name
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// A numeric operation was asked for a text column
    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),

    /// Polars conversion error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

/// Check that dates are strictly ascending.
pub(crate) fn validate_index(dates: &[NaiveDate]) -> Result<()> {
    for pair in dates.windows(2) {
        let (previous, current) = (pair[0], pair[1]);
        if current == previous {
            return Err(FrameError::DuplicateDate(current));
        }
        if current < previous {
            return Err(FrameError::UnsortedIndex { previous, current });
        }
    }
    Ok(())
}
