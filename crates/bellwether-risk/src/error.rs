//! Risk aggregation errors.

use bellwether_frame::FrameError;
use thiserror::Error;

/// Errors that can occur while normalizing indicators or building the risk index
#[derive(Debug, Error)]
pub enum RiskError {
    /// Table has no rows to normalize
    #[error("Cannot normalize a table with no rows")]
    EmptyFrame,

    /// Every cell of a column is undefined
    #[error("Column '{0}' has no defined values")]
    UndefinedColumn(String),

    /// Infinite or NaN cell in an indicator column
    #[error("Column '{column}' holds a non-finite value at row {row}")]
    NonFiniteValue {
        /// Indicator column
        column: String,
        /// Row position
        row: usize,
    },

    /// Indicator column holds text
    #[error("Column '{0}' is not numeric")]
    NonNumericColumn(String),

    /// No weighted indicator is present in the table
    #[error("No weighted indicator matches the table columns (weights: {weights:?}, columns: {columns:?})")]
    NoMatchingColumns {
        /// Indicators that carry a weight
        weights: Vec<String>,
        /// Numeric columns in the table
        columns: Vec<String>,
    },

    /// Weight is negative, NaN or infinite
    #[error("Invalid weight for '{indicator}': {weight}")]
    InvalidWeight {
        /// Indicator name
        indicator: String,
        /// Offending weight
        weight: f64,
    },

    /// Indicator named twice
    #[error("Duplicate indicator weight: {0}")]
    DuplicateIndicator(String),

    /// No weights given
    #[error("Weights must name at least one indicator")]
    EmptyWeights,

    /// Weights sum to zero
    #[error("Weights sum to zero")]
    ZeroTotalWeight,

    /// Weight names a column the table does not have
    #[error("Unknown indicator in weights: {0}")]
    UnknownIndicator(String),

    /// Numeric column without a weight
    #[error("Missing weight for indicator: {0}")]
    MissingWeight(String),

    /// Underlying table error
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),
}
