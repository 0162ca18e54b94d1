//! Anomaly detection errors.

use bellwether_frame::FrameError;
use thiserror::Error;

/// Errors that can occur while training or applying an anomaly model
#[derive(Debug, Error)]
pub enum AnomalyError {
    /// Contamination outside (0, 0.5]
    #[error("Invalid contamination: {0} (must be in (0, 0.5])")]
    InvalidContamination(f64),

    /// Invalid model parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// No rows or no feature columns to train on
    #[error("Training data is empty: {rows} rows, {columns} columns")]
    EmptyTrainingSet {
        /// Number of rows
        rows: usize,
        /// Number of feature columns
        columns: usize,
    },

    /// Undefined cell in a feature column
    #[error("Undefined value in feature '{column}' at row {row}")]
    UndefinedValue {
        /// Feature column
        column: String,
        /// Row position
        row: usize,
    },

    /// NaN or infinite feature value
    #[error("Non-finite value in feature data")]
    NonFiniteValue,

    /// Feature count differs from the fitted model
    #[error("Feature count mismatch: model expects {expected}, got {actual}")]
    FeatureCountMismatch {
        /// Features the model was fitted on
        expected: usize,
        /// Features supplied
        actual: usize,
    },

    /// Feature columns differ from the ones the model was trained on
    #[error("Feature mismatch: model was trained on {expected:?}, got {actual:?}")]
    FeatureMismatch {
        /// Training features, in order
        expected: Vec<String>,
        /// Features supplied
        actual: Vec<String>,
    },

    /// Underlying table error
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// Matrix construction error
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}
