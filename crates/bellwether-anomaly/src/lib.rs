#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bellwether-risk/bellwether/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod isolation_forest;
pub mod labeling;

pub use error::AnomalyError;
pub use isolation_forest::{IsolationForest, IsolationForestConfig};
pub use labeling::{
    DEFAULT_ANOMALY_COLUMN, Detection, TrainedModel, anomaly_labels, append_anomaly_column,
    detect, train,
};

use ndarray::Array2;

/// Seed used when no other seed is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Label assigned to a row by an anomaly detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnomalyLabel {
    /// Outlying row, encoded as -1
    Anomaly,
    /// Inlying row, encoded as +1
    Normal,
}

impl AnomalyLabel {
    /// Numeric encoding: -1 for anomalies, +1 for normal rows.
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Anomaly => -1.0,
            Self::Normal => 1.0,
        }
    }

    /// Decode a numeric label cell.
    pub fn from_value(value: f64) -> Option<Self> {
        if value == -1.0 {
            Some(Self::Anomaly)
        } else if value == 1.0 {
            Some(Self::Normal)
        } else {
            None
        }
    }

    /// Whether this is an anomaly
    pub const fn is_anomaly(self) -> bool {
        matches!(self, Self::Anomaly)
    }
}

/// Trait for fitted anomaly detectors over row-major feature matrices
pub trait AnomalyDetector {
    /// Number of feature columns the detector was fitted on
    fn n_features(&self) -> usize;

    /// Score each row; higher scores are more anomalous.
    ///
    /// # Arguments
    /// * `data` - Matrix where each row is an observation and each column a feature
    fn score_samples(&self, data: &Array2<f64>) -> Result<Vec<f64>, AnomalyError>;

    /// Scores strictly above this value are anomalies
    fn threshold(&self) -> f64;

    /// Label each row of `data`.
    fn predict(&self, data: &Array2<f64>) -> Result<Vec<AnomalyLabel>, AnomalyError> {
        let threshold = self.threshold();
        Ok(self
            .score_samples(data)?
            .into_iter()
            .map(|score| {
                if score > threshold {
                    AnomalyLabel::Anomaly
                } else {
                    AnomalyLabel::Normal
                }
            })
            .collect())
    }
}
