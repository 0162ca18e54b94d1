//! Training and labeling over feature tables
//!
//! Bridges date-indexed frames and the matrix-based detector: column lookup,
//! undefined-cell checks, and writing labels back aligned to the input index.

use crate::isolation_forest::{IsolationForest, IsolationForestConfig};
use crate::{AnomalyDetector, AnomalyError, AnomalyLabel};
use bellwether_frame::{Column, Frame};
use chrono::NaiveDate;
use ndarray::Array2;
use tracing::debug;

/// Column name used for anomaly labels unless the caller picks another.
pub const DEFAULT_ANOMALY_COLUMN: &str = "anomaly";

/// An isolation forest together with the feature columns it was trained on
#[derive(Debug, Clone)]
pub struct TrainedModel {
    features: Vec<String>,
    contamination: f64,
    forest: IsolationForest,
}

impl TrainedModel {
    /// Feature columns, in training order
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Contamination used to set the threshold
    pub const fn contamination(&self) -> f64 {
        self.contamination
    }

    /// The fitted forest
    pub const fn forest(&self) -> &IsolationForest {
        &self.forest
    }
}

/// Labels and scores for every row of a table
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Date index of the labeled table
    pub index: Vec<NaiveDate>,
    /// Label per row
    pub labels: Vec<AnomalyLabel>,
    /// Anomaly score per row, higher is more anomalous
    pub scores: Vec<f64>,
}

impl Detection {
    /// Number of rows labeled anomalous
    pub fn anomaly_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_anomaly()).count()
    }

    /// Dates of the anomalous rows
    pub fn anomaly_dates(&self) -> Vec<NaiveDate> {
        self.index
            .iter()
            .zip(&self.labels)
            .filter(|(_, label)| label.is_anomaly())
            .map(|(date, _)| *date)
            .collect()
    }
}

/// Fit an isolation forest over every numeric column of `frame`.
///
/// The table must be fully defined; drop warm-up rows first.
pub fn train(frame: &Frame, config: &IsolationForestConfig) -> Result<TrainedModel, AnomalyError> {
    let features = frame.numeric_column_names();
    let matrix = feature_matrix(frame, &features)?;
    let forest = IsolationForest::fit(&matrix, config)?;

    debug!(
        features = ?features,
        rows = frame.height(),
        trees = forest.n_trees(),
        sample_size = forest.sample_size(),
        threshold = forest.threshold(),
        "trained isolation forest"
    );

    Ok(TrainedModel {
        features: features.into_iter().map(str::to_string).collect(),
        contamination: config.contamination,
        forest,
    })
}

/// Label every row of `frame` with the model's decision boundary.
///
/// Looks up the model's feature columns by name; every cell must be defined.
/// Row order and the date index are preserved.
pub fn detect(model: &TrainedModel, frame: &Frame) -> Result<Detection, AnomalyError> {
    let features: Vec<&str> = model.features.iter().map(String::as_str).collect();
    let matrix = feature_matrix(frame, &features)?;
    let scores = model.forest.score_samples(&matrix)?;
    let threshold = model.forest.threshold();
    let labels = scores
        .iter()
        .map(|&s| {
            if s > threshold {
                AnomalyLabel::Anomaly
            } else {
                AnomalyLabel::Normal
            }
        })
        .collect();

    Ok(Detection {
        index: frame.index().to_vec(),
        labels,
        scores,
    })
}

/// Copy of `frame` with an anomaly label column.
///
/// `features` must name the model's training columns, in training order.
/// Only rows where every one of them is defined are labeled (-1 or +1); the
/// rest keep an undefined label. The result has exactly as many rows as
/// `frame`.
pub fn append_anomaly_column(
    frame: &Frame,
    model: &TrainedModel,
    features: &[&str],
    column_name: &str,
) -> Result<Frame, AnomalyError> {
    if !features.iter().copied().eq(model.features.iter().map(String::as_str)) {
        return Err(AnomalyError::FeatureMismatch {
            expected: model.features.clone(),
            actual: features.iter().map(|f| (*f).to_string()).collect(),
        });
    }

    let rows = frame.defined_rows(features)?;
    let mut cells = vec![None; frame.height()];
    if !rows.is_empty() {
        let subset = frame.take_rows(&rows);
        let labels = model.forest.predict(&feature_matrix(&subset, features)?)?;
        for (&row, label) in rows.iter().zip(labels) {
            cells[row] = Some(label.as_f64());
        }
    }

    debug!(
        column = column_name,
        labeled = rows.len(),
        skipped = frame.height() - rows.len(),
        "appended anomaly column"
    );

    Ok(frame
        .clone()
        .with_column(Column::numeric(column_name, cells))?)
}

/// Decode a label column written by [`append_anomaly_column`].
pub fn anomaly_labels(
    frame: &Frame,
    column_name: &str,
) -> Result<Vec<Option<AnomalyLabel>>, AnomalyError> {
    Ok(frame
        .numeric(column_name)?
        .iter()
        .map(|cell| cell.and_then(AnomalyLabel::from_value))
        .collect())
}

/// Row-major matrix of the named columns, rejecting undefined cells.
fn feature_matrix(frame: &Frame, features: &[&str]) -> Result<Array2<f64>, AnomalyError> {
    let columns = features
        .iter()
        .map(|&name| frame.numeric(name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut values = Vec::with_capacity(frame.height() * features.len());
    for row in 0..frame.height() {
        for (column, name) in columns.iter().zip(features) {
            let value = column[row].ok_or_else(|| AnomalyError::UndefinedValue {
                column: (*name).to_string(),
                row,
            })?;
            values.push(value);
        }
    }

    Ok(Array2::from_shape_vec(
        (frame.height(), features.len()),
        values,
    )?)
}
