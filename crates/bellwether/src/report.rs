//! Run summaries built from pipeline output.

use crate::PipelineError;
use bellwether_anomaly::{AnomalyLabel, anomaly_labels};
use bellwether_frame::Frame;
use bellwether_output::{AnomalySummary, RiskSnapshot, RunSummary};
use bellwether_risk::{RISK_SCORE_COLUMN, categorize_risk};
use std::collections::BTreeMap;

/// Summarize a labeled table, reading labels from `column`.
pub fn summarize_anomalies(
    name: &str,
    frame: &Frame,
    column: &str,
) -> Result<RunSummary, PipelineError> {
    let labels = anomaly_labels(frame, column)?;
    let labeled = labels.iter().flatten().count();
    let dates = frame
        .index()
        .iter()
        .zip(&labels)
        .filter(|(_, label)| matches!(label, Some(AnomalyLabel::Anomaly)))
        .map(|(date, _)| *date)
        .collect();

    Ok(RunSummary::new(name, frame).with_anomalies(AnomalySummary { labeled, dates }))
}

/// Summarize a scored table: latest score and rows per category.
pub fn summarize_risk(name: &str, frame: &Frame) -> Result<RunSummary, PipelineError> {
    let scores = frame.numeric(RISK_SCORE_COLUMN)?;
    let summary = RunSummary::new(name, frame);

    let mut category_counts = BTreeMap::new();
    for score in scores.iter().flatten() {
        *category_counts
            .entry(categorize_risk(*score).to_string())
            .or_insert(0) += 1;
    }

    let latest = frame
        .index()
        .iter()
        .zip(scores)
        .rev()
        .find_map(|(date, score)| score.map(|s| (*date, s)));

    Ok(match latest {
        Some((date, score)) => summary.with_risk(RiskSnapshot {
            date,
            score,
            category: categorize_risk(score).to_string(),
            category_counts,
        }),
        None => summary,
    })
}
