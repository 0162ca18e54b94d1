//! End-to-end tests for the anomaly and risk pipelines.

use approx::assert_relative_eq;
use bellwether::anomaly::{
    AnomalyLabel, DEFAULT_ANOMALY_COLUMN, IsolationForestConfig, anomaly_labels,
};
use bellwether::features::VolatilityConfig;
use bellwether::frame::{Column, Frame, TimeSeries};
use bellwether::risk::{IndicatorWeights, RISK_CATEGORY_COLUMN, RISK_SCORE_COLUMN, RiskCategory};
use bellwether::{
    PipelineConfig, run_anomaly_pipeline, run_risk_pipeline, summarize_anomalies, summarize_risk,
};
use chrono::NaiveDate;

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + chrono::Days::new(offset)
}

fn prices(values: &[f64]) -> TimeSeries {
    TimeSeries::from_observations(
        "close",
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (day(i as u64), v)),
    )
    .unwrap()
}

#[test]
fn test_price_spike_flags_volatility_peak() {
    let series = prices(&[100.0, 102.0, 101.0, 150.0, 99.0, 98.0]);
    let config = PipelineConfig {
        volatility: VolatilityConfig { window: 2 },
        anomaly: IsolationForestConfig {
            n_estimators: 10_000,
            contamination: 0.2,
            ..Default::default()
        },
        ..Default::default()
    };

    let table = run_anomaly_pipeline(&series, &config).unwrap();
    assert_eq!(table.height(), 6);
    assert_eq!(
        table.column_names(),
        vec!["close", "volatility", DEFAULT_ANOMALY_COLUMN]
    );

    // Two rows of warm-up, then the spike lifts volatility sharply
    let volatility = table.numeric("volatility").unwrap();
    assert_eq!(volatility[0], None);
    assert_eq!(volatility[1], None);
    let calm = volatility[2].unwrap();
    let spike = volatility[3].unwrap();
    let peak = volatility[4].unwrap();
    assert!(spike > 10.0 * calm);
    assert!(peak > spike);
    assert_relative_eq!(calm, 0.0298, epsilon = 1e-3);

    let labels = anomaly_labels(&table, DEFAULT_ANOMALY_COLUMN).unwrap();
    assert_eq!(labels[0], None);
    assert_eq!(labels[1], None);
    assert_eq!(labels[4], Some(AnomalyLabel::Anomaly));
    assert_eq!(
        labels
            .iter()
            .filter(|l| **l == Some(AnomalyLabel::Anomaly))
            .count(),
        1
    );

    let summary = summarize_anomalies("anomalies", &table, DEFAULT_ANOMALY_COLUMN).unwrap();
    let anomalies = summary.anomalies.unwrap();
    assert_eq!(anomalies.labeled, 4);
    assert_eq!(anomalies.dates, vec![day(4)]);
}

#[test]
fn test_anomaly_pipeline_is_deterministic() {
    let closes: Vec<f64> = (0..120)
        .map(|i| 100.0 + 3.0 * ((i * 13) % 17) as f64 / 17.0 + if i == 80 { 25.0 } else { 0.0 })
        .collect();
    let series = prices(&closes);
    let config = PipelineConfig::default();

    let first = run_anomaly_pipeline(&series, &config).unwrap();
    let second = run_anomaly_pipeline(&series, &config).unwrap();
    assert_eq!(first, second);

    let labels = anomaly_labels(&first, DEFAULT_ANOMALY_COLUMN).unwrap();
    assert_eq!(labels.len(), 120);
    assert!(labels[..30].iter().all(Option::is_none));
    assert!(labels[30..].iter().all(Option::is_some));
}

fn indicators() -> Frame {
    let index = (0..6).map(day).collect();
    Frame::new(index)
        .unwrap()
        .with_column(Column::numeric(
            "cds_spread",
            vec![Some(80.0), Some(85.0), None, Some(120.0), Some(160.0), Some(150.0)],
        ))
        .unwrap()
        .with_column(Column::numeric(
            "loan_to_value",
            vec![None, Some(0.60), Some(0.62), Some(0.70), Some(0.78), Some(0.80)],
        ))
        .unwrap()
}

#[test]
fn test_risk_pipeline_scores_every_row() {
    let table = run_risk_pipeline(&indicators(), &PipelineConfig::default()).unwrap();

    let scores = table.numeric(RISK_SCORE_COLUMN).unwrap();
    assert_eq!(scores.len(), 6);
    assert!(
        scores
            .iter()
            .all(|s| s.is_some_and(|v| (0.0..=100.0).contains(&v)))
    );
    assert!(table.contains(RISK_CATEGORY_COLUMN));

    // Both indicators bottom out at row 0 (ltv back-filled) and peak late
    assert_relative_eq!(scores[0].unwrap(), 0.0);
    assert!(scores[4].unwrap() > 75.0);

    let summary = summarize_risk("risk", &table).unwrap();
    let risk = summary.risk.unwrap();
    assert_eq!(risk.date, day(5));
    assert_eq!(risk.category, RiskCategory::High.to_string());
    assert_eq!(risk.category_counts.values().sum::<usize>(), 6);
}

#[test]
fn test_risk_pipeline_with_configured_weights() {
    let config = PipelineConfig {
        weights: Some(IndicatorWeights::new([("loan_to_value", 1.0)]).unwrap()),
        ..Default::default()
    };
    let table = run_risk_pipeline(&indicators(), &config).unwrap();
    let scores = table.numeric(RISK_SCORE_COLUMN).unwrap();

    assert_relative_eq!(scores[5].unwrap(), 100.0);
    assert_relative_eq!(scores[3].unwrap(), 50.0, epsilon = 1e-9);
}
