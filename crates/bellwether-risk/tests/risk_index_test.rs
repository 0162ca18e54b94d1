//! Integration tests for the weighted risk index over mixed-frequency indicators.

use bellwether_frame::{Frame, TimeSeries};
use bellwether_risk::{
    IndicatorWeights, RISK_CATEGORY_COLUMN, RISK_SCORE_COLUMN, RiskCategory, RiskError,
    attach_risk_score, categorize_risk, compute_weighted_risk_index,
};
use chrono::NaiveDate;

fn month(m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, m, 1).unwrap()
}

/// Monthly spreads, quarterly loan-to-value, and a price series in dollars.
fn indicators() -> Frame {
    let spread = TimeSeries::from_observations(
        "cds_spread",
        (1..=12).map(|m| (month(m), 90.0 + 5.0 * m as f64)),
    )
    .unwrap();
    let ltv = TimeSeries::from_observations(
        "loan_to_value",
        [(month(3), 0.62), (month(6), 0.70), (month(9), 0.81), (month(12), 0.78)],
    )
    .unwrap();
    let price = TimeSeries::from_observations(
        "median_price",
        (1..=12).map(|m| (month(m), 350_000.0 - 2_500.0 * m as f64)),
    )
    .unwrap();
    Frame::from_series(&[spread, ltv, price]).unwrap()
}

#[test]
fn test_index_stays_in_range_and_is_fully_defined() {
    let frame = indicators();
    let score = compute_weighted_risk_index(&frame, None).unwrap();

    assert_eq!(score.len(), frame.height());
    assert_eq!(score.dates(), frame.index());
    assert_eq!(score.defined_count(), frame.height());
    for (_, value) in score.iter() {
        let value = value.unwrap();
        assert!((0.0..=100.0).contains(&value), "score {value} out of range");
    }
}

#[test]
fn test_weights_shift_the_index_towards_an_indicator() {
    let frame = indicators();
    let spread_heavy = IndicatorWeights::new([("cds_spread", 10.0), ("median_price", 1.0)]).unwrap();
    let price_heavy = IndicatorWeights::new([("cds_spread", 1.0), ("median_price", 10.0)]).unwrap();

    let spread_score = compute_weighted_risk_index(&frame, Some(&spread_heavy)).unwrap();
    let price_score = compute_weighted_risk_index(&frame, Some(&price_heavy)).unwrap();

    // Spreads rise through the year while prices fall
    assert!(spread_score.get(11).unwrap() > spread_score.get(0).unwrap());
    assert!(price_score.get(11).unwrap() < price_score.get(0).unwrap());
}

#[test]
fn test_attach_adds_score_and_category() {
    let frame = indicators();
    let scored = attach_risk_score(&frame, None).unwrap();

    assert_eq!(scored.height(), frame.height());
    assert_eq!(scored.width(), frame.width() + 2);

    let scores = scored.numeric(RISK_SCORE_COLUMN).unwrap();
    let categories = scored
        .column(RISK_CATEGORY_COLUMN)
        .unwrap()
        .data()
        .as_text()
        .unwrap();
    for (score, category) in scores.iter().zip(categories) {
        assert_eq!(
            category.as_deref(),
            Some(categorize_risk(score.unwrap()).to_string().as_str())
        );
    }
}

#[test]
fn test_weights_file_with_unknown_indicator() {
    let frame = indicators();
    let weights: IndicatorWeights =
        serde_json::from_str(r#"{"cds_spread": 1.0, "vix": 3.0}"#).unwrap();

    // Lenient: unknown names are ignored
    let score = compute_weighted_risk_index(&frame, Some(&weights)).unwrap();
    assert_eq!(score.get(0), Some(0.0));
    assert_eq!(score.get(11), Some(100.0));
    assert_eq!(categorize_risk(score.get(11).unwrap()), RiskCategory::High);

    // Strict: unknown names are an error
    assert!(matches!(
        weights.validate_columns(&frame),
        Err(RiskError::UnknownIndicator(name)) if name == "vix"
    ));
}
