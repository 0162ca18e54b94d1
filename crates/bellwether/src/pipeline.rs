//! End-to-end pipelines
//!
//! Each pipeline takes its inputs and a [`PipelineConfig`] explicitly and
//! returns a new table; nothing is cached between runs.

use bellwether_anomaly::{
    AnomalyError, DEFAULT_ANOMALY_COLUMN, IsolationForestConfig, append_anomaly_column, train,
};
use bellwether_features::{
    CorrelationConfig, Feature, FeatureError, MovingAverage, MovingAverageConfig, VolatilityConfig,
    VolatilityIndex, ZScore, ZScoreConfig, pct_change, rolling_correlation, volatility_index,
};
use bellwether_frame::{Frame, FrameError, TimeSeries};
use bellwether_risk::{IndicatorWeights, RiskError, attach_risk_score};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Name of the volatility column produced by the anomaly pipeline
pub const VOLATILITY_COLUMN: &str = "volatility";

/// Errors raised by the pipelines
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Table error
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Feature computation error
    #[error(transparent)]
    Feature(#[from] FeatureError),

    /// Anomaly detection error
    #[error(transparent)]
    Anomaly(#[from] AnomalyError),

    /// Risk index error
    #[error(transparent)]
    Risk(#[from] RiskError),

    /// Malformed configuration
    #[error("Invalid pipeline configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Too few prices to leave any row after the volatility warm-up
    #[error("Not enough data: {rows} rows leave no defined volatility with window {window}")]
    InsufficientData {
        /// Input rows
        rows: usize,
        /// Volatility window
        window: usize,
    },
}

/// Settings for every pipeline stage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Rolling volatility window
    pub volatility: VolatilityConfig,

    /// Moving average window
    pub moving_average: MovingAverageConfig,

    /// Rolling z-score window
    pub z_score: ZScoreConfig,

    /// Rolling correlation window
    pub correlation: CorrelationConfig,

    /// Isolation forest settings
    pub anomaly: IsolationForestConfig,

    /// Risk index weights; `None` weights every numeric column equally
    pub weights: Option<IndicatorWeights>,
}

impl PipelineConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Volatility and anomaly labels for a price series.
///
/// The result holds the prices, a `volatility` column and an `anomaly` column
/// on the input's date index. The forest is trained on the rows with defined
/// volatility only; warm-up rows keep an undefined label.
pub fn run_anomaly_pipeline(
    prices: &TimeSeries,
    config: &PipelineConfig,
) -> Result<Frame, PipelineError> {
    let window = config.volatility.window;
    let volatility = volatility_index(prices, window)?.with_name(VOLATILITY_COLUMN);
    let table = Frame::new(prices.dates().to_vec())?
        .with_series(prices)?
        .with_series(&volatility)?;

    let training = table
        .select(&[VOLATILITY_COLUMN])?
        .drop_undefined(&[VOLATILITY_COLUMN])?;
    if training.is_empty() {
        return Err(PipelineError::InsufficientData {
            rows: prices.len(),
            window,
        });
    }

    let model = train(&training, &config.anomaly)?;
    let labeled = append_anomaly_column(
        &table,
        &model,
        &[VOLATILITY_COLUMN],
        DEFAULT_ANOMALY_COLUMN,
    )?;

    info!(
        rows = prices.len(),
        trained_on = training.height(),
        window,
        contamination = config.anomaly.contamination,
        "anomaly pipeline complete"
    );
    Ok(labeled)
}

/// All single-series features of `prices`, plus a rolling correlation against
/// `against` when given.
///
/// The correlation column is named `correlation_<against>`.
pub fn run_feature_pipeline(
    prices: &TimeSeries,
    against: Option<&TimeSeries>,
    config: &PipelineConfig,
) -> Result<Frame, PipelineError> {
    let features: [Box<dyn Feature>; 3] = [
        Box::new(MovingAverage::new(config.moving_average.clone())),
        Box::new(ZScore::new(config.z_score.clone())),
        Box::new(VolatilityIndex::new(config.volatility.clone())),
    ];

    let mut table = Frame::new(prices.dates().to_vec())?
        .with_series(prices)?
        .with_series(&pct_change(prices)?)?;
    for feature in &features {
        let series = feature.compute(prices)?.with_name(feature.name());
        table = table.with_series(&series)?;
    }

    if let Some(other) = against {
        let correlation = rolling_correlation(prices, other, config.correlation.window)?
            .with_name(format!("correlation_{}", other.name()));
        table = table.with_series(&correlation)?;
    }

    info!(
        rows = table.height(),
        columns = table.width(),
        "feature pipeline complete"
    );
    Ok(table)
}

/// Indicator table with `market_risk_score` and `risk_category` appended.
pub fn run_risk_pipeline(
    indicators: &Frame,
    config: &PipelineConfig,
) -> Result<Frame, PipelineError> {
    let scored = attach_risk_score(indicators, config.weights.as_ref())?;
    info!(
        rows = scored.height(),
        weighted = config.weights.is_some(),
        "risk pipeline complete"
    );
    Ok(scored)
}
