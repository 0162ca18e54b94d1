//! Risk categories

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Score band of the market risk index, ordered from least to most risky
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
pub enum RiskCategory {
    /// Score below 25
    #[display("Stable")]
    #[serde(rename = "Stable")]
    Stable,
    /// Score in `[25, 50)`
    #[display("Low Risk")]
    #[serde(rename = "Low Risk")]
    Low,
    /// Score in `[50, 75)`
    #[display("Moderate Risk")]
    #[serde(rename = "Moderate Risk")]
    Moderate,
    /// Score of 75 or more
    #[display("High Risk")]
    #[serde(rename = "High Risk")]
    High,
}

impl RiskCategory {
    /// All categories, least risky first
    pub const ALL: [Self; 4] = [Self::Stable, Self::Low, Self::Moderate, Self::High];

    /// Inclusive lower score bound of the band
    pub const fn lower_bound(self) -> f64 {
        match self {
            Self::Stable => 0.0,
            Self::Low => 25.0,
            Self::Moderate => 50.0,
            Self::High => 75.0,
        }
    }
}

/// Map a risk score to its category.
///
/// Bands are closed at the bottom: exactly 75 is High Risk, exactly 50
/// Moderate, exactly 25 Low. Anything below 25, NaN included, is Stable.
pub fn categorize_risk(score: f64) -> RiskCategory {
    if score >= 75.0 {
        RiskCategory::High
    } else if score >= 50.0 {
        RiskCategory::Moderate
    } else if score >= 25.0 {
        RiskCategory::Low
    } else {
        RiskCategory::Stable
    }
}
