#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bellwether-risk/bellwether/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod category;
pub mod error;
pub mod index;
pub mod normalize;
pub mod weights;

// Re-export main types
pub use category::{RiskCategory, categorize_risk};
pub use error::RiskError;
pub use index::{
    RISK_CATEGORY_COLUMN, RISK_SCORE_COLUMN, attach_risk_score, compute_weighted_risk_index,
};
pub use normalize::{SCALE_MAX, SCALE_MIN, normalize};
pub use weights::IndicatorWeights;
