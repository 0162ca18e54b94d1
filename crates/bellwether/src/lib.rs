#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bellwether-risk/bellwether/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod pipeline;
pub mod report;

// Re-export main types from sub-crates
pub use bellwether_anomaly as anomaly;
pub use bellwether_features as features;
pub use bellwether_frame as frame;
pub use bellwether_output as output;
pub use bellwether_risk as risk;

pub use pipeline::{
    PipelineConfig, PipelineError, run_anomaly_pipeline, run_feature_pipeline, run_risk_pipeline,
};
pub use report::{summarize_anomalies, summarize_risk};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
