#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bellwether-risk/bellwether/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod summary;

pub use export::{ExportError, ExportFormat, Exporter, FrameExport};
pub use summary::{AnomalySummary, ColumnSummary, RiskSnapshot, RunSummary};
