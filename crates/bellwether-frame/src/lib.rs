#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bellwether-risk/bellwether/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod fill;
pub mod frame;
pub mod interop;
pub mod rolling;
pub mod series;

pub use error::{FrameError, Result};
pub use frame::{Column, ColumnData, Frame};
pub use series::TimeSeries;

/// Name given to the date index when a table is exported.
pub const DATE_COLUMN: &str = "date";
