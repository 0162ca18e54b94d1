//! Feature computation errors.

use bellwether_frame::FrameError;
use thiserror::Error;

/// Errors that can occur while computing features
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Window too short for the statistic
    #[error("Invalid window {window}: must be at least {min}")]
    InvalidWindow {
        /// Requested window
        window: usize,
        /// Smallest valid window
        min: usize,
    },

    /// Two-series feature called on series with different date indices
    #[error("Series '{left}' and '{right}' do not share a date index")]
    Misaligned {
        /// First series name
        left: String,
        /// Second series name
        right: String,
    },

    /// Underlying table error
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),
}
