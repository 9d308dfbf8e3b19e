//! Error handling for groovecut
//!
//! Input errors shared across the workspace: amplitude series, frame rate
//! and surface dimensions. Built on `thiserror`.

use thiserror::Error;

/// Input validation error type
///
/// Raised before any path point is generated, carrying the offending value so
/// that the failing run can be reproduced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// The amplitude series contains no samples
    #[error("Amplitude series is empty")]
    EmptyAmplitudes,

    /// Frame rate is zero, negative or not finite
    #[error("Invalid frame rate: {frame_rate} Hz (must be finite and > 0)")]
    InvalidFrameRate {
        /// The rejected frame rate.
        frame_rate: f64,
    },

    /// The tool would cut through the axis of the part
    #[error("Radius {radius} mm must be greater than engraving depth {depth} mm")]
    RadiusNotGreaterThanDepth {
        /// Surface radius in mm.
        radius: f64,
        /// Engraving depth in mm.
        depth: f64,
    },

    /// A sample is NaN or infinite
    #[error("Amplitude at index {index} is not finite: {value}")]
    NonFiniteAmplitude {
        /// Index of the sample in the series.
        index: usize,
        /// The rejected value.
        value: f64,
    },

    /// A named value is outside its valid range
    #[error("Value '{name}' out of range: {value} ({reason})")]
    OutOfRange {
        /// Parameter name.
        name: String,
        /// The rejected value.
        value: f64,
        /// Why the value was rejected.
        reason: String,
    },
}
