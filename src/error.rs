//! Error types for the reconstruction pipelines.
//!
//! All contract violations are rejected before any transform work; the
//! alias-count mismatch is the only failure that can surface mid-pipeline.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KtError {
    #[error("invalid dimensions ({n0}, {n1}, {nt}): spatial axes must be positive, time axis must have length >= 2")]
    InvalidDimensions { n0: usize, n1: usize, nt: usize },

    #[error("buffer length {got} does not match dimensions ({n0}, {n1}, {nt}) = {expected} elements")]
    BufferSize {
        got: usize,
        expected: usize,
        n0: usize,
        n1: usize,
        nt: usize,
    },

    #[error("calibration length {calib} does not match data length {data}")]
    CalibrationShape { calib: usize, data: usize },

    #[error("time axis {axis} out of range for a 3-dimensional array")]
    InvalidTimeAxis { axis: isize },

    #[error("acceleration factor must be >= 1, got {r}")]
    InvalidAcceleration { r: usize },

    #[error("PSF should define {expected} aliased copies, found {found}")]
    AliasCountMismatch { expected: usize, found: usize },

    #[error("sampled k-t array contains no nonzero entries")]
    EmptySampling,

    #[error("{which} window has length {got}, expected {expected}")]
    WindowLength {
        which: &'static str,
        got: usize,
        expected: usize,
    },
}
