// redrock_core/src/error.rs

use thiserror::Error;

/// Configuration faults. Every variant is fatal at startup: the pipeline
/// must not run a single tick with a bad calibration or map geometry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The calibration quadrilaterals do not define a unique projective
    /// transform (collinear or coincident points).
    #[error("degenerate calibration quadrilateral: {0}")]
    DegenerateQuad(&'static str),

    /// The occupancy map must have at least one cell per axis.
    #[error("map size must be positive, got {0}")]
    InvalidMapSize(usize),

    /// Frame dimensions must be non-zero.
    #[error("invalid frame dimensions {width}x{height}")]
    InvalidFrameDimensions { width: usize, height: usize },

    /// An incoming frame did not match the calibrated dimensions. The
    /// camera format is fixed for a mission, so this is a wiring fault,
    /// not a per-frame condition to recover from.
    #[error("frame is {got_width}x{got_height}, configured for {want_width}x{want_height}")]
    FrameDimensionMismatch {
        got_width: usize,
        got_height: usize,
        want_width: usize,
        want_height: usize,
    },
}
