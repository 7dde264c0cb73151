// redrock_core/src/config.rs

use serde::Deserialize;

use crate::error::ConfigError;

// =========================================================================
// == Perception Configuration ==
// =========================================================================

/// Calibration of the perspective transform.
///
/// `source_quad` is the image footprint of a known square patch of flat
/// ground directly ahead of the rover, measured once against the camera.
/// The destination quadrilateral is derived from the frame size: a small
/// rectangle of half-width `dst_size`, centred horizontally and raised
/// `bottom_offset` pixels because the bottom of the image sits slightly
/// ahead of the rover's ground contact point.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibrationConfig {
    /// Four ordered image points (x, y) of the calibration patch.
    pub source_quad: [[f64; 2]; 4],
    /// Half-width in pixels of the destination rectangle.
    pub dst_size: f64,
    /// Pixels between the image bottom edge and the rover ground contact.
    pub bottom_offset: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            source_quad: [[14.0, 140.0], [301.0, 140.0], [200.0, 96.0], [118.0, 96.0]],
            dst_size: 5.0,
            bottom_offset: 6.0,
        }
    }
}

impl CalibrationConfig {
    /// The destination quadrilateral for a frame of the given size, ordered
    /// to match `source_quad` (bottom-left, bottom-right, top-right,
    /// top-left).
    pub fn destination_quad(&self, frame_width: usize, frame_height: usize) -> [[f64; 2]; 4] {
        let cx = frame_width as f64 / 2.0;
        let bottom = frame_height as f64 - self.bottom_offset;
        let top = frame_height as f64 - 2.0 * self.dst_size - self.bottom_offset;
        [
            [cx - self.dst_size, bottom],
            [cx + self.dst_size, bottom],
            [cx + self.dst_size, top],
            [cx - self.dst_size, top],
        ]
    }

    /// Pixels per world-map cell: the destination rectangle spans
    /// `2 * dst_size` warped pixels per metre of ground.
    pub fn world_scale(&self) -> f64 {
        2.0 * self.dst_size
    }
}

/// RGB thresholds for the three terrain classes.
///
/// All comparisons are strict. A pixel exactly at the navigable floor is
/// neither navigable nor obstacle; that band of unclassified pixels is part
/// of the calibrated behaviour and feeds the map's optimism weighting.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfig {
    /// Navigable ground: all channels strictly above these values.
    pub navigable_floor: [u8; 3],
    /// Obstacle: all channels strictly below these values.
    pub obstacle_ceiling: [u8; 3],
    /// Rock sample: red and green strictly above these floors...
    pub rock_floor_rg: [u8; 2],
    /// ...and blue strictly below this ceiling.
    pub rock_ceiling_b: u8,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            navigable_floor: [160, 160, 160],
            obstacle_ceiling: [160, 160, 160],
            rock_floor_rg: [110, 110],
            rock_ceiling_b: 50,
        }
    }
}

/// Everything the perception stage needs, fixed for a whole mission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PerceptionConfig {
    pub calibration: CalibrationConfig,
    pub thresholds: ThresholdConfig,
    pub frame: FrameConfig,
    pub map: MapConfig,
}

/// Camera frame dimensions.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 160,
        }
    }
}

/// World occupancy map dimensions (square, `size` cells per axis).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapConfig {
    pub size: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { size: 200 }
    }
}

impl PerceptionConfig {
    /// Validate the startup-fatal parts of the configuration. Quadrilateral
    /// degeneracy is checked where the homography is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map.size == 0 {
            return Err(ConfigError::InvalidMapSize(self.map.size));
        }
        if self.frame.width == 0 || self.frame.height == 0 {
            return Err(ConfigError::InvalidFrameDimensions {
                width: self.frame.width,
                height: self.frame.height,
            });
        }
        Ok(())
    }
}

// =========================================================================
// == Decision Configuration ==
// =========================================================================

/// Kinematic thresholds for the decision state machine.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecisionConfig {
    /// Below this many navigable bearings, stop driving forward.
    pub stop_forward: usize,
    /// At or above this many navigable bearings, a stopped rover may go.
    pub go_forward: usize,
    /// Cruise speed ceiling (m/s).
    pub max_vel: f64,
    /// Throttle command used whenever accelerating.
    pub throttle_set: f64,
    /// Brake command used whenever braking.
    pub brake_set: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            stop_forward: 50,
            go_forward: 500,
            max_vel: 2.0,
            throttle_set: 0.2,
            brake_set: 10.0,
        }
    }
}
