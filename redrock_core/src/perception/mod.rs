// redrock_core/src/perception/mod.rs

// --- The perception pipeline: warp -> classify -> map -> bearings ---
pub mod coords;
pub mod threshold;
pub mod warp;
pub mod worldmap;

use nalgebra::Vector2;
use tracing::debug;

use crate::config::PerceptionConfig;
use crate::error::ConfigError;
use crate::types::{BinaryMask, NavTarget, RgbFrame, RoverPose, RoverState};
use warp::PerspectiveTransform;
use worldmap::{VisionImage, WorldMap};

/// The perception stage: one camera frame plus the rover pose in, updated
/// occupancy map and bearing lists out.
///
/// All per-tick buffers (warped frame, masks, point lists) are allocated
/// once here and overwritten every tick; none of their contents survive a
/// tick. The homography is built once at construction, so a degenerate
/// calibration is caught before the first frame.
#[derive(Debug)]
pub struct Perception {
    config: PerceptionConfig,
    transform: PerspectiveTransform,
    warped: RgbFrame,
    navigable_mask: BinaryMask,
    obstacle_mask: BinaryMask,
    rock_mask: BinaryMask,
    ground_points: Vec<Vector2<f64>>,
    obstacle_points: Vec<Vector2<f64>>,
    rock_points: Vec<Vector2<f64>>,
    world_cells: Vec<(usize, usize)>,
}

impl Perception {
    pub fn new(config: PerceptionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (width, height) = (config.frame.width, config.frame.height);
        let destination = config.calibration.destination_quad(width, height);
        let transform =
            PerspectiveTransform::from_quads(&config.calibration.source_quad, &destination)?;

        Ok(Self {
            config,
            transform,
            warped: RgbFrame::new(width, height),
            navigable_mask: BinaryMask::new(width, height),
            obstacle_mask: BinaryMask::new(width, height),
            rock_mask: BinaryMask::new(width, height),
            ground_points: Vec::new(),
            obstacle_points: Vec::new(),
            rock_points: Vec::new(),
            world_cells: Vec::new(),
        })
    }

    pub fn config(&self) -> &PerceptionConfig {
        &self.config
    }

    /// Run one perception tick.
    ///
    /// Accumulates terrain evidence into `map`, refreshes the diagnostic
    /// `vision` overlay, and rewrites the bearing/distance lists and
    /// [`NavTarget`] tag on `state`. When any rock pixel is visible the
    /// lists describe the rock, not open terrain; sample pursuit supersedes
    /// navigation for that tick.
    pub fn process(
        &mut self,
        frame: &RgbFrame,
        pose: &RoverPose,
        map: &mut WorldMap,
        vision: &mut VisionImage,
        state: &mut RoverState,
    ) -> Result<(), ConfigError> {
        if frame.width() != self.config.frame.width || frame.height() != self.config.frame.height {
            return Err(ConfigError::FrameDimensionMismatch {
                got_width: frame.width(),
                got_height: frame.height(),
                want_width: self.config.frame.width,
                want_height: self.config.frame.height,
            });
        }

        self.transform.warp(frame, &mut self.warped);

        threshold::navigable(&self.warped, &self.config.thresholds, &mut self.navigable_mask);
        threshold::obstacle(&self.warped, &self.config.thresholds, &mut self.obstacle_mask);
        threshold::rock(&self.warped, &self.config.thresholds, &mut self.rock_mask);

        vision.set_obstacle(&self.obstacle_mask);
        vision.set_navigable(&self.navigable_mask);

        let scale = self.config.calibration.world_scale();
        // Clamp bound comes from the map actually supplied, so evidence
        // stays in bounds even if the caller sized it differently from
        // the configured default.
        let map_size = map.size();

        coords::rover_coords(&self.obstacle_mask, &mut self.obstacle_points);
        coords::pix_to_world(&self.obstacle_points, pose, map_size, scale, &mut self.world_cells);
        map.add_obstacle_evidence(&self.world_cells);

        coords::rover_coords(&self.navigable_mask, &mut self.ground_points);
        coords::pix_to_world(&self.ground_points, pose, map_size, scale, &mut self.world_cells);
        map.add_navigable_evidence(&self.world_cells);

        coords::to_polar_lists(&self.ground_points, &mut state.nav_dists, &mut state.nav_angles);
        let mut target = NavTarget::Terrain;

        if self.rock_mask.any() {
            coords::rover_coords(&self.rock_mask, &mut self.rock_points);
            coords::pix_to_world(&self.rock_points, pose, map_size, scale, &mut self.world_cells);
            coords::to_polar_lists(&self.rock_points, &mut state.nav_dists, &mut state.nav_angles);

            // Pin the map marker at the rock pixel nearest the rover.
            // First index wins ties.
            let mut nearest = 0;
            for (i, dist) in state.nav_dists.iter().enumerate() {
                if *dist < state.nav_dists[nearest] {
                    nearest = i;
                }
            }
            let (x, y) = self.world_cells[nearest];
            map.mark_rock(x, y);

            vision.set_rock(&self.rock_mask);
            target = NavTarget::Sample;
        } else {
            vision.clear_rock();
        }

        if state.target != target {
            debug!(from = ?state.target, to = ?target, "navigation target changed");
        }
        state.target = target;

        Ok(())
    }
}
