// redrock_core/src/perception/worldmap.rs

use nalgebra::DMatrix;

use crate::types::{BinaryMask, RgbFrame};

/// Evidence added per obstacle pixel observation.
pub const OBSTACLE_WEIGHT: u32 = 1;
/// Evidence added per navigable pixel observation. Ten times the obstacle
/// weight, so cells seen as both over time resolve toward traversable.
pub const NAVIGABLE_WEIGHT: u32 = 10;
/// Saturating marker assigned to a located rock sample.
pub const ROCK_MARKER: u32 = 255;

/// The persistent world occupancy map: a square grid with three independent
/// evidence channels, indexed `(y, x)`.
///
/// Evidence only ever grows (or is assigned the rock marker); nothing is
/// decayed or reset for the lifetime of a mission. Callers must clamp cell
/// coordinates before handing them in; the projection in
/// [`crate::perception::coords::pix_to_world`] does so.
#[derive(Debug, Clone)]
pub struct WorldMap {
    size: usize,
    obstacle: DMatrix<u32>,
    rock: DMatrix<u32>,
    navigable: DMatrix<u32>,
}

impl WorldMap {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            obstacle: DMatrix::zeros(size, size),
            rock: DMatrix::zeros(size, size),
            navigable: DMatrix::zeros(size, size),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Accumulate one observation per cell into the obstacle channel.
    pub fn add_obstacle_evidence(&mut self, cells: &[(usize, usize)]) {
        for &(x, y) in cells {
            self.obstacle[(y, x)] += OBSTACLE_WEIGHT;
        }
    }

    /// Accumulate one observation per cell into the navigable channel.
    pub fn add_navigable_evidence(&mut self, cells: &[(usize, usize)]) {
        for &(x, y) in cells {
            self.navigable[(y, x)] += NAVIGABLE_WEIGHT;
        }
    }

    /// Pin the rock marker at a located sample. Assignment, not
    /// accumulation; markers persist even after the rock leaves view.
    pub fn mark_rock(&mut self, x: usize, y: usize) {
        self.rock[(y, x)] = ROCK_MARKER;
    }

    pub fn obstacle_at(&self, x: usize, y: usize) -> u32 {
        self.obstacle[(y, x)]
    }

    pub fn rock_at(&self, x: usize, y: usize) -> u32 {
        self.rock[(y, x)]
    }

    pub fn navigable_at(&self, x: usize, y: usize) -> u32 {
        self.navigable[(y, x)]
    }

    pub fn obstacle(&self) -> &DMatrix<u32> {
        &self.obstacle
    }

    pub fn rock(&self) -> &DMatrix<u32> {
        &self.rock
    }

    pub fn navigable(&self) -> &DMatrix<u32> {
        &self.navigable
    }
}

/// Diagnostic overlay mirroring the three masks, scaled to display range.
/// Red = obstacle, green = rock, blue = navigable. Purely for operators;
/// nothing downstream consumes it.
#[derive(Debug, Clone)]
pub struct VisionImage {
    frame: RgbFrame,
}

impl VisionImage {
    const OBSTACLE_CHANNEL: usize = 0;
    const ROCK_CHANNEL: usize = 1;
    const NAVIGABLE_CHANNEL: usize = 2;

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            frame: RgbFrame::new(width, height),
        }
    }

    pub fn set_obstacle(&mut self, mask: &BinaryMask) {
        self.frame.fill_channel(Self::OBSTACLE_CHANNEL, mask, 255);
    }

    pub fn set_rock(&mut self, mask: &BinaryMask) {
        self.frame.fill_channel(Self::ROCK_CHANNEL, mask, 255);
    }

    /// Rock-free tick: the overlay clears, the map markers stay.
    pub fn clear_rock(&mut self) {
        self.frame.clear_channel(Self::ROCK_CHANNEL);
    }

    pub fn set_navigable(&mut self, mask: &BinaryMask) {
        self.frame.fill_channel(Self::NAVIGABLE_CHANNEL, mask, 255);
    }

    pub fn frame(&self) -> &RgbFrame {
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evidence_weights_are_asymmetric() {
        let mut map = WorldMap::new(10);
        map.add_obstacle_evidence(&[(2, 3), (2, 3)]);
        map.add_navigable_evidence(&[(2, 3)]);
        assert_eq!(map.obstacle_at(2, 3), 2);
        assert_eq!(map.navigable_at(2, 3), 10);
        // Other cells untouched.
        assert_eq!(map.obstacle_at(3, 2), 0);
    }

    #[test]
    fn rock_marker_saturates_and_persists() {
        let mut map = WorldMap::new(10);
        map.mark_rock(7, 1);
        map.mark_rock(7, 1);
        assert_eq!(map.rock_at(7, 1), ROCK_MARKER);
    }

    #[test]
    fn overlay_channels_track_masks_independently() {
        let mut vision = VisionImage::new(2, 2);
        let mut mask = BinaryMask::new(2, 2);
        mask.put(0, 0, true);

        vision.set_obstacle(&mask);
        vision.set_rock(&mask);
        vision.set_navigable(&mask);
        assert_eq!(vision.frame().get(0, 0), [255, 255, 255]);

        vision.clear_rock();
        assert_eq!(vision.frame().get(0, 0), [255, 0, 255]);
        assert_eq!(vision.frame().get(1, 1), [0, 0, 0]);
    }
}
