// redrock_core/src/types.rs

use serde::Deserialize;

// =========================================================================
// == Image Buffers ==
// =========================================================================

/// An owned, row-major RGB8 frame buffer (3 bytes per pixel).
///
/// This is the only pixel container in the crate: the camera frame comes in
/// as one, the warped top-down view is written into one, and the diagnostic
/// overlay is one. Pixels are addressed as (row, col) with row 0 at the top
/// of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbFrame {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbFrame {
    /// Create a zeroed (black) frame.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 3],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> [u8; 3] {
        let i = (row * self.width + col) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn put(&mut self, row: usize, col: usize, px: [u8; 3]) {
        let i = (row * self.width + col) * 3;
        self.data[i] = px[0];
        self.data[i + 1] = px[1];
        self.data[i + 2] = px[2];
    }

    /// Overwrite a single colour channel with `value` wherever `mask` is set
    /// and with 0 elsewhere. Used by the diagnostic overlay.
    pub fn fill_channel(&mut self, channel: usize, mask: &BinaryMask, value: u8) {
        debug_assert!(channel < 3);
        for row in 0..self.height {
            for col in 0..self.width {
                let i = (row * self.width + col) * 3 + channel;
                self.data[i] = if mask.get(row, col) { value } else { 0 };
            }
        }
    }

    /// Zero a single colour channel everywhere.
    pub fn clear_channel(&mut self, channel: usize) {
        debug_assert!(channel < 3);
        for px in self.data[channel..].iter_mut().step_by(3) {
            *px = 0;
        }
    }

    /// Fill the entire frame with one colour. Handy for tests and harnesses.
    pub fn fill(&mut self, px: [u8; 3]) {
        for chunk in self.data.chunks_exact_mut(3) {
            chunk.copy_from_slice(&px);
        }
    }
}

/// A single-channel 0/1 mask with the same addressing as [`RgbFrame`].
///
/// One is produced per terrain class per tick; they are scratch buffers that
/// get fully overwritten by the classifiers each tick and never outlive it.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BinaryMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.data[row * self.width + col] != 0
    }

    #[inline]
    pub fn put(&mut self, row: usize, col: usize, set: bool) {
        self.data[row * self.width + col] = set as u8;
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Number of set pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    pub fn any(&self) -> bool {
        self.data.iter().any(|&v| v != 0)
    }

    /// Iterate over set pixels in (row, col) order.
    pub fn iter_set(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0)
            .map(move |(i, _)| (i / width, i % width))
    }
}

// =========================================================================
// == Rover Pose and State ==
// =========================================================================

/// The rover's absolute position and heading in the world frame.
/// Supplied by the external localisation collaborator, read-only in here.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RoverPose {
    pub x: f64,
    pub y: f64,
    /// Heading in degrees, counter-clockwise from the world +X axis.
    pub yaw_deg: f64,
}

/// The decision stage's operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoverMode {
    #[default]
    Forward,
    Stop,
    Pickup,
}

/// What the bearing/distance lists on [`RoverState`] currently describe.
///
/// `Sample` means a rock sample is visible this tick and the lists point at
/// it rather than at open terrain; sample pursuit supersedes normal
/// navigation. `None` means perception has not produced any bearing data
/// yet, which is distinct from an empty `Terrain` list (terrain observed,
/// none of it navigable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavTarget {
    #[default]
    None,
    Terrain,
    Sample,
}

/// The mutable control/status record threaded through both pipeline stages.
///
/// Exactly one exists per mission and the tick loop owns it: perception
/// writes the bearing lists and target tag, the decision stage reads them
/// and writes the control outputs. Nothing in here is shared across threads.
#[derive(Debug, Clone, Default)]
pub struct RoverState {
    /// Current forward velocity (m/s), supplied externally each tick.
    pub vel: f64,
    /// Operating mode of the decision state machine.
    pub mode: RoverMode,
    /// What the bearing lists refer to this tick.
    pub target: NavTarget,
    /// Bearings (radians, signed, 0 = straight ahead) to candidate pixels.
    pub nav_angles: Vec<f64>,
    /// Distances (pixels in rover-centric space) paired with `nav_angles`.
    pub nav_dists: Vec<f64>,
    /// Externally computed: rover is within pickup range of a sample.
    pub near_sample: bool,
    /// Externally maintained: a pickup action is currently executing.
    pub picking_up: bool,
    /// Output signal: the decision stage requests a pickup action.
    pub send_pickup: bool,
    /// Running count of collected-sample observations.
    pub samples_found: u32,
    /// One-shot latch so a single approach issues a single pickup request.
    pub pickup_done: bool,
    /// Control output: throttle command.
    pub throttle: f64,
    /// Control output: brake command.
    pub brake: f64,
    /// Control output: steering angle in degrees, +ve is left.
    pub steer: f64,
}
