// redrock_core/src/perception/coords.rs

use nalgebra::{Rotation2, Vector2};

use crate::types::{BinaryMask, RoverPose};

/// Convert every set mask pixel into rover-centric coordinates.
///
/// The origin is the image bottom-centre (the rover's ground contact after
/// warping), +x points forward (toward the top of the image) and +y points
/// left. `out` is cleared and refilled; one point per set pixel, in the
/// mask's iteration order.
pub fn rover_coords(mask: &BinaryMask, out: &mut Vec<Vector2<f64>>) {
    out.clear();
    let height = mask.height() as f64;
    let half_width = mask.width() as f64 / 2.0;
    for (row, col) in mask.iter_set() {
        out.push(Vector2::new(height - row as f64, half_width - col as f64));
    }
}

/// Rover-centric point to (distance, bearing). Bearing is signed radians
/// counter-clockwise from the forward axis, in (-pi, pi].
pub fn to_polar(p: &Vector2<f64>) -> (f64, f64) {
    (p.norm(), p.y.atan2(p.x))
}

/// Polar-convert a whole point list into paired distance/bearing buffers.
pub fn to_polar_lists(points: &[Vector2<f64>], dists: &mut Vec<f64>, angles: &mut Vec<f64>) {
    dists.clear();
    angles.clear();
    for p in points {
        let (dist, angle) = to_polar(p);
        dists.push(dist);
        angles.push(angle);
    }
}

/// Rotate a rover-centric point by the rover's yaw (degrees).
pub fn rotate(p: &Vector2<f64>, yaw_deg: f64) -> Vector2<f64> {
    Rotation2::new(yaw_deg.to_radians()) * p
}

/// Project rover-centric points into world-map cell indices.
///
/// Rotation by yaw, scaling from warped pixels to map cells, translation by
/// the rover's world position, then truncation to integers. Both axes are
/// clamped independently to `[0, map_size - 1]`; out-of-range evidence ends
/// up on the map border rather than out of bounds. `out` is cleared and
/// refilled with `(x, y)` cell pairs.
pub fn pix_to_world(
    points: &[Vector2<f64>],
    pose: &RoverPose,
    map_size: usize,
    scale: f64,
    out: &mut Vec<(usize, usize)>,
) {
    out.clear();
    let max_cell = (map_size - 1) as i64;
    let rotation = Rotation2::new(pose.yaw_deg.to_radians());
    for p in points {
        let rotated = rotation * p;
        let wx = rotated.x / scale + pose.x;
        let wy = rotated.y / scale + pose.y;
        let cx = (wx as i64).clamp(0, max_cell);
        let cy = (wy as i64).clamp(0, max_cell);
        out.push((cx as usize, cy as usize));
    }
}
