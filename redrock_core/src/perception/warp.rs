// redrock_core/src/perception/warp.rs

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

use crate::error::ConfigError;
use crate::types::RgbFrame;

/// The projective transform that maps the camera's view of the calibration
/// patch onto a top-down rectangle.
///
/// Built once at startup from the two ordered quadrilaterals; a set of
/// points that does not determine a unique invertible homography is a
/// configuration fault, never a per-frame one.
#[derive(Debug, Clone)]
pub struct PerspectiveTransform {
    /// Source-image coordinates to warped coordinates.
    forward: Matrix3<f64>,
    /// Warped coordinates back to source-image coordinates, used for
    /// inverse-mapped resampling.
    inverse: Matrix3<f64>,
}

impl PerspectiveTransform {
    /// Solve the standard 8x8 linear system for the homography taking each
    /// `src[i]` to `dst[i]`.
    pub fn from_quads(src: &[[f64; 2]; 4], dst: &[[f64; 2]; 4]) -> Result<Self, ConfigError> {
        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();

        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            let [x, y] = *s;
            let [u, v] = *d;
            let r = 2 * i;
            // u = (h0 x + h1 y + h2) / (h6 x + h7 y + 1)
            a[(r, 0)] = x;
            a[(r, 1)] = y;
            a[(r, 2)] = 1.0;
            a[(r, 6)] = -u * x;
            a[(r, 7)] = -u * y;
            b[r] = u;
            // v = (h3 x + h4 y + h5) / (h6 x + h7 y + 1)
            a[(r + 1, 3)] = x;
            a[(r + 1, 4)] = y;
            a[(r + 1, 5)] = 1.0;
            a[(r + 1, 6)] = -v * x;
            a[(r + 1, 7)] = -v * y;
            b[r + 1] = v;
        }

        let h = a.lu().solve(&b).ok_or(ConfigError::DegenerateQuad(
            "points do not determine a unique projective transform",
        ))?;

        let forward = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);
        let inverse = forward.try_inverse().ok_or(ConfigError::DegenerateQuad(
            "projective transform is not invertible",
        ))?;

        Ok(Self { forward, inverse })
    }

    /// Map a source-image point into warped coordinates. `None` for the
    /// degenerate case of a point projecting to the line at infinity.
    pub fn apply(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        project(&self.forward, x, y)
    }

    /// Warp `src` into `out` (same dimensions) by inverse mapping with
    /// nearest-neighbour sampling.
    ///
    /// Output pixels whose pre-image falls outside the source frame are
    /// written as black. The region outside the calibration patch is
    /// garbage by contract; the classifiers zero it out downstream.
    pub fn warp(&self, src: &RgbFrame, out: &mut RgbFrame) {
        debug_assert_eq!(src.width(), out.width());
        debug_assert_eq!(src.height(), out.height());

        let width = out.width() as isize;
        let height = out.height() as isize;

        for row in 0..out.height() {
            for col in 0..out.width() {
                let px = match project(&self.inverse, col as f64, row as f64) {
                    Some((x, y)) => {
                        let sx = x.round() as isize;
                        let sy = y.round() as isize;
                        if sx >= 0 && sx < width && sy >= 0 && sy < height {
                            src.get(sy as usize, sx as usize)
                        } else {
                            [0, 0, 0]
                        }
                    }
                    None => [0, 0, 0],
                };
                out.put(row, col, px);
            }
        }
    }
}

/// Apply a homography to a point. `None` when the point maps to the line at
/// infinity.
fn project(m: &Matrix3<f64>, x: f64, y: f64) -> Option<(f64, f64)> {
    let p = m * Vector3::new(x, y, 1.0);
    if p.z.abs() < f64::EPSILON {
        return None;
    }
    Some((p.x / p.z, p.y / p.z))
}
