// redrock_core/src/perception/threshold.rs

use crate::config::ThresholdConfig;
use crate::types::{BinaryMask, RgbFrame};

/// Mark pixels bright enough in all three channels to be flat, lit ground.
/// Strictly above the floor on every channel.
pub fn navigable(frame: &RgbFrame, thresholds: &ThresholdConfig, mask: &mut BinaryMask) {
    let [r, g, b] = thresholds.navigable_floor;
    fill(frame, mask, |px| px[0] > r && px[1] > g && px[2] > b);
}

/// Mark pixels dark in all three channels as obstacle.
///
/// Not the complement of [`navigable`]: a pixel with mixed channels lands in
/// neither mask. That band is deliberate and the occupancy weighting is
/// tuned around it.
pub fn obstacle(frame: &RgbFrame, thresholds: &ThresholdConfig, mask: &mut BinaryMask) {
    let [r, g, b] = thresholds.obstacle_ceiling;
    fill(frame, mask, |px| px[0] < r && px[1] < g && px[2] < b);
}

/// Mark the distinct red/yellow of a sample rock: strong red and green with
/// very little blue.
pub fn rock(frame: &RgbFrame, thresholds: &ThresholdConfig, mask: &mut BinaryMask) {
    let [r, g] = thresholds.rock_floor_rg;
    let b = thresholds.rock_ceiling_b;
    fill(frame, mask, |px| px[0] > r && px[1] > g && px[2] < b);
}

fn fill(frame: &RgbFrame, mask: &mut BinaryMask, predicate: impl Fn([u8; 3]) -> bool) {
    debug_assert_eq!(frame.width(), mask.width());
    debug_assert_eq!(frame.height(), mask.height());
    for row in 0..frame.height() {
        for col in 0..frame.width() {
            mask.put(row, col, predicate(frame.get(row, col)));
        }
    }
}
