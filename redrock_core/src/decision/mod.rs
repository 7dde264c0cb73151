// redrock_core/src/decision/mod.rs

use tracing::debug;

use crate::config::DecisionConfig;
use crate::types::{NavTarget, RoverMode, RoverState};

/// Steering is clamped to a 15 degree deflection while driving. Fixed
/// mechanical envelope, not a tunable.
const STEER_LIMIT_DEG: f64 = 15.0;
/// Below this velocity a braking rover counts as halted.
const HALT_VEL: f64 = 0.2;

/// Run the decision state machine for one tick, after perception.
///
/// Reads the bearing lists and kinematic flags, writes the control triple
/// (throttle, brake, steer), the mode, the `send_pickup` signal, and the
/// samples-found counter.
///
/// Note for integrators: `samples_found` increments on every tick in which
/// the rover sits stationary beside a sample and no pickup is executing, so
/// a single sample can be counted several times while the rover waits.
/// Deliberately kept as observed in the field.
pub fn decide(state: &mut RoverState, config: &DecisionConfig) {
    // A visible sample supersedes terrain navigation; perception has
    // already swapped the bearing lists to point at it.
    match state.target {
        NavTarget::Sample => set_mode(state, RoverMode::Pickup),
        NavTarget::Terrain if state.mode == RoverMode::Pickup => {
            set_mode(state, RoverMode::Forward)
        }
        _ => {}
    }

    if state.target == NavTarget::None {
        // Perception has produced nothing at all yet. Creep forward rather
        // than stall indefinitely.
        state.throttle = config.throttle_set;
        state.steer = 0.0;
        state.brake = 0.0;
    } else {
        match state.mode {
            RoverMode::Forward => forward(state, config),
            RoverMode::Pickup => pickup(state, config),
            RoverMode::Stop => stop(state, config),
        }
    }

    if state.near_sample && state.vel == 0.0 && !state.picking_up {
        state.samples_found += 1;
    }
}

fn forward(state: &mut RoverState, config: &DecisionConfig) {
    state.pickup_done = false;

    if state.nav_angles.len() >= config.stop_forward {
        // Enough open terrain ahead: cruise, coasting once at speed.
        state.throttle = if state.vel < config.max_vel {
            config.throttle_set
        } else {
            0.0
        };
        state.brake = 0.0;
        state.steer = mean_bearing_deg(&state.nav_angles).clamp(-STEER_LIMIT_DEG, STEER_LIMIT_DEG);
    } else {
        // Terrain ran out: hard stop and hand over to the stop logic.
        state.throttle = 0.0;
        state.brake = config.brake_set;
        state.steer = 0.0;
        set_mode(state, RoverMode::Stop);
    }
}

fn pickup(state: &mut RoverState, config: &DecisionConfig) {
    // The bearings point at the rock, so track it without the driving
    // clamp; precision matters more than ride comfort here.
    state.steer = mean_bearing_deg(&state.nav_angles);

    if state.near_sample && state.vel == 0.0 && !state.picking_up && !state.pickup_done {
        // Halted at the sample and nothing in flight: request the pickup.
        halt(state, config);
        state.send_pickup = true;
        state.pickup_done = true;
        set_mode(state, RoverMode::Stop);
    } else if state.near_sample && !state.pickup_done {
        // In range but still rolling: keep braking until fully halted.
        halt(state, config);
    } else if state.near_sample && state.pickup_done {
        // Request already issued this approach.
        halt(state, config);
        set_mode(state, RoverMode::Stop);
    }
}

fn stop(state: &mut RoverState, config: &DecisionConfig) {
    state.pickup_done = false;

    if state.vel > HALT_VEL {
        // Still moving: keep the brakes on until fully halted.
        halt(state, config);
        return;
    }

    if state.nav_angles.len() < config.go_forward {
        // Not enough terrain to commit: release the brake and pivot in the
        // fixed search direction until a heading opens up.
        state.throttle = 0.0;
        state.brake = 0.0;
        state.steer = -STEER_LIMIT_DEG;
    }
    if state.nav_angles.len() >= config.go_forward {
        state.throttle = config.throttle_set;
        state.brake = 0.0;
        state.steer = mean_bearing_deg(&state.nav_angles).clamp(-STEER_LIMIT_DEG, STEER_LIMIT_DEG);
        set_mode(state, RoverMode::Forward);
    }
}

fn halt(state: &mut RoverState, config: &DecisionConfig) {
    state.brake = config.brake_set;
    state.throttle = 0.0;
    state.steer = 0.0;
}

/// Mean of the bearing list, in degrees. An empty list steers straight.
fn mean_bearing_deg(angles: &[f64]) -> f64 {
    if angles.is_empty() {
        return 0.0;
    }
    let mean = angles.iter().sum::<f64>() / angles.len() as f64;
    mean.to_degrees()
}

fn set_mode(state: &mut RoverState, mode: RoverMode) {
    if state.mode != mode {
        debug!(from = ?state.mode, to = ?mode, "mode transition");
        state.mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn state_with_bearings(n: usize, bearing: f64) -> RoverState {
        RoverState {
            target: NavTarget::Terrain,
            nav_angles: vec![bearing; n],
            nav_dists: vec![1.0; n],
            ..RoverState::default()
        }
    }

    #[test]
    fn no_bearing_data_creeps_forward() {
        let config = DecisionConfig::default();
        let mut state = RoverState::default();
        assert_eq!(state.target, NavTarget::None);

        decide(&mut state, &config);
        assert_eq!(state.throttle, config.throttle_set);
        assert_eq!(state.brake, 0.0);
        assert_eq!(state.steer, 0.0);
        assert_eq!(state.mode, RoverMode::Forward);
    }

    #[test]
    fn forward_with_scarce_terrain_brakes_into_stop() {
        let config = DecisionConfig::default();
        let mut state = state_with_bearings(config.stop_forward - 1, 0.1);
        state.mode = RoverMode::Forward;

        decide(&mut state, &config);
        assert_eq!(state.mode, RoverMode::Stop);
        assert_eq!(state.throttle, 0.0);
        assert_eq!(state.brake, config.brake_set);
        assert_eq!(state.steer, 0.0);
    }

    #[test]
    fn forward_with_open_terrain_cruises_on_the_mean_bearing() {
        let config = DecisionConfig::default();
        // 0.1 rad mean is about 5.7 degrees, inside the clamp.
        let mut state = state_with_bearings(config.stop_forward, 0.1);
        state.vel = 1.0;

        decide(&mut state, &config);
        assert_eq!(state.mode, RoverMode::Forward);
        assert_eq!(state.throttle, config.throttle_set);
        assert_eq!(state.brake, 0.0);
        assert_abs_diff_eq!(state.steer, 0.1f64.to_degrees(), epsilon = 1e-9);
    }

    #[test]
    fn forward_steering_is_clamped_at_fifteen_degrees() {
        let config = DecisionConfig::default();
        // 1.0 rad mean is about 57 degrees.
        let mut state = state_with_bearings(config.stop_forward, 1.0);

        decide(&mut state, &config);
        assert_eq!(state.steer, 15.0);
    }

    #[test]
    fn forward_at_max_velocity_coasts() {
        let config = DecisionConfig::default();
        let mut state = state_with_bearings(config.stop_forward, 0.0);
        state.vel = config.max_vel;

        decide(&mut state, &config);
        assert_eq!(state.throttle, 0.0);
        assert_eq!(state.brake, 0.0);
    }

    #[test]
    fn stop_while_moving_keeps_braking() {
        let config = DecisionConfig::default();
        let mut state = state_with_bearings(config.go_forward, 0.0);
        state.mode = RoverMode::Stop;
        state.vel = 1.5;

        decide(&mut state, &config);
        assert_eq!(state.mode, RoverMode::Stop);
        assert_eq!(state.brake, config.brake_set);
        assert_eq!(state.throttle, 0.0);
    }

    #[test]
    fn stop_when_halted_with_open_terrain_resumes_forward() {
        let config = DecisionConfig::default();
        let mut state = state_with_bearings(config.go_forward, 0.05);
        state.mode = RoverMode::Stop;
        state.vel = 0.1;

        decide(&mut state, &config);
        assert_eq!(state.mode, RoverMode::Forward);
        assert_eq!(state.brake, 0.0);
        assert_eq!(state.throttle, config.throttle_set);
        assert_abs_diff_eq!(state.steer, 0.05f64.to_degrees(), epsilon = 1e-9);
    }

    #[test]
    fn stop_when_halted_without_terrain_pivots_to_search() {
        let config = DecisionConfig::default();
        let mut state = state_with_bearings(config.go_forward - 1, 0.0);
        state.mode = RoverMode::Stop;
        state.vel = 0.0;

        decide(&mut state, &config);
        assert_eq!(state.mode, RoverMode::Stop);
        assert_eq!(state.brake, 0.0);
        assert_eq!(state.throttle, 0.0);
        assert_eq!(state.steer, -15.0);
    }

    #[test]
    fn sample_target_forces_pickup_pursuit() {
        let config = DecisionConfig::default();
        let mut state = state_with_bearings(3, 0.5);
        state.target = NavTarget::Sample;
        state.mode = RoverMode::Forward;

        decide(&mut state, &config);
        assert_eq!(state.mode, RoverMode::Pickup);
        // Pickup steering is unclamped.
        assert_abs_diff_eq!(state.steer, 0.5f64.to_degrees(), epsilon = 1e-9);
    }

    #[test]
    fn halted_at_the_sample_issues_exactly_one_pickup() {
        let config = DecisionConfig::default();
        let mut state = state_with_bearings(3, 0.0);
        state.target = NavTarget::Sample;
        state.mode = RoverMode::Pickup;
        state.near_sample = true;
        state.vel = 0.0;

        decide(&mut state, &config);
        assert!(state.send_pickup);
        assert!(state.pickup_done);
        assert_eq!(state.mode, RoverMode::Stop);
        assert_eq!(state.brake, config.brake_set);
        assert_eq!(state.throttle, 0.0);
        assert_eq!(state.steer, 0.0);
        assert_eq!(state.samples_found, 1);
    }

    #[test]
    fn approaching_the_sample_brakes_without_signalling() {
        let config = DecisionConfig::default();
        let mut state = state_with_bearings(3, 0.2);
        state.target = NavTarget::Sample;
        state.mode = RoverMode::Pickup;
        state.near_sample = true;
        state.vel = 0.8;

        decide(&mut state, &config);
        assert!(!state.send_pickup);
        assert!(!state.pickup_done);
        assert_eq!(state.mode, RoverMode::Pickup);
        assert_eq!(state.brake, config.brake_set);
    }

    #[test]
    fn terrain_target_reverts_pickup_mode_to_forward() {
        let config = DecisionConfig::default();
        let mut state = state_with_bearings(config.stop_forward, 0.0);
        state.mode = RoverMode::Pickup;

        decide(&mut state, &config);
        assert_eq!(state.mode, RoverMode::Forward);
    }

    #[test]
    fn samples_found_counts_every_stationary_tick() {
        // Known quirk: the counter fires per qualifying tick, not per
        // sample.
        let config = DecisionConfig::default();
        let mut state = state_with_bearings(config.go_forward - 1, 0.0);
        state.mode = RoverMode::Stop;
        state.near_sample = true;
        state.vel = 0.0;

        decide(&mut state, &config);
        decide(&mut state, &config);
        assert_eq!(state.samples_found, 2);
    }
}
