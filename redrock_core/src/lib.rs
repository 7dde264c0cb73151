// redrock_core/src/lib.rs

//! Perception-to-action core for an autonomous sample-return rover.
//!
//! Each simulation tick the external harness hands the perception stage one
//! camera frame and the rover's pose; the stage warps the frame into a
//! top-down view, classifies terrain, accumulates evidence into the world
//! occupancy map, and publishes bearing lists. The decision stage then
//! turns those bearings plus the rover's kinematic state into throttle,
//! brake, and steering commands. Everything else (simulator bridge,
//! localisation, drive transport) lives outside this crate.

pub mod config;
pub mod decision;
pub mod error;
pub mod perception;
pub mod prelude;
pub mod types;
