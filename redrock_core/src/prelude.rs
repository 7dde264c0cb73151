// redrock_core/src/prelude.rs

// --- The stage entry points ---
pub use crate::decision::decide;
pub use crate::perception::Perception;

// --- Core data structures (the "nouns" of the library) ---
pub use crate::perception::worldmap::{VisionImage, WorldMap};
pub use crate::types::{BinaryMask, NavTarget, RgbFrame, RoverMode, RoverPose, RoverState};

// --- Configuration and errors ---
pub use crate::config::{DecisionConfig, PerceptionConfig};
pub use crate::error::ConfigError;
