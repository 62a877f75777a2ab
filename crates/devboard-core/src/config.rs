//! Engine tuning knobs.

use crate::camera::BoardBounds;
use crate::history::MAX_UNDO_HISTORY;
use crate::input::PanModifier;
use crate::model::DEFAULT_STACKING;
use serde::{Deserialize, Serialize};

/// Configuration for an [`Engine`](crate::Engine).
///
/// Every field has a default so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Snapshots kept on each of the undo and redo stacks.
    pub history_capacity: usize,
    pub board_half_width: f64,
    pub board_half_height: f64,
    /// Half extents of the area new items are scattered over.
    pub spawn_half_width: f64,
    pub spawn_half_height: f64,
    /// Lowest stacking value considered by bring-to-front.
    pub stacking_floor: f64,
    /// Step added above the current maximum by bring-to-front.
    pub stacking_epsilon: f64,
    /// Offset applied to duplicates.
    pub duplicate_offset: [f64; 2],
    pub min_distance: f64,
    pub max_distance: f64,
    pub initial_distance: f64,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f64,
    /// Wheel delta to zoom factor scale.
    pub wheel_factor: f64,
    pub pan_modifier: PanModifier,
    /// Seed for item placement jitter. Random when unset.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: MAX_UNDO_HISTORY,
            board_half_width: 14.0,
            board_half_height: 8.0,
            spawn_half_width: 3.0,
            spawn_half_height: 1.5,
            stacking_floor: DEFAULT_STACKING,
            stacking_epsilon: 0.01,
            duplicate_offset: [0.5, -0.5],
            min_distance: 4.0,
            max_distance: 18.0,
            initial_distance: 10.0,
            fov_y_degrees: 50.0,
            wheel_factor: 0.001,
            pan_modifier: PanModifier::Alt,
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn bounds(&self) -> BoardBounds {
        BoardBounds::new(self.board_half_width, self.board_half_height)
    }

    /// Same config with a fixed placement seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}
