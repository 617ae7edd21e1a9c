//! World state
//!
//! Everything the simulation mutates between frames lives here. Rendering only
//! ever sees a read-only snapshot of it.

use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::player::Player;
use crate::settings::ViewSettings;

/// The scene: immutable map, the player, and runtime view settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub grid: Grid,
    pub player: Player,
    pub view: ViewSettings,
    /// Ticks simulated so far
    pub time_ticks: u64,
}

impl World {
    pub fn new(grid: Grid, player: Player, view: ViewSettings) -> Self {
        Self {
            grid,
            player,
            view,
            time_ticks: 0,
        }
    }
}
