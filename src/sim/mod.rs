//! Deterministic simulation module
//!
//! The map, the player, and how the player moves through the map. Pure and
//! deterministic:
//! - One fixed step per frame
//! - No rendering or platform dependencies

pub mod collision;
pub mod grid;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{AxisCollision, check_move, directional_cell, move_and_slide};
pub use grid::{Grid, Tile};
pub use player::Player;
pub use state::World;
pub use tick::{Action, TickInput, apply_action, tick};
