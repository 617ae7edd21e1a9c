//! Axis-separated tile collision
//!
//! Movement is tested one axis at a time against the solid tiles of the grid.
//! The player is treated as spanning its tile plus the two tiles beside it,
//! so a crossing into a new column (row) is blocked when that column (row)
//! holds a wall at the player's row (column) or either neighbour.

use glam::DVec2;

use super::grid::Grid;
use crate::consts::DAMPING;

/// Tile index containing `coord`, rounding toward the direction of travel.
///
/// Heading toward decreasing coordinates, a point exactly on a grid line
/// belongs to the tile on the far side of that line (`ceil(c) - 1`), not
/// the one just left behind.
#[inline]
pub fn directional_cell(coord: f64, heading_negative: bool) -> i64 {
    if heading_negative {
        coord.ceil() as i64 - 1
    } else {
        coord.floor() as i64
    }
}

/// Which axes of a proposed move run into a wall
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisCollision {
    pub x: bool,
    pub y: bool,
}

impl AxisCollision {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Check a move of `vel` from `pos`, each axis independently
pub fn check_move(grid: &Grid, pos: DVec2, vel: DVec2) -> AxisCollision {
    let next = pos + vel;
    let col = pos.x.floor() as i64;
    let row = pos.y.floor() as i64;

    let target_col = directional_cell(next.x, vel.x < 0.0);
    let target_row = directional_cell(next.y, vel.y < 0.0);

    // Only a crossing into a new tile can collide; this keeps a player who
    // starts next to a wall from being pinned in place
    let x = target_col != col && (-1..=1).any(|d| grid.is_solid(row + d, target_col));
    let y = target_row != row && (-1..=1).any(|d| grid.is_solid(target_row, col + d));

    AxisCollision { x, y }
}

/// Integrate velocity into position, resolving collisions positionally.
///
/// Every free axis moves by its full velocity; a blocked axis keeps its old
/// coordinate. Damping comes after the move: a blocked axis loses its
/// velocity, the axis sliding along the wall gets an extra damping pass, and
/// every free axis is damped once more (friction). Returns what was hit.
pub fn move_and_slide(grid: &Grid, pos: &mut DVec2, vel: &mut DVec2) -> AxisCollision {
    let hit = check_move(grid, *pos, *vel);

    if !hit.x {
        pos.x += vel.x;
    }
    if !hit.y {
        pos.y += vel.y;
    }

    if hit.x {
        vel.x = 0.0;
        if !hit.y {
            vel.y *= DAMPING;
        }
    }
    if hit.y {
        vel.y = 0.0;
        if !hit.x {
            vel.x *= DAMPING;
        }
    }

    if !hit.x {
        vel.x *= DAMPING;
    }
    if !hit.y {
        vel.y *= DAMPING;
    }

    hit
}
