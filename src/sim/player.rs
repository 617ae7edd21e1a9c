//! Player pose and velocity

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{direction, normalize_degrees};

/// The camera/player
///
/// Position is in tile units (1.0 = one tile), angle in degrees within [0, 360).
/// Velocities are per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: DVec2,
    /// Facing (degrees, 0 = +x, 90 = +y)
    angle: f64,
    pub vel: DVec2,
    /// Turn rate (degrees per tick)
    pub angular_vel: f64,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PLAYER_START_X, PLAYER_START_Y, PLAYER_START_ANGLE)
    }
}

impl Player {
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
            angle: normalize_degrees(angle),
            vel: DVec2::ZERO,
            angular_vel: 0.0,
        }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Set facing; always renormalized into [0, 360)
    pub fn set_angle(&mut self, angle: f64) {
        self.angle = normalize_degrees(angle);
    }

    /// Push velocity along the facing rotated by `offset` degrees
    /// (0 = forward, 180 = backward, -90 = strafe left, 90 = strafe right)
    pub fn thrust(&mut self, offset: f64, amount: f64) {
        self.vel += direction(self.angle + offset) * amount;
    }

    /// Add to the turn rate (positive turns clockwise on screen)
    pub fn turn(&mut self, amount: f64) {
        self.angular_vel += amount;
    }

    /// Apply the turn rate to the facing, then decay it
    pub fn integrate_turn(&mut self) {
        self.set_angle(self.angle + self.angular_vel);
        self.angular_vel *= DAMPING;
    }

    /// Speed in tiles per tick
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }
}
