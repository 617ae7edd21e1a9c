//! Raycaster - a 90's style 2.5D software renderer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile grid, player movement, collisions)
//! - `renderer`: CPU raycasting pipeline (ray tracer, column renderer, band scheduler)
//! - `settings`: View and render settings (JSON on disk)
//! - `stats`: Frame time tracking

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod stats;

pub use error::Error;
pub use settings::{RenderSettings, Settings, ViewSettings};
pub use stats::FrameTimes;

/// Engine configuration constants
pub mod consts {
    /// Tile value marking an empty, passable cell
    pub const EMPTY_TILE: i32 = -1;
    /// Tile values at or above this are opaque walls (material = value - threshold)
    pub const SOLID_THRESHOLD: i32 = 10;

    /// Side length of one material block in the texture atlas (texels)
    pub const TEXTURE_BLOCK: usize = 64;
    /// Minimum atlas size: overlay row on top, wall row below, 4 materials wide
    pub const MIN_ATLAS_WIDTH: usize = 256;
    pub const MIN_ATLAS_HEIGHT: usize = 128;

    /// Velocity added per thrust/strafe intent (tiles per tick)
    pub const THRUST: f64 = 1.0 / 100.0;
    /// Angular velocity added per turn intent (degrees per tick)
    pub const TURN_RATE: f64 = 1.0;
    /// Per-tick velocity decay (friction)
    pub const DAMPING: f64 = 0.9;

    /// Default starting pose
    pub const PLAYER_START_X: f64 = 3.0;
    pub const PLAYER_START_Y: f64 = 3.0;
    pub const PLAYER_START_ANGLE: f64 = 45.0;

    /// Background fills
    pub const CEILING_COLOR: (u8, u8, u8) = (56, 56, 56);
    pub const FLOOR_COLOR: (u8, u8, u8) = (112, 112, 112);
    pub const SIDE_PANEL_COLOR: (u8, u8, u8) = (50, 50, 50);
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Unit direction vector for an angle in degrees (y grows downward, like the grid rows)
#[inline]
pub fn direction(angle_deg: f64) -> glam::DVec2 {
    let r = angle_deg.to_radians();
    glam::DVec2::new(r.cos(), r.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_degrees_wraps() {
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert_eq!(normalize_degrees(-1e-20), 0.0);
    }

    proptest! {
        #[test]
        fn normalized_angle_in_range(a in -1.0e6f64..1.0e6) {
            let n = normalize_degrees(a);
            prop_assert!((0.0..360.0).contains(&n));
        }
    }
}
