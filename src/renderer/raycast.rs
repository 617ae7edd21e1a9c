//! Grid ray tracer
//!
//! Rays are marched from grid line to grid line (DDA). Each tile the ray
//! enters is sampled: the first solid wall ends the ray, overlay objects are
//! recorded and the ray keeps going so whatever stands behind them is found.
//!
//! Angles are in degrees, 0 = +x, 90 = +y (grid rows grow downward).

use glam::DVec2;

use crate::normalize_degrees;
use crate::sim::{Grid, Tile, directional_cell};

/// One surface sample along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Distance from the player, fish-eye corrected when enabled
    pub distance: f64,
    /// Material index (block column in the atlas)
    pub material: u8,
    /// Position along the tile face, [0, 1)
    pub offset: f64,
}

impl Hit {
    /// Atlas-global texel column for this hit
    #[inline]
    pub fn texture_u(&self, block: usize) -> usize {
        self.material as usize * block + (self.offset * block as f64) as usize
    }
}

/// Depth-ordered hits for one column, farthest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RayHits {
    pub walls: Vec<Hit>,
    pub overlays: Vec<Hit>,
}

impl RayHits {
    /// Sort both lists back-to-front. The sort is stable, so hits at exactly the
    /// same distance keep their discovery order instead of replacing each other.
    pub fn sort_back_to_front(&mut self) {
        let far_first = |a: &Hit, b: &Hit| b.distance.total_cmp(&a.distance);
        self.walls.sort_by(far_first);
        self.overlays.sort_by(far_first);
    }

    pub fn nearest_wall(&self) -> Option<&Hit> {
        self.walls.last()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty() && self.overlays.is_empty()
    }
}

/// Ray angle for a screen column: the view sweeps from `angle - fov/2` on the
/// left edge to `angle + fov/2` on the right
#[inline]
pub fn column_angle(view_angle: f64, fov: f64, column: usize, viewport_width: usize) -> f64 {
    normalize_degrees(view_angle - fov / 2.0 + fov * column as f64 / viewport_width as f64)
}

#[inline]
fn tan_deg(deg: f64) -> f64 {
    deg.to_radians().tan()
}

/// Distance to the next grid line toward +inf, in (0, 1]
#[inline]
fn ahead_positive(c: f64) -> f64 {
    1.0 + c.floor() - c
}

/// Distance to the next grid line toward -inf, in (0, 1]
#[inline]
fn ahead_negative(c: f64) -> f64 {
    1.0 - c.ceil() + c
}

/// Advance a ray exactly onto the next vertical or horizontal grid line.
///
/// In each quadrant the angle to the corner of the current tile decides which
/// line is reached first.
pub fn dda_step(p: DVec2, angle: f64) -> DVec2 {
    let (x, y) = (p.x, p.y);

    if angle <= 90.0 {
        let dx = ahead_positive(x);
        let dy = ahead_positive(y);
        let corner = (dy / dx).atan().to_degrees();
        if corner >= angle {
            DVec2::new(x + dx, y + tan_deg(angle) * dx)
        } else {
            DVec2::new(x + dy / tan_deg(angle), y + dy)
        }
    } else if angle < 180.0 {
        let dx = ahead_negative(x);
        let dy = ahead_positive(y);
        let corner = 90.0 + (dx / dy).atan().to_degrees();
        if corner <= angle {
            DVec2::new(x - dx, y + dx / tan_deg(angle - 90.0))
        } else {
            DVec2::new(x - tan_deg(angle - 90.0) * dy, y + dy)
        }
    } else if angle < 270.0 {
        let dx = ahead_negative(x);
        let dy = ahead_negative(y);
        let corner = 180.0 + (dy / dx).atan().to_degrees();
        if corner > angle {
            DVec2::new(x - dx, y - tan_deg(angle - 180.0) * dx)
        } else {
            DVec2::new(x - dy / tan_deg(angle - 180.0), y - dy)
        }
    } else {
        let dx = ahead_positive(x);
        let dy = ahead_negative(y);
        let corner = 270.0 + (dx / dy).atan().to_degrees();
        if corner > angle {
            DVec2::new(x + tan_deg(angle - 270.0) * dy, y - dy)
        } else {
            DVec2::new(x + dx, y - dx / tan_deg(angle - 270.0))
        }
    }
}

/// Casts rays from one viewpoint through a grid
#[derive(Debug, Clone, Copy)]
pub struct RayCaster<'a> {
    pub grid: &'a Grid,
    pub origin: DVec2,
    /// Facing of the camera; the fish-eye correction is relative to this
    pub view_angle: f64,
    pub perspective_correction: bool,
    /// Upper bound on DDA steps per ray
    pub step_budget: u32,
}

impl RayCaster<'_> {
    /// March one ray and collect what it sees, farthest first.
    ///
    /// Stops at the first solid wall, on leaving the grid, when the step budget
    /// runs out, or if the ray stops moving.
    pub fn cast(&self, ray_angle: f64) -> RayHits {
        let ray_angle = normalize_degrees(ray_angle);
        let heading_neg_x = ray_angle > 90.0 && ray_angle < 270.0;
        let heading_neg_y = ray_angle > 180.0 && ray_angle < 360.0;
        let correction = if self.perspective_correction {
            (ray_angle - self.view_angle).to_radians().cos()
        } else {
            1.0
        };

        let width = self.grid.width() as f64;
        let height = self.grid.height() as f64;

        let mut hits = RayHits::default();
        let mut ray = self.origin;
        let mut last: Option<DVec2> = None;

        for _ in 0..self.step_budget {
            if !(ray.x > 0.0 && ray.y > 0.0 && ray.x < width && ray.y < height) {
                break;
            }
            if last == Some(ray) {
                break;
            }
            last = Some(ray);

            let col = directional_cell(ray.x, heading_neg_x);
            let row = directional_cell(ray.y, heading_neg_y);

            if let Some(tile) = self.grid.get(row, col) {
                let sample = || Hit {
                    distance: self.origin.distance(ray) * correction,
                    material: 0,
                    offset: ((ray.x - col as f64) + (ray.y - row as f64)).fract(),
                };
                match tile {
                    Tile::Empty => {}
                    Tile::Solid(material) => {
                        hits.walls.push(Hit { material, ..sample() });
                        break;
                    }
                    Tile::Overlay(material) => {
                        hits.overlays.push(Hit { material, ..sample() });
                    }
                }
            }

            ray = dda_step(ray, ray_angle);
        }

        hits.sort_back_to_front();
        hits
    }
}
