//! Top-down map in the side panel

use super::canvas::{Canvas, Rgb};
use crate::direction;
use crate::sim::{Grid, Player, Tile};

/// Length of the facing and FOV lines, in tiles
const SIGHT_LINE_TILES: f64 = 12.0;
/// Gap between neighbouring tile outlines (pixels)
const TILE_INSET: i64 = 2;

fn tile_color(tile: Tile) -> Option<Rgb> {
    match tile {
        Tile::Empty => None,
        Tile::Overlay(_) => Some(Rgb::ORANGE),
        Tile::Solid(0) => Some(Rgb::BLACK),
        Tile::Solid(2) => Some(Rgb::CYAN),
        Tile::Solid(4) => Some(Rgb::LIGHT_GRAY),
        Tile::Solid(_) => Some(Rgb::new(90, 60, 30)),
    }
}

/// Draws the grid, the player and its view cone into a side panel canvas
pub struct Minimap {
    pub tile_size: usize,
}

impl Minimap {
    fn to_screen(&self, x: f64, y: f64) -> (i64, i64) {
        let ts = self.tile_size as f64;
        ((x * ts) as i64, (y * ts) as i64)
    }

    pub fn draw(&self, canvas: &mut Canvas, grid: &Grid, player: &Player, fov: f64) {
        let ts = self.tile_size as i64;

        for (row, tiles) in grid.rows().enumerate() {
            for (col, &tile) in tiles.iter().enumerate() {
                if let Some(color) = tile_color(tile) {
                    canvas.stroke_rect(
                        col as i64 * ts + TILE_INSET,
                        row as i64 * ts + TILE_INSET,
                        ts - 2 * TILE_INSET,
                        ts - 2 * TILE_INSET,
                        color,
                    );
                }
            }
        }

        // Player tile
        let (px, py) = self.to_screen(player.pos.x.floor(), player.pos.y.floor());
        canvas.stroke_rect(px, py, ts, ts, Rgb::WHITE);

        // Facing line and view cone
        let reach = SIGHT_LINE_TILES;
        let (cx, cy) = self.to_screen(player.pos.x, player.pos.y);
        let tip = |angle: f64| {
            let p = player.pos + direction(angle) * reach;
            self.to_screen(p.x, p.y)
        };
        let (fx, fy) = tip(player.angle());
        let (lx, ly) = tip(player.angle() - fov / 2.0);
        let (rx, ry) = tip(player.angle() + fov / 2.0);

        canvas.line(cx, cy, fx, fy, Rgb::GREEN);
        canvas.line(cx, cy, lx, ly, Rgb::GREEN);
        canvas.line(cx, cy, rx, ry, Rgb::GREEN);
        canvas.line(lx, ly, rx, ry, Rgb::GREEN);
    }
}
