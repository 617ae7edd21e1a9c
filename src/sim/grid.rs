//! Tile grid
//!
//! Raw integer tile values are decoded once into [`Tile`] when the grid is built.

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::consts::{EMPTY_TILE, SOLID_THRESHOLD};

/// A decoded map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    /// Passable, invisible
    Empty,
    /// Opaque wall; terminates rays and blocks movement
    Solid(u8),
    /// See-through object; rays continue past it and the player walks through it
    Overlay(u8),
}

impl Tile {
    /// Decode a raw tile value. Values below the empty sentinel are invalid.
    pub fn from_raw(value: i32) -> Option<Self> {
        if value == EMPTY_TILE {
            Some(Tile::Empty)
        } else if value >= SOLID_THRESHOLD {
            u8::try_from(value - SOLID_THRESHOLD).ok().map(Tile::Solid)
        } else if value >= 0 {
            Some(Tile::Overlay(value as u8))
        } else {
            None
        }
    }

    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Solid(_))
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Tile::Empty)
    }
}

/// The classic 20x20 level: solid border, a few wall families and scattered objects
#[rustfmt::skip]
const DEFAULT_MAP: [[i32; 20]; 20] = [
    [10, 10, 10, 10, 10, 10, 12, 12, 12, 12, 12, 12, 12, 12, 14, 14, 14, 14, 14, 14],
    [10, -1, -1, -1, -1, 10, 12, -1, -1, -1, -1, -1,  4, 12, 14, -1, -1, -1, -1, 14],
    [10, -1, -1, -1, -1, 10, 12, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, 14],
    [10, -1, -1, -1, -1, 10, 12, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, 14],
    [10, -1, -1, -1, -1, 10, 12, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, 14],
    [10, -1, -1, -1, -1, 10, 12, -1, -1, -1, -1, -1,  2, 12, 14, 14, -1, -1, -1, 14],
    [10, -1, -1, -1, -1, 10, 12, -1, -1, -1, -1, -1, -1, 12, 14, -1, -1, -1, -1, 14],
    [10, -1, -1, -1, -1, 10, 12, -1, -1, -1, -1, -1, -1, 12, 14, -1, -1, -1, -1, 14],
    [10, -1, -1, -1, -1, 10, 12, -1, -1, -1, -1, -1, -1, 12, 14, -1, -1, -1, -1, 14],
    [10, 10, -1, -1, -1, 10, 12, -1, -1, -1, -1, -1, -1, 12, 14,  4, -1, -1, 14, 14],
    [10, -1, -1, -1, -1, 10, 12, -1, -1,  0, -1, -1, -1, 12, 14, -1, -1, -1, -1, 14],
    [10, -1, -1, -1, -1, 10, 12, 11, 11, 11, -1, -1, -1, 12, 14,  2, -1, -1, -1, 14],
    [10, -1, -1, -1, -1, 10, 12, -1, -1,  2, -1, -1, -1, 12, 14, -1, -1, -1, -1, 14],
    [10, -1, -1, -1,  0, 10, 12, -1, -1, -1, -1, -1, -1, 12, 14, 14, -1, -1, -1, 14],
    [10, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, 12, 14, -1, -1, -1, -1, 14],
    [10, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, 12, 14, -1, -1, -1, -1, 14],
    [10, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, 12, 14, -1, -1, -1, -1, 14],
    [10, -1, -1, -1,  0, 10, 12, -1, -1, -1, -1, -1, -1, 12, 14, -1, -1, -1, -1, 14],
    [10, -1, -1, -1, -1, 10, 12, -1, -1, -1, -1, -1, -1, 12, 14, -1, -1, -1, -1, 14],
    [10, 10, 10, 10, 10, 10, 12, 12, 12, 12, 12, 12, 12, 12, 14, 14, 14, 14, 14, 14],
];

/// Immutable rectangular tile grid, addressed as (row, col) = (y, x)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Build a grid from raw rows, validating shape and tile values
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Result<Self, Error> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(Error::EmptyGrid);
        }

        let mut tiles = Vec::with_capacity(width * height);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != width {
                return Err(Error::RaggedGrid {
                    row,
                    expected: width,
                    actual: values.len(),
                });
            }
            for (col, &value) in values.iter().enumerate() {
                let tile = Tile::from_raw(value).ok_or(Error::InvalidTile { row, col, value })?;
                tiles.push(tile);
            }
        }

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at (row, col), or `None` outside the grid
    #[inline]
    pub fn get(&self, row: i64, col: i64) -> Option<Tile> {
        if row < 0 || col < 0 || row >= self.height as i64 || col >= self.width as i64 {
            return None;
        }
        Some(self.tiles[row as usize * self.width + col as usize])
    }

    /// Tile at (row, col). Panics outside the grid; use [`Grid::get`] for unchecked coordinates.
    pub fn tile_at(&self, row: usize, col: usize) -> Tile {
        assert!(row < self.height && col < self.width, "tile ({row}, {col}) out of bounds");
        self.tiles[row * self.width + col]
    }

    /// Solid test that treats everything outside the grid as wall
    #[inline]
    pub fn is_solid(&self, row: i64, col: i64) -> bool {
        self.get(row, col).is_none_or(Tile::is_solid)
    }

    /// Highest material index used by any wall or overlay
    pub fn max_material(&self) -> Option<u8> {
        self.tiles
            .iter()
            .filter_map(|tile| match *tile {
                Tile::Empty => None,
                Tile::Solid(m) | Tile::Overlay(m) => Some(m),
            })
            .max()
    }

    /// Iterate rows of tiles, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width)
    }
}

impl Default for Grid {
    fn default() -> Self {
        // The built-in map is known-good
        Self::from_rows(&DEFAULT_MAP).unwrap_or_else(|_| unreachable!())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_decoding() {
        assert_eq!(Tile::from_raw(-1), Some(Tile::Empty));
        assert_eq!(Tile::from_raw(0), Some(Tile::Overlay(0)));
        assert_eq!(Tile::from_raw(4), Some(Tile::Overlay(4)));
        assert_eq!(Tile::from_raw(9), Some(Tile::Overlay(9)));
        assert_eq!(Tile::from_raw(10), Some(Tile::Solid(0)));
        assert_eq!(Tile::from_raw(14), Some(Tile::Solid(4)));
        assert_eq!(Tile::from_raw(-2), None);
    }

    #[test]
    fn test_default_grid() {
        let grid = Grid::default();
        assert_eq!(grid.width(), 20);
        assert_eq!(grid.height(), 20);
        assert_eq!(grid.tile_at(0, 0), Tile::Solid(0));
        assert_eq!(grid.tile_at(1, 12), Tile::Overlay(4));
        assert_eq!(grid.tile_at(11, 7), Tile::Solid(1));
        assert_eq!(grid.tile_at(3, 3), Tile::Empty);

        // Solid border all the way round
        for i in 0..20 {
            assert!(grid.tile_at(0, i).is_solid());
            assert!(grid.tile_at(19, i).is_solid());
            assert!(grid.tile_at(i, 0).is_solid());
            assert!(grid.tile_at(i, 19).is_solid());
        }
    }

    #[test]
    fn test_max_material() {
        assert_eq!(Grid::default().max_material(), Some(4));
        let open = Grid::from_rows(&[[-1, -1]]).unwrap();
        assert_eq!(open.max_material(), None);
    }

    #[test]
    fn test_bounds() {
        let grid = Grid::default();
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(0, 20), None);
        assert!(grid.is_solid(-1, 5));
        assert!(!grid.is_solid(3, 3));
    }

    #[test]
    fn test_rejects_bad_grids() {
        let empty: [[i32; 0]; 0] = [];
        assert!(matches!(Grid::from_rows(&empty), Err(Error::EmptyGrid)));

        let ragged = vec![vec![10, 10], vec![10]];
        assert!(matches!(
            Grid::from_rows(&ragged),
            Err(Error::RaggedGrid { row: 1, expected: 2, actual: 1 })
        ));

        let bad = vec![vec![10, -5]];
        assert!(matches!(
            Grid::from_rows(&bad),
            Err(Error::InvalidTile { row: 0, col: 1, value: -5 })
        ));
    }
}
