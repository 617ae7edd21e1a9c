//! Texture atlas
//!
//! The atlas is a grid of 64x64 material blocks. The top row holds overlay
//! objects (a texel with no green is transparent), the second row holds walls.
//! Material `m` lives in block column `m`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::canvas::{Canvas, Rgb};
use crate::Error;
use crate::consts::{MIN_ATLAS_HEIGHT, MIN_ATLAS_WIDTH, TEXTURE_BLOCK};
use crate::sim::Grid;

/// Which atlas row a material is sampled from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Overlay,
    Wall,
}

impl Layer {
    fn row_offset(self) -> usize {
        match self {
            Layer::Overlay => 0,
            Layer::Wall => TEXTURE_BLOCK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureAtlas {
    image: Canvas,
}

impl TextureAtlas {
    /// Wrap a decoded image, rejecting anything smaller than two rows of four blocks
    pub fn new(image: Canvas) -> Result<Self, Error> {
        if image.width() < MIN_ATLAS_WIDTH || image.height() < MIN_ATLAS_HEIGHT {
            return Err(Error::TextureTooSmall {
                width: image.width(),
                height: image.height(),
                min_width: MIN_ATLAS_WIDTH,
                min_height: MIN_ATLAS_HEIGHT,
            });
        }
        Ok(Self { image })
    }

    /// Build from packed RGB bytes (as produced by an image decoder)
    pub fn from_rgb8(width: usize, height: usize, bytes: &[u8]) -> Result<Self, Error> {
        let expected = width * height * 3;
        if bytes.len() != expected {
            return Err(Error::TextureDataLength {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|p| Rgb::new(p[0], p[1], p[2]))
            .collect();
        let image = Canvas::from_pixels(width, height, pixels).ok_or(Error::TextureDataLength {
            width,
            height,
            expected,
            actual: bytes.len(),
        })?;
        Self::new(image)
    }

    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn height(&self) -> usize {
        self.image.height()
    }

    /// Number of whole 64-texel material columns
    pub fn materials(&self) -> usize {
        self.image.width() / TEXTURE_BLOCK
    }

    /// Check that every material the grid uses has its own block column
    pub fn ensure_covers(&self, grid: &Grid) -> Result<(), Error> {
        match grid.max_material() {
            Some(material) if material as usize >= self.materials() => Err(Error::MissingMaterial {
                material,
                available: self.materials(),
            }),
            _ => Ok(()),
        }
    }

    /// Raw texel lookup, clamped to the atlas edges
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Rgb {
        let x = x.min(self.image.width() - 1);
        let y = y.min(self.image.height() - 1);
        self.image.get(x, y).unwrap_or_default()
    }

    /// Sample one material. `u` is the atlas-global column (material * 64 +
    /// offset), floored at 1 to keep the previous block's edge from bleeding in;
    /// `row` is the texel row within the block (0..64).
    #[inline]
    pub fn sample(&self, layer: Layer, u: usize, row: usize) -> Rgb {
        let row = row.min(TEXTURE_BLOCK - 1);
        self.get_pixel(u.max(1), layer.row_offset() + row)
    }

    /// Deterministic stand-in atlas: five materials of noisy bricks on the wall
    /// row and five see-through shapes on the overlay row
    pub fn procedural(seed: u64) -> Self {
        const MATERIALS: usize = 5;
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut image = Canvas::new(MATERIALS * TEXTURE_BLOCK, 2 * TEXTURE_BLOCK);

        let bases = [
            Rgb::new(150, 60, 40),
            Rgb::new(90, 110, 150),
            Rgb::new(70, 140, 80),
            Rgb::new(160, 150, 120),
            Rgb::new(120, 80, 140),
        ];

        for (m, &base) in bases.iter().enumerate() {
            let bx = (m * TEXTURE_BLOCK) as i64;

            // Walls: mortar lines every 16 rows, bricks offset every other course
            let wy = TEXTURE_BLOCK as i64;
            for y in 0..TEXTURE_BLOCK as i64 {
                let course = y / 16;
                let shift = if course % 2 == 0 { 0 } else { 16 };
                for x in 0..TEXTURE_BLOCK as i64 {
                    let mortar = y % 16 == 0 || (x + shift) % 32 == 0;
                    let color = if mortar {
                        Rgb::new(40, 40, 40)
                    } else {
                        let n: f64 = rng.random_range(0.0..30.0);
                        base.darken(n)
                    };
                    image.set(bx + x, wy + y, color);
                }
            }

            // Overlays: a ring of radius growing with the material index, transparent elsewhere
            let r = 10.0 + 4.0 * m as f64;
            for y in 0..TEXTURE_BLOCK as i64 {
                for x in 0..TEXTURE_BLOCK as i64 {
                    let d = ((x as f64 - 31.5).powi(2) + (y as f64 - 31.5).powi(2)).sqrt();
                    if (d - r).abs() < 3.0 {
                        image.set(bx + x, y, Rgb::new(base.r, base.g.max(1), base.b));
                    }
                }
            }
        }

        Self { image }
    }
}
