//! Column renderer
//!
//! Turns one column's hits into texture-mapped vertical spans. Every surface is
//! quantized into 64 texel rows ("artificial pixels"), each painted as one
//! solid run, which gives the chunky low-res look. Texels darken linearly with
//! distance.

use super::canvas::{Canvas, Rgb};
use super::raycast::{Hit, RayHits};
use super::texture::{Layer, TextureAtlas};
use crate::consts::TEXTURE_BLOCK;
use crate::settings::RenderSettings;

/// On-screen height of a surface at `distance` (inverse-distance projection)
#[inline]
pub fn projected_height(distance: f64, viewport_height: usize) -> f64 {
    2.0 * viewport_height as f64 / (2.0 * distance)
}

/// Screen row of the top edge of a surface at `distance`, centred on the horizon
#[inline]
pub fn projected_top(distance: f64, viewport_height: usize) -> f64 {
    let h = viewport_height as f64;
    h / 2.0 - h / (2.0 * distance)
}

/// Draws hit lists into a band canvas
#[derive(Debug, Clone, Copy)]
pub struct ColumnRenderer<'a> {
    pub atlas: &'a TextureAtlas,
    pub settings: &'a RenderSettings,
}

impl ColumnRenderer<'_> {
    /// Paint walls, then overlays, back to front, into column `x` of `canvas`
    pub fn render(&self, canvas: &mut Canvas, x: usize, hits: &RayHits) {
        let x = x as i64;
        for hit in &hits.walls {
            self.render_wall(canvas, x, hit);
        }
        for hit in &hits.overlays {
            self.render_overlay(canvas, x, hit);
        }
    }

    fn shade(&self, texel: Rgb, distance: f64) -> Rgb {
        texel.darken(distance * self.settings.shade_per_unit)
    }

    /// A texel row spanning [y0, y0 + size] is skipped only when it lies
    /// entirely above or below the screen
    fn culled(&self, y0: f64, size: f64) -> bool {
        y0 + size < 0.0 || y0 > self.settings.viewport_height as f64
    }

    fn render_wall(&self, canvas: &mut Canvas, x: i64, hit: &Hit) {
        let h = self.settings.viewport_height;
        let u = hit.texture_u(TEXTURE_BLOCK);
        let height = projected_height(hit.distance, h);
        let texel_size = height / TEXTURE_BLOCK as f64;

        // Too close: one flat span above the horizon and one below instead of
        // hundreds of huge, mostly off-screen texel rows
        if !(texel_size <= self.settings.wall_fallback_texel_size) {
            let mid = (h / 2) as i64;
            let upper = self.shade(self.atlas.sample(Layer::Wall, u, 16), hit.distance);
            let lower = self.shade(self.atlas.sample(Layer::Wall, u, 48), hit.distance);
            canvas.vline(x, 0, mid, upper);
            canvas.vline(x, mid, h as i64, lower);
            return;
        }
        if height < 1.0 {
            return;
        }

        let top = projected_top(hit.distance, h);
        for row in 0..TEXTURE_BLOCK {
            let y0 = top + texel_size * row as f64;
            if self.culled(y0, texel_size) {
                continue;
            }
            let color = self.shade(self.atlas.sample(Layer::Wall, u, row), hit.distance);
            canvas.vline(x, y0.floor() as i64, (y0 + texel_size).floor() as i64, color);
        }
    }

    fn render_overlay(&self, canvas: &mut Canvas, x: i64, hit: &Hit) {
        let h = self.settings.viewport_height;
        let height = projected_height(hit.distance, h);
        let texel_size = height / TEXTURE_BLOCK as f64;

        // Right on top of the camera: skip the object entirely
        if !(texel_size <= self.settings.overlay_abort_texel_size) || height < 1.0 {
            return;
        }

        let u = hit.texture_u(TEXTURE_BLOCK);
        let top = projected_top(hit.distance, h);
        for row in 0..TEXTURE_BLOCK {
            let y0 = top + texel_size * row as f64;
            if self.culled(y0, texel_size) {
                continue;
            }
            let texel = self.atlas.sample(Layer::Overlay, u, row);
            // No green means transparent
            if texel.g == 0 {
                continue;
            }
            let color = self.shade(texel, hit.distance);
            canvas.vline(x, y0.floor() as i64, (y0 + texel_size).floor() as i64, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SKY: Rgb = Rgb::new(1, 2, 3);

    fn flat_atlas(wall: Rgb, overlay: Rgb) -> TextureAtlas {
        let mut image = Canvas::new(256, 128);
        image.fill_rect(0, 64, 256, 64, wall);
        image.fill_rect(0, 0, 256, 64, overlay);
        TextureAtlas::new(image).unwrap()
    }

    fn hit(distance: f64) -> Hit {
        Hit {
            distance,
            material: 0,
            offset: 0.5,
        }
    }

    fn column(canvas: &Canvas, x: usize) -> Vec<Rgb> {
        (0..canvas.height()).map(|y| canvas.get(x, y).unwrap()).collect()
    }

    #[test]
    fn test_wall_centered_and_sized() {
        let settings = RenderSettings::default();
        let atlas = flat_atlas(Rgb::new(200, 200, 200), Rgb::BLACK);
        let renderer = ColumnRenderer { atlas: &atlas, settings: &settings };
        let mut canvas = Canvas::filled(1, 480, SKY);

        let hits = RayHits { walls: vec![hit(2.0)], overlays: vec![] };
        renderer.render(&mut canvas, 0, &hits);

        // Height 240 centred on row 240 -> rows 120..=360, darkened by 2 * 5
        let col = column(&canvas, 0);
        assert_eq!(col[119], SKY);
        assert_eq!(col[120], Rgb::new(190, 190, 190));
        assert_eq!(col[240], Rgb::new(190, 190, 190));
        assert_eq!(col[360], Rgb::new(190, 190, 190));
        assert_eq!(col[361], SKY);
    }

    #[test]
    fn test_near_wall_falls_back_to_two_spans() {
        let settings = RenderSettings::default();
        let mut image = Canvas::new(256, 128);
        image.fill_rect(0, 64, 256, 32, Rgb::new(10, 200, 10)); // upper half of wall block
        image.fill_rect(0, 96, 256, 32, Rgb::new(200, 10, 10)); // lower half
        let atlas = TextureAtlas::new(image).unwrap();
        let renderer = ColumnRenderer { atlas: &atlas, settings: &settings };
        let mut canvas = Canvas::filled(1, 480, SKY);

        // 480 / 0.001 / 64 is far above the fallback threshold
        let hits = RayHits { walls: vec![hit(0.001)], overlays: vec![] };
        renderer.render(&mut canvas, 0, &hits);
        let col = column(&canvas, 0);
        let upper = Rgb::new(10, 200, 10).darken(0.001 * 5.0);
        let lower = Rgb::new(200, 10, 10).darken(0.001 * 5.0);
        assert!(col[..240].iter().all(|&c| c == upper));
        assert!(col[241..].iter().all(|&c| c == lower));

        // Distance zero (camera inside the wall) takes the same path
        let hits = RayHits { walls: vec![hit(0.0)], overlays: vec![] };
        renderer.render(&mut canvas, 0, &hits);
    }

    #[test]
    fn test_overlay_transparency() {
        let settings = RenderSettings::default();
        let mut image = Canvas::new(256, 128);
        // Overlay block: top half visible, bottom half transparent (no green)
        image.fill_rect(0, 0, 256, 32, Rgb::new(100, 100, 100));
        image.fill_rect(0, 32, 256, 32, Rgb::new(255, 0, 255));
        let atlas = TextureAtlas::new(image).unwrap();
        let renderer = ColumnRenderer { atlas: &atlas, settings: &settings };
        let mut canvas = Canvas::filled(1, 480, SKY);

        let hits = RayHits { walls: vec![], overlays: vec![hit(1.0)] };
        renderer.render(&mut canvas, 0, &hits);
        let col = column(&canvas, 0);
        // Full height 480, top half painted, bottom half left alone
        assert_eq!(col[10], Rgb::new(95, 95, 95));
        assert_eq!(col[400], SKY);
    }

    #[test]
    fn test_overlay_row_straddling_top_edge_is_drawn() {
        let settings = RenderSettings::default();
        let atlas = flat_atlas(Rgb::BLACK, Rgb::new(100, 100, 100));
        let renderer = ColumnRenderer { atlas: &atlas, settings: &settings };
        let mut canvas = Canvas::filled(1, 480, SKY);

        // 78 px texel rows: row 28 starts at y = -72 and reaches y = 6
        let distance = 480.0 / (64.0 * 78.0);
        let hits = RayHits { walls: vec![], overlays: vec![hit(distance)] };
        renderer.render(&mut canvas, 0, &hits);
        let col = column(&canvas, 0);
        assert!(col[..6].iter().all(|&c| c != SKY), "top rows left blank: {:?}", &col[..6]);
        assert!(col.iter().all(|&c| c != SKY));
    }

    #[test]
    fn test_overlay_too_close_is_skipped() {
        let settings = RenderSettings::default();
        let atlas = flat_atlas(Rgb::WHITE, Rgb::WHITE);
        let renderer = ColumnRenderer { atlas: &atlas, settings: &settings };
        let mut canvas = Canvas::filled(1, 480, SKY);
        let hits = RayHits { walls: vec![], overlays: vec![hit(0.01)] };
        renderer.render(&mut canvas, 0, &hits);
        assert!(column(&canvas, 0).iter().all(|&c| c == SKY));
    }

    #[test]
    fn test_overlay_paints_over_wall() {
        let settings = RenderSettings::default();
        let atlas = flat_atlas(Rgb::new(50, 50, 50), Rgb::new(150, 150, 150));
        let renderer = ColumnRenderer { atlas: &atlas, settings: &settings };
        let mut canvas = Canvas::filled(1, 480, SKY);
        let hits = RayHits { walls: vec![hit(4.0)], overlays: vec![hit(2.0)] };
        renderer.render(&mut canvas, 0, &hits);
        assert_eq!(canvas.get(0, 240), Some(Rgb::new(140, 140, 140)));
    }

    #[test]
    fn test_far_wall_shaded_to_black() {
        let settings = RenderSettings::default();
        let atlas = flat_atlas(Rgb::new(40, 40, 40), Rgb::BLACK);
        let renderer = ColumnRenderer { atlas: &atlas, settings: &settings };
        let mut canvas = Canvas::filled(1, 480, SKY);
        let hits = RayHits { walls: vec![hit(10.0)], overlays: vec![] };
        renderer.render(&mut canvas, 0, &hits);
        assert_eq!(canvas.get(0, 240), Some(Rgb::BLACK));
    }

    proptest! {
        #[test]
        fn projection_shrinks_with_distance(d in 0.001f64..100.0, extra in 0.001f64..100.0) {
            let near = projected_height(d, 480);
            let far = projected_height(d + extra, 480);
            prop_assert!(far < near);
            prop_assert!(projected_top(d + extra, 480) > projected_top(d, 480));
        }
    }
}
