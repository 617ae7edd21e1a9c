//! Frame scheduler
//!
//! The viewport is cut into equal-width column bands, one per worker thread.
//! Each worker traces and paints its own band into a private canvas; once every
//! worker has been joined the bands are copied into the frame left to right.
//! Workers share nothing mutable, so the hot path takes no locks.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread;

use glam::DVec2;

use super::canvas::{Canvas, Rgb};
use super::column::ColumnRenderer;
use super::minimap::Minimap;
use super::raycast::{RayCaster, RayHits, column_angle};
use super::texture::TextureAtlas;
use crate::consts::{CEILING_COLOR, FLOOR_COLOR, SIDE_PANEL_COLOR};
use crate::settings::RenderSettings;
use crate::sim::{Grid, World};

/// A contiguous run of viewport columns owned by one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub index: usize,
    /// First viewport column
    pub start: usize,
    pub width: usize,
}

/// Split `viewport_width` into `workers` equal bands. Integer division: any
/// remainder columns at the right edge belong to no band.
pub fn band_layout(viewport_width: usize, workers: usize) -> Vec<Band> {
    let workers = workers.max(1);
    let width = viewport_width / workers;
    (0..workers)
        .map(|index| Band {
            index,
            start: index * width,
            width,
        })
        .collect()
}

/// Ceiling over the top half, floor over the bottom half
fn sky_and_floor(width: usize, height: usize) -> Canvas {
    let mut canvas = Canvas::filled(width, height, FLOOR_COLOR.into());
    canvas.fill_rect(0, 0, width as i64, (height / 2) as i64, CEILING_COLOR.into());
    canvas
}

/// Read-only snapshot of everything a worker needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub grid: &'a Grid,
    pub atlas: &'a TextureAtlas,
    pub settings: &'a RenderSettings,
    pub position: DVec2,
    pub angle: f64,
    pub fov: f64,
    pub perspective_correction: bool,
}

impl<'a> FrameContext<'a> {
    pub fn new(world: &'a World, atlas: &'a TextureAtlas, settings: &'a RenderSettings) -> Self {
        Self {
            grid: &world.grid,
            atlas,
            settings,
            position: world.player.pos,
            angle: world.player.angle(),
            fov: world.view.fov,
            perspective_correction: world.view.perspective_correction,
        }
    }

    fn caster(&self) -> RayCaster<'a> {
        RayCaster {
            grid: self.grid,
            origin: self.position,
            view_angle: self.angle,
            perspective_correction: self.perspective_correction,
            step_budget: self.settings.ray_step_budget,
        }
    }

    /// Trace the ray for one viewport column
    pub fn trace_column(&self, column: usize) -> RayHits {
        let angle = column_angle(self.angle, self.fov, column, self.settings.viewport_width);
        self.caster().cast(angle)
    }

    /// Trace and paint every column of a band into a fresh canvas
    pub fn render_band(&self, band: Band) -> Canvas {
        let mut canvas = sky_and_floor(band.width, self.settings.viewport_height);
        let caster = self.caster();
        let columns = ColumnRenderer {
            atlas: self.atlas,
            settings: self.settings,
        };
        for local in 0..band.width {
            let column = band.start + local;
            let angle = column_angle(self.angle, self.fov, column, self.settings.viewport_width);
            let hits = caster.cast(angle);
            columns.render(&mut canvas, local, &hits);
        }
        canvas
    }
}

/// Per-band result after the join
type BandResult = thread::Result<Canvas>;

/// Fork-join: run `work` for every band on its own thread and collect the
/// results in band order once all of them have finished.
///
/// A band whose worker panics comes back as `Err`; the others are unaffected.
/// If a thread can't be spawned, that band is rendered on the calling thread.
pub fn run_bands<F>(bands: &[Band], work: F) -> Vec<(Band, BandResult)>
where
    F: Fn(Band) -> Canvas + Sync,
{
    let work = &work;
    thread::scope(|scope| {
        let handles: Vec<_> = bands
            .iter()
            .map(|&band| {
                let spawned = thread::Builder::new()
                    .name(format!("band-{}", band.index))
                    .spawn_scoped(scope, move || work(band));
                (band, spawned)
            })
            .collect();

        // Barrier: every band is finished (or dead) before anything is composited
        handles
            .into_iter()
            .map(|(band, spawned)| {
                let result = match spawned {
                    Ok(handle) => handle.join(),
                    Err(e) => {
                        log::warn!(
                            "Could not spawn worker for band {}: {e}; rendering inline",
                            band.index
                        );
                        catch_unwind(AssertUnwindSafe(|| work(band)))
                    }
                };
                (band, result)
            })
            .collect()
    })
}

/// Renders frames of a world with a fixed texture atlas and settings
pub struct Renderer {
    atlas: TextureAtlas,
    settings: RenderSettings,
    bands: Vec<Band>,
}

impl Renderer {
    pub fn new(atlas: TextureAtlas, settings: RenderSettings) -> Self {
        let workers = settings.worker_count();
        let bands = band_layout(settings.viewport_width, workers);
        let covered = bands.iter().map(|b| b.width).sum::<usize>();
        log::info!(
            "Renderer: {}x{} view, {} bands of {} columns",
            settings.viewport_width,
            settings.viewport_height,
            bands.len(),
            bands.first().map(|b| b.width).unwrap_or(0)
        );
        if covered < settings.viewport_width {
            log::debug!(
                "{} rightmost columns fall outside every band",
                settings.viewport_width - covered
            );
        }
        Self {
            atlas,
            settings,
            bands,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Render every band of the current layout in parallel, in band order
    pub fn render_bands(&self, ctx: &FrameContext<'_>) -> Vec<(Band, BandResult)> {
        let ctx = *ctx;
        run_bands(&self.bands, |band| ctx.render_band(band))
    }

    /// Render one full frame: 3D view plus minimap side panel
    pub fn render_frame(&self, world: &World) -> Canvas {
        let s = &self.settings;
        let ctx = FrameContext::new(world, &self.atlas, s);

        let mut frame = Canvas::filled(s.frame_width(), s.viewport_height, SIDE_PANEL_COLOR.into());
        frame.blit(&sky_and_floor(s.viewport_width, s.viewport_height), 0, 0);

        for (band, result) in self.render_bands(&ctx) {
            match result {
                Ok(image) => frame.blit(&image, band.start, 0),
                Err(_) => log::error!(
                    "Worker for band {} (columns {}..{}) panicked; band left blank",
                    band.index,
                    band.start,
                    band.start + band.width
                ),
            }
        }

        if s.side_panel_width > 0 {
            let mut panel = Canvas::filled(s.side_panel_width, s.viewport_height, Rgb::from(SIDE_PANEL_COLOR));
            let minimap = Minimap {
                tile_size: s.minimap_tile_size,
            };
            minimap.draw(&mut panel, &world.grid, &world.player, world.view.fov);
            frame.blit(&panel, s.viewport_width, 0);
        }

        frame
    }
}
