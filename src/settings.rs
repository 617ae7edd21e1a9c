//! View and render settings
//!
//! View settings change at runtime through input actions; render settings are
//! fixed for a run. Both persist as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Smallest and largest field of view reachable through intents (degrees)
pub const MIN_FOV: f64 = 1.0;
pub const MAX_FOV: f64 = 179.0;

/// Settings the player can change while running
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Horizontal field of view (degrees)
    pub fov: f64,
    /// Fish-eye correction (scale distance by cos of the ray's offset from view center)
    pub perspective_correction: bool,
    /// Frame metrics reporting
    pub metrics: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            fov: 90.0,
            perspective_correction: true,
            metrics: true,
        }
    }
}

impl ViewSettings {
    /// Widen or narrow the field of view, staying within [MIN_FOV, MAX_FOV]
    pub fn adjust_fov(&mut self, delta: f64) {
        self.fov = (self.fov + delta).clamp(MIN_FOV, MAX_FOV);
    }

    /// Bring values read from disk back into range
    pub fn sanitize(&mut self) {
        let fov = if self.fov.is_nan() {
            Self::default().fov
        } else {
            self.fov.clamp(MIN_FOV, MAX_FOV)
        };
        if fov != self.fov {
            log::warn!("fov {} out of range, using {fov}", self.fov);
            self.fov = fov;
        }
    }
}

/// Frame geometry and renderer tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// 3D view width (pixels, one ray per column)
    pub viewport_width: usize,
    /// Frame height (pixels)
    pub viewport_height: usize,
    /// Minimap panel to the right of the 3D view
    pub side_panel_width: usize,
    /// Minimap pixels per tile
    pub minimap_tile_size: usize,

    /// Maximum DDA steps per ray
    pub ray_step_budget: u32,
    /// Wall columns whose texel rows are taller than this are drawn as two flat spans
    pub wall_fallback_texel_size: f64,
    /// Overlay objects whose texel rows are taller than this are skipped
    pub overlay_abort_texel_size: f64,
    /// Channel darkening per tile of distance
    pub shade_per_unit: f64,

    /// Band count override; `None` uses the available hardware parallelism
    pub workers: Option<usize>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            viewport_width: 640,
            viewport_height: 480,
            side_panel_width: 400,
            minimap_tile_size: 20,
            ray_step_budget: 50,
            wall_fallback_texel_size: 50.0,
            overlay_abort_texel_size: 100.0,
            shade_per_unit: 5.0,
            workers: None,
        }
    }
}

impl RenderSettings {
    /// Full frame width (3D view plus side panel)
    pub fn frame_width(&self) -> usize {
        self.viewport_width + self.side_panel_width
    }

    /// Number of column bands to split the viewport into
    pub fn worker_count(&self) -> usize {
        let n = self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        n.clamp(1, self.viewport_width.max(1))
    }
}

/// All settings for a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub view: ViewSettings,
    pub render: RenderSettings,
}

impl Settings {
    /// Load settings from a JSON file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(Error::SettingsIo {
                    path: path.to_owned(),
                    source,
                });
            }
        };

        let mut settings: Self = serde_json::from_str(&json).map_err(|source| Error::SettingsParse {
            path: path.to_owned(),
            source,
        })?;
        settings.view.sanitize();
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(self).map_err(|source| Error::SettingsParse {
            path: path.to_owned(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| Error::SettingsIo {
            path: path.to_owned(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
