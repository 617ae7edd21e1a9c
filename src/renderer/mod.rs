//! CPU rendering module
//!
//! Raycasts the grid column by column into an RGB canvas. The viewport is
//! split into bands rendered on parallel worker threads.

pub mod canvas;
pub mod column;
pub mod minimap;
pub mod raycast;
pub mod scheduler;
pub mod texture;

pub use canvas::{Canvas, Rgb};
pub use column::ColumnRenderer;
pub use minimap::Minimap;
pub use raycast::{Hit, RayCaster, RayHits};
pub use scheduler::{Band, FrameContext, Renderer, band_layout};
pub use texture::{Layer, TextureAtlas};
