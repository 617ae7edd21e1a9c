//! Crate error type

use std::path::PathBuf;

/// Errors raised while building a scene or loading its assets.
///
/// Rendering itself never fails: a band whose worker dies is logged and left blank.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("texture atlas is {width}x{height}, need at least {min_width}x{min_height}")]
    TextureTooSmall {
        width: usize,
        height: usize,
        min_width: usize,
        min_height: usize,
    },

    #[error("texture data has {actual} bytes, expected {expected} for {width}x{height} RGB")]
    TextureDataLength {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("texture atlas has {available} material columns, grid uses material {material}")]
    MissingMaterial { material: u8, available: usize },

    #[error("grid has no rows or no columns")]
    EmptyGrid,

    #[error("grid row {row} has {actual} columns, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid tile value {value} at row {row}, column {col}")]
    InvalidTile { row: usize, col: usize, value: i32 },

    #[error("could not read settings from {path}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings file {path}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
