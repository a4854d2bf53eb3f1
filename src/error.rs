//! Errors raised while building the game configuration
//!
//! The simulation itself has no recoverable failures; everything that can go wrong at
//! runtime is caught here, before a [`crate::Settings`] value reaches the core.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("map width {map_width} leaves no room for walls around {playable_width} playable columns")]
    MapTooNarrow { map_width: u32, playable_width: u32 },
    #[error("map width {map_width} and playable width {playable_width} must differ by an even number")]
    UnevenMargin { map_width: u32, playable_width: u32 },
    #[error("drain column {drain_col} must sit strictly inside the playable columns {first}..{last}")]
    DrainOutsidePlayable { drain_col: u32, first: u32, last: u32 },
    #[error("{field} range is inverted ({min} > {max})")]
    InvertedRange {
        field: &'static str,
        min: i32,
        max: i32,
    },
    #[error("a map needs at least {min} floors (got {got})")]
    TooFewFloors { min: u32, got: u32 },
    #[error("screen height {screen_height} cannot hold {rows} tile rows of {tile_height}px")]
    ScreenTooShort {
        screen_height: f32,
        rows: u64,
        tile_height: f32,
    },
}
