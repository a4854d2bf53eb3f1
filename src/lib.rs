//! Floor Jumper - a floor-climbing platformer simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, actors, floor generation, level protocol)
//! - `settings`: Immutable game configuration
//! - `records`: Best level clear times
//!
//! Rendering, input translation and frame pacing live outside this crate. They feed
//! [`sim::TickInput`] into [`sim::tick`] and read back [`sim::FrameSnapshot`].

pub mod error;
pub mod records;
pub mod settings;
pub mod sim;

pub use error::SettingsError;
pub use records::ClearTimes;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Target simulation rate (ticks per second)
    pub const TICKS_PER_SECOND: u32 = 30;
    /// Milliseconds represented by one tick at the target rate
    pub const TICK_MS: f64 = 1000.0 / TICKS_PER_SECOND as f64;

    /// Ticks the player must idle in the top region before the level counts as won
    pub const WIN_IDLE_TICKS: u32 = TICKS_PER_SECOND * 3;

    /// Tile indices into the tile sheet (-1 is an empty cell)
    pub mod tiles {
        pub const EMPTY: i32 = -1;
        pub const FLOOR: i32 = 1;
        pub const DRAIN: i32 = 5;
        pub const WALL_LEFT: i32 = 6;
        pub const SUB: i32 = 7;
        pub const WALL_RIGHT: i32 = 8;
        pub const CORNER_LEFT: i32 = 9;
        pub const CORNER_RIGHT: i32 = 10;
        pub const PIPE_LEFT: i32 = 15;
        pub const PIPE_RIGHT: i32 = 16;
    }
}

/// Split elapsed milliseconds into (minutes, seconds, hundredths)
#[inline]
pub fn split_millis(total_ms: f64) -> (u32, u32, u32) {
    let total = total_ms.max(0.0) as u64;
    let minutes = total / 60_000;
    let seconds = (total % 60_000) / 1000;
    let hundredths = (total % 1000) / 10;
    (minutes as u32, seconds as u32, hundredths as u32)
}
