//! Game settings
//!
//! One immutable value built at startup and handed to every component. Any field left
//! out of a JSON document falls back to the stock game's value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::TICK_MS;
use crate::error::SettingsError;

/// 8-bit RGB colour
pub type Rgb = [u8; 3];

/// Screen and tick timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSettings {
    pub width: f32,
    pub height: f32,
    /// Milliseconds of game time added to the level timer per tick
    pub tick_ms: f64,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            tick_ms: TICK_MS,
        }
    }
}

/// Forces shared by every physics-bound actor and particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Downward acceleration (pixels per tick²)
    pub gravity: f32,
    /// Maximum downward speed (pixels per tick)
    pub terminal_velocity: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: 1.4,
            terminal_velocity: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub width: f32,
    pub height: f32,
    pub walk_speed: f32,
    /// Impulse applied when jumping from the ground
    pub jump_velocity: f32,
    /// Weaker impulse applied when jumping in mid-air
    pub air_jump_velocity: f32,
    pub max_air_jumps: u32,
    /// Impulse applied when an enemy touches the player
    pub death_velocity: f32,
    /// Transparent pixels on the left and right of the artwork
    pub horz_margin: f32,
    /// Transparent pixels above the artwork
    pub top_margin: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            width: 24.0,
            height: 32.0,
            walk_speed: 2.0,
            jump_velocity: -15.0,
            air_jump_velocity: -8.0,
            max_air_jumps: 1,
            death_velocity: -15.0,
            horz_margin: 3.0,
            top_margin: 9.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemySettings {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Upward impulse when killed by a block break
    pub death_velocity: f32,
    /// Ticks between spawns on the first level
    pub spawn_interval: u32,
    /// Reduction of the spawn interval per cleared level
    pub spawn_interval_step: u32,
    /// The spawn interval never drops below this
    pub spawn_interval_min: u32,
}

impl Default for EnemySettings {
    fn default() -> Self {
        Self {
            width: 16.0,
            height: 16.0,
            speed: 1.0,
            death_velocity: -10.0,
            spawn_interval: 120,
            spawn_interval_step: 5,
            spawn_interval_min: 30,
        }
    }
}

/// Tile map layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub tile_width: f32,
    pub tile_height: f32,
    pub block_width: f32,
    pub block_height: f32,
    /// Map width in tiles
    pub width: u32,
    /// Columns the player can move in, centred in the map
    pub playable_width: u32,
    pub floors: u32,
    /// Filler rows below the bottom floor
    pub subfloors: u32,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            tile_width: 24.0,
            tile_height: 24.0,
            block_width: 12.0,
            block_height: 12.0,
            width: 16,
            playable_width: 10,
            floors: 8,
            subfloors: 1,
        }
    }
}

impl MapSettings {
    /// Wall columns on each side of the playable area
    pub fn side_margin(&self) -> u32 {
        (self.width - self.playable_width) / 2
    }

    /// Column holding the drain in the bottom floor
    pub fn drain_col(&self) -> u32 {
        self.width / 2 - 1
    }

    /// Total tile rows emitted for the map
    pub fn rows(&self) -> u64 {
        u64::from(self.floors) * 3 + u64::from(self.subfloors)
    }
}

/// Gibbing burst emitted by the drain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    pub color: Rgb,
    /// Horizontal speed range [min, max]
    pub dx_range: [i32; 2],
    /// Upward speed range [min, max], negated on emission
    pub dy_range: [i32; 2],
    pub per_frame: u32,
    /// Ticks a single trigger keeps the emitter running
    pub max_frames: u32,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            color: [255, 0, 0],
            dx_range: [-8, 8],
            dy_range: [5, 20],
            per_frame: 5,
            max_frames: 40,
        }
    }
}

/// Time bonus for killing an enemy with a block break
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusSettings {
    pub reduction_ms: f64,
    pub text: String,
    pub max_frames: u32,
    /// Pixels the text rises per step
    pub rise: f32,
    /// Ticks to wait between steps
    pub frame_delay: u32,
}

impl Default for BonusSettings {
    fn default() -> Self {
        Self {
            reduction_ms: 500.0,
            text: "-0.5 seconds".to_string(),
            max_frames: 80,
            rise: 4.0,
            frame_delay: 2,
        }
    }
}

/// LCD timer frame layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub lcd_digit_width: f32,
    pub lcd_digit_height: f32,
    /// Pixels between the frame's side and the digits
    pub lcd_padding_horz: f32,
    /// Pixels above and below the digits
    pub lcd_padding_vert: f32,
    /// Gap between the two digits of a pair (M M)
    pub lcd_gap_minor: f32,
    /// Gap between pairs (MM:SS)
    pub lcd_gap_major: f32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            lcd_digit_width: 16.0,
            lcd_digit_height: 24.0,
            lcd_padding_horz: 5.0,
            lcd_padding_vert: 4.0,
            lcd_gap_minor: 2.0,
            lcd_gap_major: 8.0,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub screen: ScreenSettings,
    pub physics: PhysicsSettings,
    pub player: PlayerSettings,
    pub enemy: EnemySettings,
    pub map: MapSettings,
    pub particles: ParticleSettings,
    pub bonus: BonusSettings,
    pub display: DisplaySettings,
}

impl Settings {
    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Check every cross-field constraint the simulation relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("screen.width", self.screen.width as f64),
            ("screen.height", self.screen.height as f64),
            ("screen.tick_ms", self.screen.tick_ms),
            ("physics.terminal_velocity", self.physics.terminal_velocity as f64),
            ("player.width", self.player.width as f64),
            ("player.height", self.player.height as f64),
            ("enemy.width", self.enemy.width as f64),
            ("enemy.height", self.enemy.height as f64),
            ("enemy.speed", self.enemy.speed as f64),
            ("enemy.spawn_interval_min", self.enemy.spawn_interval_min as f64),
            ("map.tile_width", self.map.tile_width as f64),
            ("map.tile_height", self.map.tile_height as f64),
            ("map.block_width", self.map.block_width as f64),
            ("map.block_height", self.map.block_height as f64),
            ("map.playable_width", self.map.playable_width as f64),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(SettingsError::NotPositive { field, value });
            }
        }

        let map = &self.map;
        if u64::from(map.width) < u64::from(map.playable_width) + 4 {
            return Err(SettingsError::MapTooNarrow {
                map_width: map.width,
                playable_width: map.playable_width,
            });
        }
        if (map.width - map.playable_width) % 2 != 0 {
            return Err(SettingsError::UnevenMargin {
                map_width: map.width,
                playable_width: map.playable_width,
            });
        }
        let first = map.side_margin();
        let last = first + map.playable_width - 1;
        let drain_col = map.drain_col();
        if drain_col <= first || drain_col >= last {
            return Err(SettingsError::DrainOutsidePlayable {
                drain_col,
                first,
                last,
            });
        }
        if map.floors < 2 {
            return Err(SettingsError::TooFewFloors {
                min: 2,
                got: map.floors,
            });
        }
        if map.rows() as f32 * map.tile_height > self.screen.height {
            return Err(SettingsError::ScreenTooShort {
                screen_height: self.screen.height,
                rows: map.rows(),
                tile_height: map.tile_height,
            });
        }

        for (field, [min, max]) in [
            ("particles.dx_range", self.particles.dx_range),
            ("particles.dy_range", self.particles.dy_range),
        ] {
            if min > max {
                return Err(SettingsError::InvertedRange { field, min, max });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.map.side_margin(), 3);
        assert_eq!(settings.map.drain_col(), 7);
        assert_eq!(settings.map.rows(), 25);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "physics": { "gravity": 2.0 } }"#).unwrap();
        assert_eq!(settings.physics.gravity, 2.0);
        assert_eq!(settings.physics.terminal_velocity, 12.0);
        assert_eq!(settings.map, MapSettings::default());
    }

    #[test]
    fn test_round_trip_json() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_display_settings_are_lcd_layout_only() {
        let json = serde_json::to_value(DisplaySettings::default()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert!(keys.iter().all(|k| k.starts_with("lcd_")), "{keys:?}");
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_narrow_map() {
        let mut settings = Settings::default();
        settings.map.width = 12;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::MapTooNarrow { .. })
        ));
    }

    #[test]
    fn test_rejects_uneven_margin() {
        let mut settings = Settings::default();
        settings.map.width = 17;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::UnevenMargin { .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_particle_range() {
        let mut settings = Settings::default();
        settings.particles.dy_range = [20, 5];
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_rejects_too_many_rows() {
        let mut settings = Settings::default();
        settings.map.floors = 9;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::ScreenTooShort { .. })
        ));
    }

    #[test]
    fn test_rejects_huge_floor_count() {
        let err = Settings::from_json(r#"{"map":{"floors":2000000000}}"#).unwrap_err();
        match err {
            SettingsError::ScreenTooShort { rows, .. } => assert_eq!(rows, 6_000_000_001),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_huge_playable_width() {
        let err = Settings::from_json(r#"{"map":{"playable_width":4294967295}}"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::MapTooNarrow {
                map_width: 16,
                playable_width: u32::MAX,
            }
        ));
    }

    #[test]
    fn test_rejects_zero_tile() {
        let mut settings = Settings::default();
        settings.map.tile_width = 0.0;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::NotPositive {
                field: "map.tile_width",
                ..
            })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::ReadFile { .. }));
    }
}
