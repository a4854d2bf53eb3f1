//! On-screen level number and timer digit layout
//!
//! These are presentation values computed by the simulation so a renderer only has to
//! blit sprites: which digit sits where, and where the fly-in graphics currently are.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::settings::Settings;

/// A single decimal digit 0..=9
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Digit(u8);

impl Digit {
    /// # Panics
    ///
    /// If `value` is greater than 9.
    pub fn new(value: u8) -> Self {
        assert!(value <= 9, "digit out of range: {value}");
        Self(value)
    }

    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }

    /// # Panics
    ///
    /// If `value` is greater than 9.
    pub fn set(&mut self, value: u8) {
        *self = Self::new(value);
    }

    /// Add one, wrapping 9 to 0. Returns the carry.
    pub fn increase(&mut self) -> bool {
        if self.0 == 9 {
            self.0 = 0;
            true
        } else {
            self.0 += 1;
            false
        }
    }
}

/// Sprite that slides from a start position by a fixed step for a set number of frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlyIn {
    pub pos: Vec2,
    start: Vec2,
    step: Vec2,
    frames_max: u32,
    frame: u32,
}

impl FlyIn {
    pub fn new(start: Vec2, step: Vec2, frames_max: u32) -> Self {
        Self {
            pos: start,
            start,
            step,
            frames_max,
            frame: 0,
        }
    }

    pub fn update(&mut self) {
        if self.frame < self.frames_max {
            self.pos += self.step;
            self.frame += 1;
        }
    }

    pub fn reset(&mut self) {
        self.pos = self.start;
        self.frame = 0;
    }

    #[inline]
    pub fn arrived(&self) -> bool {
        self.frame >= self.frames_max
    }
}

/// "LEVEL nn" display that flies in at the start of each level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub label: FlyIn,
    pub tens: Digit,
    pub tens_sprite: FlyIn,
    pub ones: Digit,
    pub ones_sprite: FlyIn,
}

impl LevelInfo {
    /// Level 1, positioned for the opening fly-in
    pub fn new(settings: &Settings) -> Self {
        let screen = &settings.screen;
        let tile_w = settings.map.tile_width;
        Self {
            label: FlyIn::new(Vec2::new(tile_w, screen.height), Vec2::new(0.0, -20.0), 20),
            tens: Digit::new(0),
            tens_sprite: FlyIn::new(Vec2::new(tile_w, -64.0), Vec2::new(0.0, 15.0), 22),
            ones: Digit::new(1),
            ones_sprite: FlyIn::new(
                Vec2::new(screen.width, screen.height / 2.0 - 35.0),
                Vec2::new(-37.0, 0.0),
                20,
            ),
        }
    }

    pub fn update(&mut self) {
        self.label.update();
        self.ones_sprite.update();
        self.tens_sprite.update();
    }

    /// Replay the fly-in
    pub fn reset(&mut self) {
        self.label.reset();
        self.ones_sprite.reset();
        self.tens_sprite.reset();
    }

    pub fn increase_level(&mut self) {
        if self.ones.increase() {
            self.tens.increase();
        }
        self.reset();
    }

    pub fn level(&self) -> u32 {
        self.tens.value() as u32 * 10 + self.ones.value() as u32
    }
}

/// LCD digit slots for mm:ss:hh, laid out right of the playable area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerDisplay {
    /// Top-left of the LCD frame
    pub frame_pos: Vec2,
    pub slots: [Rect; 6],
    pub digits: [Digit; 6],
}

impl TimerDisplay {
    pub fn new(settings: &Settings, bounds: &Rect) -> Self {
        let display = &settings.display;
        let frame_pos = Vec2::new(
            bounds.right() + settings.map.tile_width * 2.0,
            settings.screen.height / 2.0,
        );

        let (w, h) = (display.lcd_digit_width, display.lcd_digit_height);
        let y = frame_pos.y + display.lcd_padding_vert;
        let mut x = frame_pos.x + display.lcd_padding_horz;
        let mut slots = [Rect::default(); 6];
        for (i, slot) in slots.iter_mut().enumerate() {
            *slot = Rect::new(x, y, w, h);
            x += w + if i % 2 == 0 {
                display.lcd_gap_minor
            } else {
                display.lcd_gap_major
            };
        }

        Self {
            frame_pos,
            slots,
            digits: [Digit::default(); 6],
        }
    }

    /// Show a (minutes, seconds, hundredths) readout; each part must be below 100
    pub fn show(&mut self, (minutes, seconds, hundredths): (u32, u32, u32)) {
        for (pair, value) in [minutes, seconds, hundredths].into_iter().enumerate() {
            let value = value.min(99) as u8;
            self.digits[pair * 2].set(value / 10);
            self.digits[pair * 2 + 1].set(value % 10);
        }
    }

    pub fn values(&self) -> [u8; 6] {
        self.digits.map(Digit::value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_carry() {
        let mut d = Digit::new(8);
        assert!(!d.increase());
        assert_eq!(d.value(), 9);
        assert!(d.increase());
        assert_eq!(d.value(), 0);
    }

    #[test]
    #[should_panic(expected = "digit out of range")]
    fn test_digit_rejects_ten() {
        let _ = Digit::new(10);
    }

    #[test]
    fn test_fly_in_stops_after_frames() {
        let mut fly = FlyIn::new(Vec2::new(0.0, 600.0), Vec2::new(0.0, -20.0), 20);
        for _ in 0..25 {
            fly.update();
        }
        assert!(fly.arrived());
        assert_eq!(fly.pos, Vec2::new(0.0, 200.0));
        fly.reset();
        assert_eq!(fly.pos, Vec2::new(0.0, 600.0));
        assert!(!fly.arrived());
    }

    #[test]
    fn test_level_info_resting_positions() {
        let settings = Settings::default();
        let mut info = LevelInfo::new(&settings);
        assert_eq!(info.level(), 1);
        for _ in 0..30 {
            info.update();
        }
        assert_eq!(info.label.pos, Vec2::new(24.0, 200.0));
        assert_eq!(info.tens_sprite.pos, Vec2::new(24.0, 266.0));
        assert_eq!(info.ones_sprite.pos, Vec2::new(60.0, 265.0));
    }

    #[test]
    fn test_level_carry_and_replay() {
        let settings = Settings::default();
        let mut info = LevelInfo::new(&settings);
        for _ in 0..30 {
            info.update();
        }
        for _ in 0..9 {
            info.increase_level();
        }
        assert_eq!(info.level(), 10);
        assert_eq!((info.tens.value(), info.ones.value()), (1, 0));
        assert_eq!(info.label.pos, Vec2::new(24.0, 600.0));
    }

    #[test]
    fn test_timer_layout() {
        let settings = Settings::default();
        let bounds = Rect::new(280.0, 0.0, 240.0, 552.0);
        let display = TimerDisplay::new(&settings, &bounds);
        assert_eq!(display.frame_pos, Vec2::new(568.0, 300.0));
        let xs: Vec<f32> = display.slots.iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![573.0, 591.0, 615.0, 633.0, 657.0, 675.0]);
        assert!(display.slots.iter().all(|r| r.y == 304.0));
    }

    #[test]
    fn test_timer_digits() {
        let settings = Settings::default();
        let mut display = TimerDisplay::new(&settings, &Rect::default());
        display.show((3, 7, 45));
        assert_eq!(display.values(), [0, 3, 0, 7, 4, 5]);
        display.show((120, 59, 99));
        assert_eq!(display.values(), [9, 9, 5, 9, 9, 9]);
    }
}
