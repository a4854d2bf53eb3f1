//! Level clock and the time bonuses that wind it back

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use super::rect::Rect;
use crate::settings::{BonusSettings, Rgb};
use crate::split_millis;

/// Elapsed play time for the current level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTimer {
    elapsed_ms: f64,
    running: bool,
}

impl Default for LevelTimer {
    fn default() -> Self {
        Self {
            elapsed_ms: 0.0,
            running: true,
        }
    }
}

impl LevelTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero and start
    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
        self.running = true;
    }

    /// Freeze at the current value
    pub fn stop(&mut self) {
        self.running = false;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn advance(&mut self, dt_ms: f64) {
        if self.running {
            self.elapsed_ms += dt_ms;
        }
    }

    /// Take `ms` off the clock, never below zero
    pub fn apply_bonus(&mut self, ms: f64) {
        self.elapsed_ms = (self.elapsed_ms - ms).max(0.0);
    }

    /// (minutes, seconds, hundredths), minutes saturating at 99
    pub fn readout(&self) -> (u32, u32, u32) {
        let (minutes, seconds, hundredths) = split_millis(self.elapsed_ms);
        (minutes.min(99), seconds, hundredths)
    }
}

/// Floating "-0.5 seconds" text left behind by a kill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBonus {
    pub text: String,
    /// Top-left of the text
    pub pos: Vec2,
    pub color: Rgb,
    frame: u32,
    total_frames: u32,
    max_frames: u32,
    frame_delay: u32,
    rise: f32,
}

impl TimeBonus {
    /// Credit the bonus to `timer` and place the text where the enemy died
    pub fn award(at: &Rect, settings: &BonusSettings, timer: &mut LevelTimer) -> Self {
        timer.apply_bonus(settings.reduction_ms);
        Self {
            text: settings.text.clone(),
            pos: Vec2::new(at.left(), at.top()),
            color: [255, 0, 0],
            frame: 0,
            total_frames: 0,
            max_frames: settings.max_frames,
            frame_delay: settings.frame_delay,
            rise: settings.rise,
        }
    }

    /// Rise and flicker through red, blue, magenta and black
    pub fn update(&mut self, rng: &mut SimRng) {
        self.frame += 1;
        self.total_frames += 1;
        if self.frame > self.frame_delay {
            self.frame = 0;
            self.pos.y -= self.rise;
            let mut channel = || if rng.random_bool(0.5) { 255 } else { 0 };
            self.color = [channel(), 0, channel()];
        }
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.total_frames < self.max_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_runs_until_stopped() {
        let mut timer = LevelTimer::new();
        for _ in 0..25 {
            timer.advance(40.0);
        }
        assert_eq!(timer.elapsed_ms(), 1000.0);

        timer.stop();
        timer.advance(500.0);
        assert_eq!(timer.elapsed_ms(), 1000.0);
        assert_eq!(timer.readout(), (0, 1, 0));

        timer.reset();
        assert!(timer.is_running());
        assert_eq!(timer.elapsed_ms(), 0.0);
    }

    #[test]
    fn test_readout_saturates_minutes() {
        let mut timer = LevelTimer::new();
        timer.advance(100.0 * 60_000.0 + 5_250.0);
        assert_eq!(timer.readout(), (99, 5, 25));
    }

    #[test]
    fn test_bonus_floors_at_zero() {
        let mut timer = LevelTimer::new();
        timer.advance(300.0);
        let settings = BonusSettings::default();
        let bonus = TimeBonus::award(&Rect::new(10.0, 20.0, 16.0, 16.0), &settings, &mut timer);
        assert_eq!(timer.elapsed_ms(), 0.0);
        assert_eq!(bonus.pos, Vec2::new(10.0, 20.0));
        assert_eq!(bonus.text, "-0.5 seconds");

        timer.advance(2000.0);
        TimeBonus::award(&Rect::default(), &settings, &mut timer);
        assert_eq!(timer.elapsed_ms(), 1500.0);
    }

    #[test]
    fn test_bonus_rises_then_expires() {
        let mut rng = SimRng::seed_from_u64(9);
        let mut timer = LevelTimer::new();
        let mut bonus = TimeBonus::award(
            &Rect::new(0.0, 100.0, 16.0, 16.0),
            &BonusSettings::default(),
            &mut timer,
        );

        for _ in 0..3 {
            bonus.update(&mut rng);
        }
        assert_eq!(bonus.pos.y, 96.0);

        let mut ticks = 3;
        while bonus.alive() {
            bonus.update(&mut rng);
            assert_eq!(bonus.color[1], 0);
            assert!(bonus.color[0] % 255 == 0 && bonus.color[2] % 255 == 0);
            ticks += 1;
        }
        assert_eq!(ticks, 80);
    }
}
