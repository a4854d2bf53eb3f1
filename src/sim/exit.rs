//! The exit fixture under the drain
//!
//! A static two-frame sprite below the playable bounds. Every enemy falling through it
//! (re)starts a burst of red particles from the bottom of the screen.

use glam::Vec2;

use super::SimRng;
use super::animation::{Animator, Sequence};
use super::enemy::Enemy;
use super::particle::{ParticleGenerator, UniformEmitter};
use super::rect::Rect;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitAnim;

impl Sequence for ExitAnim {
    fn frames(self) -> &'static [usize] {
        &[0, 1]
    }

    fn frames_per_update(self) -> u32 {
        1
    }
}

#[derive(Debug)]
pub struct Exit {
    pub rect: Rect,
    animator: Animator<ExitAnim>,
    gibs: ParticleGenerator,
    gib_frames: u32,
}

impl Exit {
    pub fn new(settings: &Settings, bounds: &Rect) -> Self {
        let tile_w = settings.map.tile_width;
        let tile_h = settings.map.tile_height;
        let screen = &settings.screen;

        let rect = Rect::new(
            screen.width / 2.0 - tile_w,
            bounds.bottom() + tile_h,
            tile_w,
            tile_h,
        );
        let origin = Vec2::new(
            screen.width / 2.0 - tile_w / 2.0,
            screen.height - tile_w / 2.0,
        );
        let gibs = ParticleGenerator::new(
            origin,
            Box::new(UniformEmitter::from_settings(&settings.particles)),
        );

        Self {
            rect,
            animator: Animator::new(ExitAnim),
            gibs,
            gib_frames: settings.particles.max_frames,
        }
    }

    #[inline]
    pub fn current_frame(&self) -> usize {
        self.animator.current_frame()
    }

    pub fn gibs(&self) -> &ParticleGenerator {
        &self.gibs
    }

    pub fn is_gibbing(&self) -> bool {
        self.gibs.is_active()
    }

    pub fn stop_gibbing(&mut self) {
        self.gibs.stop();
    }

    /// Step the particles, then restart the burst for each enemy passing through
    pub fn update(&mut self, settings: &Settings, enemies: &[Enemy], rng: &mut SimRng) {
        self.gibs
            .update(rng, &settings.physics, settings.screen.height);

        for enemy in enemies.iter().filter(|e| e.body.rect.intersects(&self.rect)) {
            log::trace!("Enemy {} fell through the exit", enemy.id);
            self.gibs.start(self.gib_frames);
        }
        self.animator.advance();
    }
}
