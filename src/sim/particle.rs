//! Particle emitter engine
//!
//! A [`ParticleGenerator`] spawns a batch of particles per tick while active, then
//! keeps simulating the ones already in flight until they drop off the screen. What
//! each batch looks like is decided by a pluggable [`ParticleEmitter`].

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use crate::settings::{ParticleSettings, PhysicsSettings, Rgb};

/// A single square particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Side length in pixels
    pub size: f32,
    pub color: Rgb,
}

impl Particle {
    /// Drift horizontally, fall under clamped gravity
    pub fn update(&mut self, physics: &PhysicsSettings) {
        self.pos.x += self.vel.x;
        self.vel.y = (self.vel.y + physics.gravity).min(physics.terminal_velocity);
        self.pos.y += self.vel.y;
    }

    /// Particles live until they leave through the bottom of the screen
    #[inline]
    pub fn alive(&self, screen_bottom: f32) -> bool {
        self.pos.y <= screen_bottom
    }
}

/// Initial velocity and colour for one new particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpawn {
    pub vel: Vec2,
    pub color: Rgb,
}

/// Produces the batch of particles emitted on one active tick
pub trait ParticleEmitter: std::fmt::Debug {
    fn emit(&mut self, rng: &mut SimRng) -> Vec<ParticleSpawn>;
}

/// Fallback emitter: small sideways spread, random colours
#[derive(Debug, Clone)]
pub struct RandomColorEmitter {
    pub per_frame: u32,
}

impl ParticleEmitter for RandomColorEmitter {
    fn emit(&mut self, rng: &mut SimRng) -> Vec<ParticleSpawn> {
        (0..self.per_frame)
            .map(|_| ParticleSpawn {
                vel: Vec2::new(
                    rng.random_range(-2..=2) as f32,
                    -(rng.random_range(5..=20) as f32),
                ),
                color: [rng.random(), rng.random(), rng.random()],
            })
            .collect()
    }
}

/// Uniform velocities within configured ranges, single colour
#[derive(Debug, Clone)]
pub struct UniformEmitter {
    pub dx_range: [i32; 2],
    /// Upward speed range; emitted velocities are negated
    pub dy_range: [i32; 2],
    pub color: Rgb,
    pub per_frame: u32,
}

impl UniformEmitter {
    pub fn from_settings(settings: &ParticleSettings) -> Self {
        Self {
            dx_range: settings.dx_range,
            dy_range: settings.dy_range,
            color: settings.color,
            per_frame: settings.per_frame,
        }
    }
}

impl ParticleEmitter for UniformEmitter {
    fn emit(&mut self, rng: &mut SimRng) -> Vec<ParticleSpawn> {
        let [dx_min, dx_max] = self.dx_range;
        let [dy_min, dy_max] = self.dy_range;
        (0..self.per_frame)
            .map(|_| ParticleSpawn {
                vel: Vec2::new(
                    rng.random_range(dx_min..=dx_max) as f32,
                    -(rng.random_range(dy_min..=dy_max) as f32),
                ),
                color: self.color,
            })
            .collect()
    }
}

/// Timed particle source at a fixed origin
#[derive(Debug)]
pub struct ParticleGenerator {
    pub origin: Vec2,
    particles: Vec<Particle>,
    active: bool,
    active_frames: u32,
    frames_to_generate: u32,
    emitter: Box<dyn ParticleEmitter>,
}

impl ParticleGenerator {
    pub fn new(origin: Vec2, emitter: Box<dyn ParticleEmitter>) -> Self {
        Self {
            origin,
            particles: Vec::new(),
            active: false,
            active_frames: 0,
            frames_to_generate: 0,
            emitter,
        }
    }

    /// Generator using [`RandomColorEmitter`]
    pub fn with_random_colors(origin: Vec2, per_frame: u32) -> Self {
        Self::new(origin, Box::new(RandomColorEmitter { per_frame }))
    }

    /// (Re)start emitting for `frames` ticks; restarting resets the budget, never extends it
    pub fn start(&mut self, frames: u32) {
        self.active = true;
        self.active_frames = 0;
        self.frames_to_generate = frames;
    }

    /// Stop emitting. Particles in flight keep falling.
    pub fn stop(&mut self) {
        self.active = false;
        self.active_frames = 0;
        self.frames_to_generate = 0;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn update(&mut self, rng: &mut SimRng, physics: &PhysicsSettings, screen_bottom: f32) {
        if self.active {
            self.generate(rng);
            self.active_frames += 1;
            if self.active_frames > self.frames_to_generate {
                self.stop();
            }
        }

        for particle in &mut self.particles {
            particle.update(physics);
        }
        self.particles.retain(|p| p.alive(screen_bottom));
    }

    fn generate(&mut self, rng: &mut SimRng) {
        let origin = self.origin;
        for spawn in self.emitter.emit(rng) {
            self.particles.push(Particle {
                pos: origin,
                vel: spawn.vel,
                size: rng.random_range(1..=4) as f32,
                color: spawn.color,
            });
        }
    }
}
