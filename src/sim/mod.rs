//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (enemies in spawn order, blocks by row)
//! - No rendering or platform dependencies

pub mod animation;
pub mod display;
pub mod enemy;
pub mod exit;
pub mod floor;
pub mod particle;
pub mod physics;
pub mod player;
pub mod rect;
pub mod state;
pub mod tick;
pub mod timer;

/// The one random source every subsystem draws from
pub type SimRng = rand_pcg::Pcg32;

pub use animation::{Animation, Animator, Sequence};
pub use display::{Digit, FlyIn, LevelInfo, TimerDisplay};
pub use enemy::{Enemy, EnemyAnim};
pub use exit::Exit;
pub use floor::{Block, BlockRow, Floor};
pub use particle::{Particle, ParticleEmitter, ParticleGenerator, UniformEmitter};
pub use physics::{Body, CollisionStrategy, Collider, apply_physics, contain_to_bounds};
pub use player::{Player, PlayerAnim, Strike};
pub use rect::Rect;
pub use state::{ActorKind, ActorView, FrameSnapshot, Level};
pub use tick::{Intent, TickInput, tick};
pub use timer::{LevelTimer, TimeBonus};
