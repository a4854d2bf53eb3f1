//! Level state and render snapshot
//!
//! [`Level`] owns every piece of mutable simulation state: the map, actors, timers and
//! the single seeded RNG. [`FrameSnapshot`] is the read-only view handed to a renderer.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::SimRng;
use super::display::{LevelInfo, TimerDisplay};
use super::enemy::Enemy;
use super::exit::Exit;
use super::floor::Floor;
use super::player::Player;
use super::rect::Rect;
use super::timer::{LevelTimer, TimeBonus};
use crate::records::ClearTimes;
use crate::settings::{Rgb, Settings};

/// Complete simulation state for one game session
#[derive(Debug)]
pub struct Level {
    /// Run seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    pub(crate) rng: SimRng,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub floor: Floor,
    pub player: Player,
    /// Live enemies in spawn order
    pub enemies: Vec<Enemy>,
    pub exit: Exit,
    pub timer: LevelTimer,
    pub timer_display: TimerDisplay,
    pub level_info: LevelInfo,
    pub bonuses: Vec<TimeBonus>,
    pub clear_times: ClearTimes,
    /// Ticks between automatic enemy spawns on this level
    pub spawn_interval: u32,
    pub spawn_counter: u32,
    next_id: u32,
}

impl Level {
    /// Build the map and actors and spawn the first enemy
    ///
    /// `settings` is expected to have passed [`Settings::validate`].
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut rng = SimRng::seed_from_u64(seed);
        let floor = Floor::generate(&settings, &mut rng);
        let player = Player::new(&settings, &floor.bounds);
        let exit = Exit::new(&settings, &floor.bounds);
        let timer_display = TimerDisplay::new(&settings, &floor.bounds);
        let level_info = LevelInfo::new(&settings);
        let spawn_interval = settings.enemy.spawn_interval;

        let mut level = Self {
            seed,
            settings,
            rng,
            time_ticks: 0,
            floor,
            player,
            enemies: Vec::new(),
            exit,
            timer: LevelTimer::new(),
            timer_display,
            level_info,
            bonuses: Vec::new(),
            clear_times: ClearTimes::new(),
            spawn_interval,
            spawn_counter: 0,
            next_id: 1,
        };
        level.spawn_enemy();

        log::info!("Started game with seed {seed}");
        level
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Current level number (1-based, wraps after 99)
    pub fn level_number(&self) -> u32 {
        self.level_info.level()
    }

    /// Spawn an enemy at one end of a random upper floor, walking inward
    pub fn spawn_enemy(&mut self) -> u32 {
        let floor_index = self.rng.random_range(0..=self.settings.map.floors - 2);
        let facing_left = self.rng.random_bool(0.5);
        let rect = self
            .floor
            .enemy_spawn_rect(&self.settings, floor_index, facing_left);

        let id = self.next_entity_id();
        self.enemies
            .push(Enemy::spawn(id, rect, facing_left, self.settings.enemy.speed));
        log::debug!("Spawned enemy {id} on floor {floor_index}, facing left: {facing_left}");
        id
    }

    /// Manual reset: same level number and spawn interval, fresh platforms
    pub fn reset(&mut self) {
        self.restart_level();
        self.level_info.reset();
        log::info!("Reset level {}", self.level_number());
    }

    /// Back to level 1 with the base spawn interval
    pub fn new_game(&mut self) {
        self.restart_level();
        self.level_info = LevelInfo::new(&self.settings);
        self.spawn_interval = self.settings.enemy.spawn_interval;
        self.spawn_counter = 0;
        log::info!("New game");
    }

    /// Record the clear and move on to the next level
    pub fn advance_level(&mut self) {
        self.clear_times
            .record(self.timer.elapsed_ms(), self.level_number());

        self.restart_level();
        self.level_info.increase_level();

        let enemy = &self.settings.enemy;
        self.spawn_interval = self
            .spawn_interval
            .saturating_sub(enemy.spawn_interval_step)
            .max(enemy.spawn_interval_min);

        log::info!(
            "Advanced to level {} (spawn interval {} ticks)",
            self.level_number(),
            self.spawn_interval
        );
    }

    fn restart_level(&mut self) {
        self.player.reset();
        self.enemies.clear();
        self.spawn_enemy();
        self.floor
            .generate_platforms(&self.settings.map, self.settings.map.floors, &mut self.rng);
        self.exit.stop_gibbing();
        self.timer.reset();
    }

    /// Everything a renderer needs for this frame
    pub fn snapshot(&self) -> FrameSnapshot {
        let mut actors = Vec::with_capacity(self.enemies.len() + 2);
        actors.push(ActorView {
            kind: ActorKind::Exit,
            id: 0,
            rect: self.exit.rect,
            frame: self.exit.current_frame(),
        });
        actors.extend(self.enemies.iter().map(|e| ActorView {
            kind: ActorKind::Enemy,
            id: e.id,
            rect: e.body.rect,
            frame: e.current_frame(),
        }));
        actors.push(ActorView {
            kind: ActorKind::Player,
            id: 0,
            rect: self.player.body.rect,
            frame: self.player.current_frame(),
        });

        let info = &self.level_info;
        FrameSnapshot {
            tick: self.time_ticks,
            tile_origin: Vec2::new(self.floor.x_offset, self.floor.y_offset),
            map_width: self.floor.map_width,
            tiles: self.floor.tiles.clone(),
            blocks: self.floor.blocks().map(|b| b.rect).collect(),
            actors,
            particles: self
                .exit
                .gibs()
                .particles()
                .iter()
                .map(|p| ParticleView {
                    pos: p.pos,
                    size: p.size,
                    color: p.color,
                })
                .collect(),
            timer: TimerView {
                elapsed_ms: self.timer.elapsed_ms(),
                running: self.timer.is_running(),
                frame_pos: self.timer_display.frame_pos,
                slots: self.timer_display.slots,
                digits: self.timer_display.values(),
            },
            level: LevelView {
                number: self.level_number(),
                tens: info.tens.value(),
                ones: info.ones.value(),
                label_pos: info.label.pos,
                tens_pos: info.tens_sprite.pos,
                ones_pos: info.ones_sprite.pos,
            },
            bonuses: self
                .bonuses
                .iter()
                .map(|b| BonusView {
                    text: b.text.clone(),
                    pos: b.pos,
                    color: b.color,
                })
                .collect(),
        }
    }
}

/// What an actor in the snapshot is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Enemy,
    Exit,
}

/// An animated actor: where to draw it and which sheet frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorView {
    pub kind: ActorKind,
    /// Entity id (enemies only, 0 otherwise)
    pub id: u32,
    pub rect: Rect,
    pub frame: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub size: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerView {
    pub elapsed_ms: f64,
    pub running: bool,
    pub frame_pos: Vec2,
    pub slots: [Rect; 6],
    /// mm ss hh, one decimal digit per slot
    pub digits: [u8; 6],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelView {
    pub number: u32,
    pub tens: u8,
    pub ones: u8,
    pub label_pos: Vec2,
    pub tens_pos: Vec2,
    pub ones_pos: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusView {
    pub text: String,
    pub pos: Vec2,
    pub color: Rgb,
}

/// Read-only render view of a [`Level`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    /// Screen position of tile (0, 0)
    pub tile_origin: Vec2,
    pub map_width: u32,
    pub tiles: Vec<i32>,
    pub blocks: Vec<Rect>,
    /// Draw order: exit, enemies, player
    pub actors: Vec<ActorView>,
    pub particles: Vec<ParticleView>,
    pub timer: TimerView,
    pub level: LevelView,
    pub bonuses: Vec<BonusView>,
}
