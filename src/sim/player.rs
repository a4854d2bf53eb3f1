//! Player state machine
//!
//! Movement intents set velocity directly; `update` then runs the shared physics, block
//! collisions (landing, side walls, breaking blocks from below), enemy contact and the
//! idle-at-the-top win countdown.

use serde::{Deserialize, Serialize};

use super::animation::{Animator, Sequence};
use super::enemy::Enemy;
use super::floor::{Block, Floor};
use super::physics::{
    Body, CollisionStrategy, Margins, apply_physics, collisions, contain_to_bounds, fall_step,
};
use super::rect::Rect;
use crate::consts::WIN_IDLE_TICKS;
use crate::settings::Settings;

/// Visual state of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAnim {
    IdleLeft,
    IdleRight,
    WalkLeft,
    WalkRight,
    JumpUpLeft,
    JumpUpRight,
    JumpDownLeft,
    JumpDownRight,
    Dead,
    /// Waiting out the win countdown at the top of the map
    IdleTop,
}

impl Sequence for PlayerAnim {
    fn frames(self) -> &'static [usize] {
        match self {
            PlayerAnim::IdleLeft | PlayerAnim::IdleTop => &[0, 1, 2, 3, 2, 1],
            PlayerAnim::IdleRight => &[5, 6, 7, 8, 7, 6],
            PlayerAnim::WalkLeft => &[0, 10, 11, 10],
            PlayerAnim::WalkRight => &[5, 12, 13, 12],
            PlayerAnim::JumpUpLeft => &[15],
            PlayerAnim::JumpDownLeft => &[16],
            PlayerAnim::JumpUpRight => &[17],
            PlayerAnim::JumpDownRight => &[18],
            PlayerAnim::Dead => &[4],
        }
    }

    fn frames_per_update(self) -> u32 {
        match self {
            PlayerAnim::WalkLeft | PlayerAnim::WalkRight => 2,
            _ => 5,
        }
    }
}

impl PlayerAnim {
    /// Standing or walking on solid ground
    pub fn is_grounded(self) -> bool {
        matches!(
            self,
            PlayerAnim::IdleLeft | PlayerAnim::IdleRight | PlayerAnim::WalkLeft | PlayerAnim::WalkRight
        )
    }
}

/// Blocks broken from below this tick and the enemies that died with them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Strike {
    pub blocks: Vec<Block>,
    /// Rectangles of the enemies killed, at the moment of death
    pub kills: Vec<Rect>,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    animator: Animator<PlayerAnim>,
    spawn: Rect,
    pub air_jumps: u32,
    pub max_air_jumps: u32,
    /// In the top region; input is ignored while the win countdown runs
    pub idle_top: bool,
    pub idle_counter: u32,
    pub won_level: bool,
    /// Reached the top this level (stops the timer)
    pub at_top: bool,
}

impl Player {
    /// Player standing on the bounds bottom at the horizontal screen centre
    pub fn new(settings: &Settings, bounds: &Rect) -> Self {
        let mut spawn = Rect::new(0.0, 0.0, settings.player.width, settings.player.height);
        spawn.set_bottom(bounds.bottom());
        spawn.set_left(settings.screen.width / 2.0);

        let margins = Margins {
            left: settings.player.horz_margin,
            right: settings.player.horz_margin,
            top: settings.player.top_margin,
        };
        let mut body = Body::new(spawn, margins);
        body.facing_left = true;

        Self {
            body,
            animator: Animator::new(PlayerAnim::IdleLeft),
            spawn,
            air_jumps: 0,
            max_air_jumps: settings.player.max_air_jumps,
            idle_top: false,
            idle_counter: 0,
            won_level: false,
            at_top: false,
        }
    }

    /// Back to the spawn point with all per-level flags cleared
    pub fn reset(&mut self) {
        self.body.rect = self.spawn;
        self.body.vel = glam::Vec2::ZERO;
        self.body.dying = false;
        self.body.falling = false;
        self.body.falling_frames = 0;
        self.air_jumps = 0;
        self.idle_counter = 0;
        self.idle_top = false;
        self.won_level = false;
        self.at_top = false;
    }

    #[inline]
    pub fn anim(&self) -> PlayerAnim {
        self.animator.state()
    }

    #[inline]
    pub fn current_frame(&self) -> usize {
        self.animator.current_frame()
    }

    fn accepts_input(&self) -> bool {
        !self.idle_top
    }

    pub fn press_left(&mut self, walk_speed: f32) {
        if self.accepts_input() && self.body.vel.x == 0.0 {
            self.body.vel.x = -walk_speed;
            self.body.facing_left = true;
        }
    }

    pub fn press_right(&mut self, walk_speed: f32) {
        if self.accepts_input() && self.body.vel.x == 0.0 {
            self.body.vel.x = walk_speed;
            self.body.facing_left = false;
        }
    }

    pub fn release_horizontal(&mut self) {
        if self.accepts_input() {
            self.body.vel.x = 0.0;
        }
    }

    /// Ground jump, or an air jump while the budget lasts
    pub fn jump(&mut self, settings: &Settings) {
        if !self.accepts_input() {
            return;
        }
        if !self.body.falling {
            self.body.vel.y = settings.player.jump_velocity;
            self.body.falling = true;
        } else if self.air_jumps < self.max_air_jumps {
            self.body.vel.y = settings.player.air_jump_velocity;
            self.air_jumps += 1;
        }
    }

    /// Advance one tick. Blocks broken from below are removed from `floor` and enemies
    /// standing on them are killed before enemy contact is checked.
    pub fn update(
        &mut self,
        settings: &Settings,
        floor: &mut Floor,
        enemies: &mut [Enemy],
    ) -> Option<Strike> {
        let mut strike = None;

        if !self.body.dying {
            if self.idle_top {
                self.idle_counter += 1;
                if self.idle_counter > WIN_IDLE_TICKS {
                    self.won_level = true;
                }
            } else {
                apply_physics(&mut self.body, &floor.bounds, &settings.physics);
                contain_to_bounds(&mut self.body, &floor.bounds);

                let probe = self.body.collision_rect(CollisionStrategy::MarginAdjusted);
                let hits: Vec<Block> = collisions(
                    &self.body,
                    floor.blocks_near(&probe),
                    CollisionStrategy::MarginAdjusted,
                )
                .into_iter()
                .copied()
                .collect();
                strike = self.handle_block_collisions(&hits, settings, floor, enemies);

                if self.body.vel.y == 0.0 {
                    self.air_jumps = 0;
                }

                if self.touches_enemy(enemies) {
                    log::debug!("Player hit by an enemy at {:?}", self.body.rect);
                    self.body.dying = true;
                    self.body.vel.y = settings.player.death_velocity;
                    self.body.start_falling();
                }

                let top_region = floor.bounds.top() + 2.0 * settings.map.tile_height;
                if !self.body.dying
                    && self.body.rect.bottom() <= top_region
                    && self.anim().is_grounded()
                {
                    self.idle_top = true;
                    self.at_top = true;
                    self.idle_counter = 0;
                }
            }
        } else if self.body.rect.top() > settings.screen.height {
            self.body.rect.set_bottom(floor.bounds.bottom());
            self.body.vel = glam::Vec2::ZERO;
            self.body.dying = false;
        } else {
            fall_step(&mut self.body, &settings.physics);
        }

        self.update_animation();
        self.animator.advance();
        strike
    }

    fn touches_enemy(&self, enemies: &[Enemy]) -> bool {
        let probe = self.body.collision_rect(CollisionStrategy::MarginAdjusted);
        enemies
            .iter()
            .any(|e| !e.body.dying && probe.intersects(&e.body.rect))
    }

    /// Only the first block decides the response
    fn handle_block_collisions(
        &mut self,
        hits: &[Block],
        settings: &Settings,
        floor: &mut Floor,
        enemies: &mut [Enemy],
    ) -> Option<Strike> {
        let block = hits.first()?.rect;
        let body = &mut self.body;
        let side_hit = body.rect.right() > block.right() || body.rect.left() < block.left();

        if body.vel.y > 0.0 {
            body.land_on(block.top());
            self.air_jumps = 0;
        } else if body.vel.y < 0.0 {
            if body.rect.bottom() > block.bottom() {
                body.vel.y = 0.0;
                body.rect.set_top(block.bottom() - body.margins.top);
                return Some(self.break_blocks(hits, settings, floor, enemies));
            }
        } else if body.vel.x > 0.0 {
            if side_hit {
                body.vel.x = 0.0;
                body.rect.set_right(block.left() + body.margins.right);
            }
        } else if body.vel.x < 0.0 && side_hit {
            body.vel.x = 0.0;
            body.rect.set_left(block.right() - body.margins.left);
        }
        None
    }

    /// Remove struck blocks and kill live enemies in the row directly above them
    fn break_blocks(
        &self,
        hits: &[Block],
        settings: &Settings,
        floor: &mut Floor,
        enemies: &mut [Enemy],
    ) -> Strike {
        let ids: Vec<u32> = hits.iter().map(|b| b.id).collect();
        floor.remove_blocks(&ids);

        let first = hits[0].rect;
        let kill_zone = hits
            .iter()
            .fold(first, |zone, b| zone.union(&b.rect))
            .translated(glam::Vec2::new(0.0, -first.h));

        let mut kills = Vec::new();
        for enemy in enemies.iter_mut() {
            if !enemy.body.dying && kill_zone.intersects(&enemy.body.rect) {
                kills.push(enemy.body.rect);
                enemy.kill(settings.enemy.death_velocity);
            }
        }

        log::debug!(
            "Broke {} block(s) from below, killed {} enemies",
            hits.len(),
            kills.len()
        );
        Strike {
            blocks: hits.to_vec(),
            kills,
        }
    }

    fn update_animation(&mut self) {
        let body = &self.body;
        let anim = if self.idle_top {
            PlayerAnim::IdleTop
        } else if body.dying {
            PlayerAnim::Dead
        } else if body.vel.x == 0.0 && body.vel.y == 0.0 {
            if body.facing_left {
                PlayerAnim::IdleLeft
            } else {
                PlayerAnim::IdleRight
            }
        } else if body.vel.y == 0.0 {
            if body.vel.x < 0.0 {
                PlayerAnim::WalkLeft
            } else {
                PlayerAnim::WalkRight
            }
        } else if body.vel.y < 0.0 {
            if body.facing_left {
                PlayerAnim::JumpUpLeft
            } else {
                PlayerAnim::JumpUpRight
            }
        } else if body.facing_left {
            PlayerAnim::JumpDownLeft
        } else {
            PlayerAnim::JumpDownRight
        };
        self.animator.set(anim);
    }
}
