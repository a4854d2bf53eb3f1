//! Walking enemies
//!
//! Enemies patrol their platform, turn around at the playable walls, walk off the end of
//! a row when only a trailing edge is still supported, and die falling out of the map
//! once they reach the drain or are struck from below.

use serde::{Deserialize, Serialize};

use super::animation::{Animator, Sequence};
use super::floor::{Block, Floor};
use super::physics::{
    Body, CollisionStrategy, Margins, apply_physics, collisions, contain_to_bounds, fall_step,
};
use super::rect::Rect;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyAnim {
    WalkLeft,
    WalkRight,
    JumpDownLeft,
    JumpDownRight,
    Dead,
}

impl Sequence for EnemyAnim {
    fn frames(self) -> &'static [usize] {
        match self {
            EnemyAnim::WalkLeft => &[0, 1, 2, 1],
            EnemyAnim::WalkRight => &[3, 4, 5, 4],
            EnemyAnim::JumpDownLeft | EnemyAnim::JumpDownRight => &[6],
            EnemyAnim::Dead => &[7],
        }
    }

    fn frames_per_update(self) -> u32 {
        match self {
            EnemyAnim::WalkLeft | EnemyAnim::WalkRight => 2,
            EnemyAnim::JumpDownLeft | EnemyAnim::JumpDownRight => 1,
            EnemyAnim::Dead => 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub body: Body,
    speed: f32,
    animator: Animator<EnemyAnim>,
}

impl Enemy {
    /// Enemy already walking in its facing direction
    pub fn spawn(id: u32, rect: Rect, facing_left: bool, speed: f32) -> Self {
        let mut body = Body::new(rect, Margins::default());
        body.facing_left = facing_left;
        body.vel.x = if facing_left { -speed } else { speed };
        let anim = if facing_left {
            EnemyAnim::WalkLeft
        } else {
            EnemyAnim::WalkRight
        };
        Self {
            id,
            body,
            speed,
            animator: Animator::new(anim),
        }
    }

    #[inline]
    pub fn anim(&self) -> EnemyAnim {
        self.animator.state()
    }

    #[inline]
    pub fn current_frame(&self) -> usize {
        self.animator.current_frame()
    }

    /// Struck from below: bounce up, then fall out of the map
    pub fn kill(&mut self, death_velocity: f32) {
        self.body.dying = true;
        self.body.vel.y = death_velocity;
    }

    /// Advance one tick. Returns `false` once the enemy has fallen off the screen.
    pub fn update(&mut self, settings: &Settings, floor: &Floor) -> bool {
        let mut alive = true;

        if !self.body.dying {
            let last_dx = self.body.vel.x;
            apply_physics(&mut self.body, &floor.bounds, &settings.physics);
            contain_to_bounds(&mut self.body, &floor.bounds);

            let hits: Vec<Block> = collisions(
                &self.body,
                floor.blocks_near(&self.body.rect),
                CollisionStrategy::Overlap,
            )
            .into_iter()
            .copied()
            .collect();
            self.handle_block_collisions(&hits);

            if last_dx != 0.0 && self.body.vel.x == 0.0 {
                self.turn_around();
            }

            if floor.drain.intersects(&self.body.rect) {
                log::debug!("Enemy {} reached the drain", self.id);
                self.body.dying = true;
                self.body.start_falling();
            }
        } else {
            fall_step(&mut self.body, &settings.physics);
            alive = self.body.rect.top() <= settings.screen.height;
        }

        self.update_animation();
        self.animator.advance();
        alive
    }

    fn turn_around(&mut self) {
        self.body.facing_left = !self.body.facing_left;
        self.body.vel.x = if self.body.facing_left {
            -self.speed
        } else {
            self.speed
        };
    }

    /// Rest on the first block, unless it is the only one and the leading edge has
    /// already left it
    fn handle_block_collisions(&mut self, hits: &[Block]) {
        let supported = match hits {
            [] => return,
            [only] => self.leading_edge_over(&only.rect),
            _ => true,
        };
        if supported {
            self.body.land_on(hits[0].rect.top());
        }
    }

    fn leading_edge_over(&self, block: &Rect) -> bool {
        let rect = &self.body.rect;
        if self.body.facing_left {
            block.left() <= rect.left() && rect.left() < block.right()
        } else {
            block.left() < rect.right() && rect.right() <= block.right()
        }
    }

    fn update_animation(&mut self) {
        let body = &self.body;
        let anim = if body.dying {
            EnemyAnim::Dead
        } else if body.vel.y == 0.0 {
            if body.vel.x < 0.0 {
                EnemyAnim::WalkLeft
            } else {
                EnemyAnim::WalkRight
            }
        } else if body.vel.y > 0.0 {
            if body.facing_left {
                EnemyAnim::JumpDownLeft
            } else {
                EnemyAnim::JumpDownRight
            }
        } else {
            self.animator.state()
        };
        self.animator.set(anim);
    }
}
