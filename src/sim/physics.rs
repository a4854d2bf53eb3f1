//! Gravity integration and bounds containment shared by every moving actor
//!
//! Actors own a [`Body`]; the free functions here advance it one tick. What a
//! collision *means* (landing, ceiling hit, wall) is left to the actor's own state
//! machine - [`collisions`] only reports which obstacles overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::settings::PhysicsSettings;

/// Transparent insets of a sprite's artwork
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
}

/// Physics sub-state of an actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub rect: Rect,
    /// Velocity in pixels per tick (x: dx, y: dy)
    pub vel: Vec2,
    pub facing_left: bool,
    pub falling: bool,
    /// Consecutive ticks since the body last started falling
    pub falling_frames: u32,
    pub dying: bool,
    pub margins: Margins,
}

impl Body {
    pub fn new(rect: Rect, margins: Margins) -> Self {
        Self {
            rect,
            vel: Vec2::ZERO,
            facing_left: false,
            falling: false,
            falling_frames: 0,
            dying: false,
            margins,
        }
    }

    /// Begin (or restart) a fall
    pub fn start_falling(&mut self) {
        self.falling = true;
        self.falling_frames = 1;
    }

    /// Stand on a surface whose top edge is `top`
    pub fn land_on(&mut self, top: f32) {
        self.falling = false;
        self.falling_frames = 1;
        self.vel.y = 0.0;
        self.rect.set_bottom(top);
    }

    /// Rectangle used for overlap tests under `strategy`
    pub fn collision_rect(&self, strategy: CollisionStrategy) -> Rect {
        match strategy {
            CollisionStrategy::Overlap => self.rect,
            CollisionStrategy::MarginAdjusted => {
                let horz = (self.margins.left + self.margins.right) / 2.0;
                self.rect.shrunk_from_bottom(horz, self.margins.top)
            }
        }
    }
}

/// How a body is tested against obstacles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionStrategy {
    /// Full sprite rectangle
    #[default]
    Overlap,
    /// Sprite rectangle shrunk by its transparent margins, bottom-centre anchored
    MarginAdjusted,
}

/// Anything with a rectangle a body can bump into
pub trait Collider {
    fn rect(&self) -> Rect;
}

impl Collider for Rect {
    fn rect(&self) -> Rect {
        *self
    }
}

/// One gravity step: accelerate toward terminal velocity, then move
#[inline]
pub fn fall_step(body: &mut Body, physics: &PhysicsSettings) {
    if body.vel.y < physics.terminal_velocity {
        body.vel.y = (body.vel.y + physics.gravity).min(physics.terminal_velocity);
    }
    body.rect.y += body.vel.y;
    body.falling_frames += 1;
}

/// Gravity integration. Anything not resting exactly on the bounds bottom falls.
pub fn apply_physics(body: &mut Body, bounds: &Rect, physics: &PhysicsSettings) {
    if body.rect.bottom() < bounds.bottom() && !body.falling {
        body.start_falling();
    }

    if body.falling {
        fall_step(body, physics);
    }
}

/// Keep a body inside the playable bounds
///
/// The bottom edge clamps and lands the body. Horizontal movement is applied here
/// unconditionally, then the margin-adjusted edge is clamped to the bounds, zeroing dx.
pub fn contain_to_bounds(body: &mut Body, bounds: &Rect) {
    if body.rect.bottom() > bounds.bottom() {
        body.rect.set_bottom(bounds.bottom());
        body.vel.y = 0.0;
        body.falling = false;
    }

    if body.vel.x > 0.0 {
        body.rect.x += body.vel.x;
        if body.rect.right() - body.margins.right > bounds.right() {
            body.rect.set_right(bounds.right() + body.margins.right);
            body.vel.x = 0.0;
        }
    }

    if body.vel.x < 0.0 {
        body.rect.x += body.vel.x;
        if body.rect.left() + body.margins.left < bounds.left() {
            body.rect.set_left(bounds.left() - body.margins.left);
            body.vel.x = 0.0;
        }
    }
}

/// Obstacles overlapping `body`, in candidate order
pub fn collisions<'a, T, I>(body: &Body, candidates: I, strategy: CollisionStrategy) -> Vec<&'a T>
where
    T: Collider + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let probe = body.collision_rect(strategy);
    candidates
        .into_iter()
        .filter(|c| probe.intersects(&c.rect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bounds() -> Rect {
        Rect::new(280.0, 0.0, 240.0, 552.0)
    }

    fn body_at(x: f32, bottom: f32) -> Body {
        let mut body = Body::new(
            Rect::new(x, 0.0, 24.0, 32.0),
            Margins {
                left: 3.0,
                right: 3.0,
                top: 9.0,
            },
        );
        body.rect.set_bottom(bottom);
        body
    }

    #[test]
    fn test_airborne_body_starts_falling() {
        let physics = PhysicsSettings::default();
        let mut body = body_at(300.0, 100.0);
        apply_physics(&mut body, &bounds(), &physics);
        assert!(body.falling);
        assert_eq!(body.falling_frames, 2);
        assert!((body.vel.y - 1.4).abs() < 1e-5);
        assert!((body.rect.bottom() - 101.4).abs() < 1e-4);
    }

    #[test]
    fn test_grounded_body_stays_put() {
        let physics = PhysicsSettings::default();
        let mut body = body_at(300.0, 552.0);
        apply_physics(&mut body, &bounds(), &physics);
        contain_to_bounds(&mut body, &bounds());
        assert!(!body.falling);
        assert_eq!(body.rect.bottom(), 552.0);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_bottom_clamp_lands() {
        let mut body = body_at(300.0, 560.0);
        body.falling = true;
        body.vel.y = 8.0;
        contain_to_bounds(&mut body, &bounds());
        assert_eq!(body.rect.bottom(), 552.0);
        assert_eq!(body.vel.y, 0.0);
        assert!(!body.falling);
    }

    #[test]
    fn test_right_wall_clamps_with_margin() {
        let mut body = body_at(498.0, 552.0);
        body.vel.x = 2.0;
        contain_to_bounds(&mut body, &bounds());
        assert_eq!(body.rect.right(), 523.0);
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn test_left_wall_clamps_with_margin() {
        let mut body = body_at(278.0, 552.0);
        body.vel.x = -2.0;
        contain_to_bounds(&mut body, &bounds());
        assert_eq!(body.rect.left(), 277.0);
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn test_free_horizontal_move() {
        let mut body = body_at(300.0, 552.0);
        body.vel.x = -2.0;
        contain_to_bounds(&mut body, &bounds());
        assert_eq!(body.rect.left(), 298.0);
        assert_eq!(body.vel.x, -2.0);
    }

    #[test]
    fn test_margin_adjusted_collisions() {
        let body = body_at(300.0, 100.0);
        // Sits in the top margin: only the full rect reaches it
        let above = Rect::new(300.0, 60.0, 24.0, 12.0);
        // Sits beside the right edge inside the horizontal margin
        let beside = Rect::new(322.0, 80.0, 12.0, 12.0);
        let under = Rect::new(300.0, 99.0, 12.0, 12.0);
        let obstacles = [above, beside, under];

        let full = collisions(&body, &obstacles, CollisionStrategy::Overlap);
        assert_eq!(full.len(), 3);

        let shrunk = collisions(&body, &obstacles, CollisionStrategy::MarginAdjusted);
        assert_eq!(shrunk, vec![&under]);
    }

    proptest! {
        #[test]
        fn prop_gravity_accelerates_until_terminal(start in -15.0f32..12.0, ticks in 1usize..40) {
            let physics = PhysicsSettings::default();
            let mut body = body_at(300.0, 0.0);
            body.rect.y = -10_000.0;
            body.falling = true;
            body.vel.y = start;
            for _ in 0..ticks {
                let before = body.vel.y;
                apply_physics(&mut body, &bounds(), &physics);
                let after = body.vel.y;
                prop_assert!(after <= physics.terminal_velocity);
                if before + physics.gravity <= physics.terminal_velocity {
                    prop_assert!((after - before - physics.gravity).abs() < 1e-4);
                } else {
                    prop_assert_eq!(after, physics.terminal_velocity);
                }
            }
        }

        #[test]
        fn prop_resting_is_idempotent(x in 280.0f32..490.0, ticks in 1usize..20) {
            let physics = PhysicsSettings::default();
            let mut body = body_at(x, 552.0);
            for _ in 0..ticks {
                apply_physics(&mut body, &bounds(), &physics);
                contain_to_bounds(&mut body, &bounds());
                prop_assert_eq!(body.rect.bottom(), 552.0);
                prop_assert_eq!(body.vel.y, 0.0);
                prop_assert!(!body.falling);
            }
        }
    }
}
