//! Fixed timestep simulation tick
//!
//! Applies the tick's input intents, then advances every subsystem in a fixed order so
//! that no actor sees another actor's half-updated state.

use serde::{Deserialize, Serialize};

use super::state::Level;
use super::timer::TimeBonus;

/// Discrete input events, already resolved from keys or buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    JumpPressed,
    /// Accepted for completeness; jumping is triggered on press only
    JumpReleased,
    MoveLeftPressed,
    MoveLeftReleased,
    MoveRightPressed,
    MoveRightReleased,
    /// Restart the current level
    Reset,
    /// Restart from level 1
    NewGame,
    /// Debug: spawn an enemy now
    SpawnEnemy,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Applied in order before anything moves
    pub intents: Vec<Intent>,
}

impl TickInput {
    pub fn new(intents: impl IntoIterator<Item = Intent>) -> Self {
        Self {
            intents: intents.into_iter().collect(),
        }
    }
}

fn apply_intent(level: &mut Level, intent: Intent) {
    let walk_speed = level.settings.player.walk_speed;
    match intent {
        Intent::JumpPressed => level.player.jump(&level.settings),
        Intent::JumpReleased => {}
        Intent::MoveLeftPressed => level.player.press_left(walk_speed),
        Intent::MoveRightPressed => level.player.press_right(walk_speed),
        Intent::MoveLeftReleased | Intent::MoveRightReleased => level.player.release_horizontal(),
        Intent::Reset => level.reset(),
        Intent::NewGame => level.new_game(),
        Intent::SpawnEnemy => {
            level.spawn_enemy();
        }
    }
}

/// Advance the level by one fixed timestep of `dt_ms` milliseconds
pub fn tick(level: &mut Level, input: &TickInput, dt_ms: f64) {
    for &intent in &input.intents {
        apply_intent(level, intent);
    }

    if level.player.at_top {
        level.timer.stop();
    }
    if level.player.won_level {
        level.advance_level();
    }

    // Player first: block breaks and kills must land before enemies move
    let strike = level
        .player
        .update(&level.settings, &mut level.floor, &mut level.enemies);
    if let Some(strike) = strike {
        for killed in &strike.kills {
            level.bonuses.push(TimeBonus::award(
                killed,
                &level.settings.bonus,
                &mut level.timer,
            ));
        }
    }

    level.spawn_counter += 1;
    if level.spawn_counter >= level.spawn_interval {
        level.spawn_counter = 0;
        level.spawn_enemy();
    }

    let (settings, floor) = (&level.settings, &level.floor);
    level.enemies.retain_mut(|enemy| {
        let alive = enemy.update(settings, floor);
        if !alive {
            log::debug!("Enemy {} left the screen", enemy.id);
        }
        alive
    });

    level
        .exit
        .update(&level.settings, &level.enemies, &mut level.rng);

    level.level_info.update();
    level.timer.advance(dt_ms);
    level.timer_display.show(level.timer.readout());

    for bonus in &mut level.bonuses {
        bonus.update(&mut level.rng);
    }
    level.bonuses.retain(TimeBonus::alive);

    level.time_ticks += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TICK_MS;
    use crate::settings::Settings;
    use crate::sim::enemy::Enemy;
    use crate::sim::rect::Rect;

    fn quiet_level(seed: u64) -> Level {
        let mut level = Level::new(Settings::default(), seed);
        level.enemies.clear();
        level
    }

    fn idle(level: &mut Level, ticks: usize) {
        let input = TickInput::default();
        for _ in 0..ticks {
            tick(level, &input, TICK_MS);
        }
    }

    #[test]
    fn test_spawn_cadence() {
        let mut level = quiet_level(5);
        idle(&mut level, 119);
        assert!(level.enemies.is_empty());
        idle(&mut level, 1);
        assert_eq!(level.enemies.len(), 1);
        assert_eq!(level.spawn_counter, 0);

        tick(&mut level, &TickInput::new([Intent::SpawnEnemy]), TICK_MS);
        assert_eq!(level.enemies.len(), 2);
    }

    #[test]
    fn test_timer_runs_and_displays() {
        let mut level = quiet_level(5);
        idle(&mut level, 45);
        assert!((level.timer.elapsed_ms() - 1500.0).abs() < 1e-6);
        let digits = level.snapshot().timer.digits;
        assert_eq!(&digits[..4], [0, 0, 0, 1]);
    }

    #[test]
    fn test_block_break_kills_enemy_and_awards_bonus() {
        let mut level = quiet_level(8);
        // Leave only the top blocks in the lowest platform row
        let row = &mut level.floor.rows[6];
        row.blocks.retain(|b| b.rect.top() == 480.0);
        let blocks_before = level.floor.block_count();

        let mut target = Enemy::spawn(99, Rect::new(404.0, 464.0, 16.0, 16.0), false, 1.0);
        target.body.vel.x = 0.0;
        level.enemies.push(target);

        tick(&mut level, &TickInput::new([Intent::JumpPressed]), TICK_MS);
        let mut ticks = 1;
        while level.bonuses.is_empty() {
            idle(&mut level, 1);
            ticks += 1;
            assert!(ticks < 10, "player never reached the platform");
        }

        assert_eq!(level.player.body.vel.y, 0.0);
        assert_eq!(level.floor.block_count(), blocks_before - 2);
        assert!(level.enemies[0].body.dying);
        assert_eq!(level.bonuses.len(), 1);
        // Bonus floors the clock at zero before this tick's time is added
        assert_eq!(level.timer.elapsed_ms(), TICK_MS);
        assert!(!level.player.body.dying);
    }

    #[test]
    fn test_drain_enemy_removed_with_gibs() {
        let mut level = quiet_level(2);
        let mut rect = Rect::new(371.0, 0.0, 16.0, 16.0);
        rect.set_bottom(level.floor.bounds.bottom());
        level.enemies.push(Enemy::spawn(50, rect, false, 1.0));

        idle(&mut level, 1);
        assert!(level.enemies[0].body.dying);

        let mut gibbed = false;
        for _ in 0..60 {
            idle(&mut level, 1);
            gibbed |= level.exit.is_gibbing();
        }
        assert!(gibbed);
        assert!(level.enemies.is_empty());
    }

    #[test]
    fn test_win_after_idling_at_top() {
        let mut level = quiet_level(4);
        level.player.body.rect.set_bottom(48.0);

        idle(&mut level, 1);
        assert!(level.player.at_top);
        let frozen = level.timer.elapsed_ms();

        let mut ticks = 1;
        while !level.player.won_level {
            idle(&mut level, 1);
            ticks += 1;
            assert!(ticks <= 92);
        }
        assert_eq!(ticks, 92);
        assert!(!level.timer.is_running());
        assert_eq!(level.timer.elapsed_ms(), frozen);

        idle(&mut level, 1);
        assert_eq!(level.level_number(), 2);
        assert_eq!(level.spawn_interval, 115);
        assert_eq!(level.clear_times.entries.len(), 1);
        assert!(!level.player.at_top);
        assert!(level.timer.is_running());
        assert_eq!(level.player.body.rect.bottom(), level.floor.bounds.bottom());
    }

    #[test]
    fn test_move_intents_walk_player() {
        let mut level = quiet_level(6);
        tick(&mut level, &TickInput::new([Intent::MoveLeftPressed]), TICK_MS);
        idle(&mut level, 9);
        assert_eq!(level.player.body.rect.left(), 380.0);

        tick(&mut level, &TickInput::new([Intent::MoveLeftReleased]), TICK_MS);
        assert_eq!(level.player.body.rect.left(), 380.0);
        tick(&mut level, &TickInput::new([Intent::JumpReleased]), TICK_MS);
        assert_eq!(level.player.body.vel, glam::Vec2::ZERO);
    }

    #[test]
    fn test_reset_intents() {
        let mut level = quiet_level(6);
        level.advance_level();
        tick(&mut level, &TickInput::new([Intent::Reset]), TICK_MS);
        assert_eq!(level.level_number(), 2);
        assert_eq!(level.enemies.len(), 1);

        tick(&mut level, &TickInput::new([Intent::NewGame]), TICK_MS);
        assert_eq!(level.level_number(), 1);
        assert_eq!(level.spawn_interval, 120);
    }

    #[test]
    fn test_determinism() {
        let script = |t: usize| -> TickInput {
            match t % 60 {
                0 => TickInput::new([Intent::MoveRightPressed, Intent::JumpPressed]),
                10 => TickInput::new([Intent::JumpPressed]),
                30 => TickInput::new([Intent::MoveRightReleased, Intent::MoveLeftPressed]),
                45 => TickInput::new([Intent::MoveLeftReleased, Intent::JumpPressed]),
                _ => TickInput::default(),
            }
        };

        let mut a = Level::new(Settings::default(), 99999);
        let mut b = Level::new(Settings::default(), 99999);
        for t in 0..600 {
            let input = script(t);
            tick(&mut a, &input, TICK_MS);
            tick(&mut b, &input, TICK_MS);
        }
        assert_eq!(a.snapshot(), b.snapshot());

        let mut c = Level::new(Settings::default(), 12345);
        for t in 0..600 {
            tick(&mut c, &script(t), TICK_MS);
        }
        assert_ne!(a.snapshot().blocks, c.snapshot().blocks);
    }
}
