//! Frame sequencing for animated actors
//!
//! An [`Animation`] is a cyclic list of sprite-sheet indices with a per-step delay.
//! An [`Animator`] pairs the current abstract state of an actor with the animation that
//! state selects, restarting the sequence only when the state actually changes.

/// Maps an abstract actor state to its frame sequence
pub trait Sequence: Copy + Eq + std::fmt::Debug {
    /// Sprite-sheet indices played in order, then repeated
    fn frames(self) -> &'static [usize];
    /// Ticks to hold each frame beyond the first
    fn frames_per_update(self) -> u32;
}

/// Cyclic frame sequence with a hold delay
#[derive(Debug, Clone)]
pub struct Animation {
    frames: &'static [usize],
    frames_per_update: u32,
    frames_delayed: u32,
    index: usize,
}

impl Animation {
    pub fn new(frames: &'static [usize], frames_per_update: u32) -> Self {
        assert!(!frames.is_empty(), "animation needs at least one frame");
        Self {
            frames,
            frames_per_update,
            frames_delayed: 0,
            index: 0,
        }
    }

    /// Sprite-sheet index to draw this tick
    #[inline]
    pub fn current_frame(&self) -> usize {
        self.frames[self.index]
    }

    /// Position within the sequence
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.frames_delayed = 0;
    }

    /// Call once per tick. Each frame is shown for `frames_per_update + 1` ticks.
    pub fn advance(&mut self) {
        if self.frames_delayed >= self.frames_per_update {
            self.frames_delayed = 0;
            self.index += 1;
            if self.index >= self.frames.len() {
                self.index = 0;
            }
        } else {
            self.frames_delayed += 1;
        }
    }
}

/// Current state of an actor plus the animation it selects
#[derive(Debug, Clone)]
pub struct Animator<S: Sequence> {
    state: S,
    animation: Animation,
}

impl<S: Sequence> Animator<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            animation: Animation::new(state.frames(), state.frames_per_update()),
        }
    }

    #[inline]
    pub fn state(&self) -> S {
        self.state
    }

    /// Switch to `state`, restarting its sequence. No-op when already current.
    pub fn set(&mut self, state: S) {
        if self.state != state {
            self.state = state;
            self.animation = Animation::new(state.frames(), state.frames_per_update());
        }
    }

    pub fn advance(&mut self) {
        self.animation.advance();
    }

    #[inline]
    pub fn current_frame(&self) -> usize {
        self.animation.current_frame()
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Blink {
        Open,
        Shut,
    }

    impl Sequence for Blink {
        fn frames(self) -> &'static [usize] {
            match self {
                Blink::Open => &[0, 1, 2],
                Blink::Shut => &[7],
            }
        }

        fn frames_per_update(self) -> u32 {
            match self {
                Blink::Open => 2,
                Blink::Shut => 5,
            }
        }
    }

    #[test]
    fn test_holds_then_steps() {
        let mut anim = Animation::new(&[4, 5, 6], 2);
        assert_eq!(anim.current_frame(), 4);
        anim.advance();
        anim.advance();
        assert_eq!(anim.current_frame(), 4);
        anim.advance();
        assert_eq!(anim.current_frame(), 5);
    }

    #[test]
    fn test_wraps_to_start() {
        let mut anim = Animation::new(&[4, 5, 6], 0);
        anim.advance();
        anim.advance();
        assert_eq!(anim.current_frame(), 6);
        anim.advance();
        assert_eq!(anim.index(), 0);
    }

    #[test]
    fn test_reset_restarts() {
        let mut anim = Animation::new(&[1, 2], 1);
        for _ in 0..3 {
            anim.advance();
        }
        anim.reset();
        assert_eq!(anim.index(), 0);
        anim.advance();
        assert_eq!(anim.index(), 0);
        anim.advance();
        assert_eq!(anim.index(), 1);
    }

    #[test]
    #[should_panic(expected = "at least one frame")]
    fn test_empty_sequence_panics() {
        let _ = Animation::new(&[], 1);
    }

    #[test]
    fn test_animator_set_same_state_keeps_progress() {
        let mut animator = Animator::new(Blink::Open);
        for _ in 0..3 {
            animator.advance();
        }
        assert_eq!(animator.current_frame(), 1);

        animator.set(Blink::Open);
        assert_eq!(animator.current_frame(), 1);

        animator.set(Blink::Shut);
        assert_eq!(animator.current_frame(), 7);
        animator.set(Blink::Open);
        assert_eq!(animator.animation().index(), 0);
    }

    proptest! {
        #[test]
        fn prop_one_step_per_hold(delay in 0u32..10, len in 1usize..6) {
            static FRAMES: [usize; 6] = [0, 1, 2, 3, 4, 5];
            let mut anim = Animation::new(&FRAMES[..len], delay);
            anim.reset();
            for _ in 0..=delay {
                anim.advance();
            }
            prop_assert_eq!(anim.index(), 1 % len);

            anim.reset();
            for _ in 0..(len as u32 * (delay + 1)) {
                anim.advance();
            }
            prop_assert_eq!(anim.index(), 0);
        }
    }
}
