//! Lane-continuation choice for the next platform.
//!
//! The generator asks a [`LaneChooser`] where the next platform goes, given the lane the
//! runner is in. Production uses [`RandomLaneChooser`] over a seeded `StdRng`; tests use
//! [`ScriptedLaneChooser`] to pin the layout.

use std::collections::VecDeque;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::lane::Lane;

pub trait LaneChooser {
    /// Lane for the next platform. Must be `current` or a neighbour of it.
    fn choose(&mut self, current: Lane) -> Lane;
}

/// Middle: uniform over the three lanes. Edge lanes: fair coin between staying and
/// stepping back to the middle.
#[derive(Debug, Clone)]
pub struct RandomLaneChooser<R = StdRng> {
    rng: R,
}

impl RandomLaneChooser<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomLaneChooser<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> LaneChooser for RandomLaneChooser<R> {
    fn choose(&mut self, current: Lane) -> Lane {
        match current {
            Lane::Middle => match self.rng.gen_range(0..3) {
                0 => Lane::Left,
                1 => Lane::Middle,
                _ => Lane::Right,
            },
            Lane::Left => {
                if self.rng.gen_bool(0.5) {
                    Lane::Left
                } else {
                    Lane::Middle
                }
            }
            Lane::Right => {
                if self.rng.gen_bool(0.5) {
                    Lane::Right
                } else {
                    Lane::Middle
                }
            }
        }
    }
}

/// Replays a fixed list of answers; once exhausted it keeps the current lane.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLaneChooser {
    script: VecDeque<Lane>,
}

impl ScriptedLaneChooser {
    pub fn new(script: impl IntoIterator<Item = Lane>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn push(&mut self, lane: Lane) {
        self.script.push_back(lane);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl LaneChooser for ScriptedLaneChooser {
    fn choose(&mut self, current: Lane) -> Lane {
        self.script.pop_front().unwrap_or(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_choices_stay_adjacent() {
        let mut chooser = RandomLaneChooser::seeded(7);
        for current in Lane::ALL {
            for _ in 0..200 {
                let next = chooser.choose(current);
                assert!(current.reaches(next), "{current:?} -> {next:?}");
            }
        }
    }

    #[test]
    fn middle_reaches_every_lane() {
        let mut chooser = RandomLaneChooser::seeded(99);
        let mut seen = [false; 3];
        for _ in 0..300 {
            match chooser.choose(Lane::Middle) {
                Lane::Left => seen[0] = true,
                Lane::Middle => seen[1] = true,
                Lane::Right => seen[2] = true,
            }
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RandomLaneChooser::seeded(12345);
        let mut b = RandomLaneChooser::seeded(12345);
        let seq_a: Vec<_> = (0..50).map(|_| a.choose(Lane::Middle)).collect();
        let seq_b: Vec<_> = (0..50).map(|_| b.choose(Lane::Middle)).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn scripted_falls_back_to_current() {
        let mut chooser = ScriptedLaneChooser::new([Lane::Left]);
        assert_eq!(chooser.choose(Lane::Middle), Lane::Left);
        assert_eq!(chooser.remaining(), 0);
        assert_eq!(chooser.choose(Lane::Right), Lane::Right);
    }
}
