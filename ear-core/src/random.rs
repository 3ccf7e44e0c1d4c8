//! Uniform random draws used by the question generator.
//!
//! The generator never touches a global RNG; callers hand it a
//! [`RandomSource`]. Production code passes a `fastrand::Rng`, tests pass a
//! seeded one or a [`ScriptedRandom`].

use std::collections::VecDeque;

pub trait RandomSource {
    /// A uniform index in `0..len`. Callers never pass `len == 0`.
    fn index(&mut self, len: usize) -> usize;

    /// A fair coin flip.
    fn coin(&mut self) -> bool;
}

impl RandomSource for fastrand::Rng {
    fn index(&mut self, len: usize) -> usize {
        self.usize(..len)
    }

    fn coin(&mut self) -> bool {
        self.bool()
    }
}

/// Replays a fixed sequence of draws.
///
/// Index draws are reduced modulo `len`. Once a queue runs dry, index draws
/// return 0 and coin flips return `true`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    indices: VecDeque<usize>,
    coins: VecDeque<bool>,
}

impl ScriptedRandom {
    pub fn new(
        indices: impl IntoIterator<Item = usize>,
        coins: impl IntoIterator<Item = bool>,
    ) -> Self {
        Self {
            indices: indices.into_iter().collect(),
            coins: coins.into_iter().collect(),
        }
    }

    /// Index draws only; every coin flip comes up `true`.
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self::new(indices, std::iter::empty())
    }

    /// Draws left in each queue, as (indices, coins).
    pub fn remaining(&self) -> (usize, usize) {
        (self.indices.len(), self.coins.len())
    }
}

impl RandomSource for ScriptedRandom {
    fn index(&mut self, len: usize) -> usize {
        self.indices.pop_front().map_or(0, |i| i % len.max(1))
    }

    fn coin(&mut self) -> bool {
        self.coins.pop_front().unwrap_or(true)
    }
}
