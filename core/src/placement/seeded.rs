use core::ops::Range;
use rand::prelude::*;

use super::UniformSource;

/// Reproducible [`UniformSource`] backed by a seeded small RNG.
#[derive(Clone, Debug)]
pub struct SeededSource {
    seed: u64,
    rng: SmallRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for SeededSource {
    fn default() -> Self {
        Self::new(0)
    }
}

impl UniformSource for SeededSource {
    fn pick(&mut self, range: Range<usize>) -> usize {
        self.rng.random_range(range)
    }
}
