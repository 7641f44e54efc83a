//! The run's single seeded random generator.
//!
//! One `SimRng` is owned by the simulation engine.  It is consulted only in
//! sequential sections (initial placement, informed-role assignment, voter
//! partner selection), so a fixed seed and a fixed tick count always give
//! the same run, with or without the `parallel` feature.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Pick one index uniformly from `0..n`.  `None` when `n == 0`.
    #[inline]
    pub fn pick(&mut self, n: usize) -> Option<usize> {
        (n > 0).then(|| self.0.gen_range(0..n))
    }

    /// Pick one index uniformly from `0..n`, never returning `exclude`.
    ///
    /// `None` when no other index exists (`n < 2`, or `n == 1` and the only
    /// index is excluded).  If `exclude >= n` this is the same as [`pick`].
    ///
    /// [`pick`]: SimRng::pick
    pub fn pick_other(&mut self, n: usize, exclude: usize) -> Option<usize> {
        if exclude >= n {
            return self.pick(n);
        }
        if n < 2 {
            return None;
        }
        // Draw from n - 1 slots and skip over the excluded one.
        let i = self.0.gen_range(0..n - 1);
        Some(if i >= exclude { i + 1 } else { i })
    }
}
