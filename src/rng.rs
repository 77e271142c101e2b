//! Random-number source used by the k-partition and SOM routines.
//!
//! The clustering algorithms never touch a process-global generator; every
//! call site that needs randomness takes a `&mut impl RandomSource` argument,
//! which makes `kcluster`/`som_cluster` deterministic and re-entrant for a
//! given seed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// The operations the clustering routines need from a random source.
pub trait RandomSource {
    /// A uniformly distributed integer in `[lo, hi)`.
    fn uniform_index(&mut self, lo: usize, hi: usize) -> usize;

    /// A uniformly distributed real in `[a, b)`.
    fn uniform_real(&mut self, a: f64, b: f64) -> f64;

    /// Shuffles `values` in place into a uniformly random permutation.
    fn shuffle(&mut self, values: &mut [usize]);
}

/// Default `RandomSource` backed by `rand::rngs::SmallRng`.
pub struct SmallRngSource {
    rng: SmallRng,
}

impl SmallRngSource {
    /// Seeds a new source from the OS entropy pool.
    pub fn from_entropy() -> Self {
        SmallRngSource { rng: SmallRng::from_entropy() }
    }

    /// Seeds a new source deterministically, for reproducible tests.
    pub fn from_seed(seed: u64) -> Self {
        SmallRngSource { rng: SmallRng::seed_from_u64(seed) }
    }
}

impl RandomSource for SmallRngSource {
    fn uniform_index(&mut self, lo: usize, hi: usize) -> usize {
        self.rng.gen_range(lo..hi)
    }

    fn uniform_real(&mut self, a: f64, b: f64) -> f64 {
        self.rng.gen_range(a..b)
    }

    fn shuffle(&mut self, values: &mut [usize]) {
        // Fisher-Yates, consistent with the uniform_index contract above.
        for i in (1..values.len()).rev() {
            let j = self.uniform_index(0, i + 1);
            values.swap(i, j);
        }
    }
}
