//! Deterministic random number generation.
//!
//! Wraps PCG so that a given master seed reproduces the exact same sequence
//! of episodes, weight initializations, and batch shuffles across runs and
//! platforms.

use rand::prelude::*;
use rand_pcg::Pcg64;

/// Deterministic, reproducible random number generator.
#[derive(Debug, Clone)]
pub struct DemoRng {
    /// Master seed for reproducibility.
    master_seed: u64,
    /// Internal PCG state.
    rng: Pcg64,
}

impl DemoRng {
    /// Create a new RNG with the given master seed.
    #[must_use]
    pub fn new(master_seed: u64) -> Self {
        Self {
            master_seed,
            rng: Pcg64::seed_from_u64(master_seed),
        }
    }

    /// Get the master seed.
    #[must_use]
    pub const fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Generate a random f64 in [0, 1).
    pub fn gen_f64(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Generate a random f64 in the given range.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn gen_range_f64(&mut self, min: f64, max: f64) -> f64 {
        assert!(min <= max, "Invalid range: min > max");
        min + (max - min) * self.gen_f64()
    }

    /// Generate a random u64.
    pub fn gen_u64(&mut self) -> u64 {
        self.rng.gen()
    }

    /// Shuffle a slice in place (Fisher-Yates).
    ///
    /// Used between training passes so batch order does not bias the
    /// gradient updates.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.rng);
    }
}
