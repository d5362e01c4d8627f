//! Deterministic tile drawing.
//!
//! Draws are decided by the session and stored inside the resulting action,
//! so replaying a turn never rolls the dice again: only new racks consume
//! randomness.

use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded ChaCha8 generator used to draw racks.
#[derive(Clone, Debug)]
pub struct TileRng {
    inner: ChaCha8Rng,
}

impl TileRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Pick `count` distinct positions of `pool` and return their tiles,
    /// in pool order.
    ///
    /// Returns fewer tiles when the pool is smaller than `count`.
    pub fn draw(&mut self, pool: &[char], count: usize) -> Vec<char> {
        let amount = count.min(pool.len());
        let mut picked = index::sample(&mut self.inner, pool.len(), amount).into_vec();
        picked.sort_unstable();
        picked.into_iter().map(|i| pool[i]).collect()
    }
}
