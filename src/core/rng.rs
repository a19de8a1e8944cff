//! Deterministic random number generation for deque shuffles.
//!
//! Rulesets that randomize layout (the memory deque shuffles its storables
//! on every store) draw from a `DequeRng` owned by their state, so a board
//! seeded the same way always deals the same way.
//!
//! ```
//! use capturellection::core::DequeRng;
//!
//! let mut a = DequeRng::new(42);
//! let mut b = DequeRng::new(42);
//!
//! let mut left = vec![1, 2, 3, 4, 5, 6];
//! let mut right = left.clone();
//! a.shuffle(&mut left);
//! b.shuffle(&mut right);
//! assert_eq!(left, right);
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded ChaCha8 stream.
#[derive(Clone, Debug)]
pub struct DequeRng {
    inner: ChaCha8Rng,
}

impl DequeRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}
