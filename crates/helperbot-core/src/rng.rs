//! Random number generator abstraction for determinism.
//!
//! In production, this wraps a real RNG. In tests, a seeded or recorded
//! implementation is injected.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;

    /// Generate a random `f64` in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;
}

/// Picks a uniformly random index into a collection of `len` elements.
///
/// Returns `None` for an empty collection.
pub fn pick_index(rng: &mut dyn DeterministicRng, len: usize) -> Option<usize> {
    let last = u32::try_from(len.checked_sub(1)?).unwrap_or(u32::MAX);
    let picked = rng.next_u32_range(0, last) as usize;
    Some(picked.min(len - 1))
}

/// Production RNG seeded from the operating system.
#[derive(Debug)]
pub struct SystemRng(StdRng);

impl SystemRng {
    /// Creates an RNG seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl Default for SystemRng {
    fn default() -> Self {
        Self::new()
    }
}

impl DeterministicRng for SystemRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        self.0.random_range(min..=max)
    }

    fn next_f64(&mut self) -> f64 {
        self.0.random()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRng(u32);

    impl DeterministicRng for FixedRng {
        fn next_u32_range(&mut self, _min: u32, _max: u32) -> u32 {
            self.0
        }

        fn next_f64(&mut self) -> f64 {
            0.0
        }
    }

    #[test]
    fn test_pick_index_returns_none_for_empty_collection() {
        assert_eq!(pick_index(&mut FixedRng(0), 0), None);
    }

    #[test]
    fn test_pick_index_clamps_out_of_range_values() {
        assert_eq!(pick_index(&mut FixedRng(99), 3), Some(2));
    }

    #[test]
    fn test_system_rng_stays_within_bounds() {
        let mut rng = SystemRng::new();
        for _ in 0..200 {
            let value = rng.next_u32_range(3, 5);
            assert!((3..=5).contains(&value));
            let float = rng.next_f64();
            assert!((0.0..1.0).contains(&float));
        }
    }
}
