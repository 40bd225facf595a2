//! Injected randomness.
//!
//! Every random decision in the engine (damage variation, critical hits,
//! effect rolls, escape attempts, level-up gains, the opponent's choices) goes
//! through the [`Dice`] trait. Any [`RngCore`] is a `Dice`, and the canonical
//! seedable source is [`DuelRng`] (`ChaCha8`), so a battle replays exactly from
//! its seed.
//!
//! # Example
//!
//! ```
//! use skirmish_core::dice::{self, Dice};
//!
//! let mut a = dice::seeded(42);
//! let mut b = dice::seeded(42);
//! assert_eq!(a.range_inclusive(-5, 4), b.range_inclusive(-5, 4));
//! ```

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seedable random source used by the engine and the batch simulator.
pub type DuelRng = ChaCha8Rng;

/// Creates a [`DuelRng`] from a seed.
#[must_use]
pub fn seeded(seed: u64) -> DuelRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Source of random rolls for combat mechanics.
///
/// Implementations must be deterministic for a given internal state. The
/// trait is object safe; engine APIs take `&mut dyn Dice`.
pub trait Dice {
    /// Returns `true` with the given probability.
    ///
    /// Probabilities at or above 1 always succeed and at or below 0 never do.
    fn chance(&mut self, probability: f64) -> bool;

    /// Returns an integer in `[low, high]`. Returns `low` when `low >= high`.
    fn range_inclusive(&mut self, low: i32, high: i32) -> i32;

    /// Returns an index in `[0, len)`. Returns 0 when `len <= 1`.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: RngCore> Dice for R {
    fn chance(&mut self, probability: f64) -> bool {
        self.gen::<f64>() < probability
    }

    fn range_inclusive(&mut self, low: i32, high: i32) -> i32 {
        if low >= high {
            return low;
        }
        self.gen_range(low..=high)
    }

    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.gen_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_rolls() {
        let mut a = seeded(9);
        let mut b = seeded(9);
        for _ in 0..64 {
            assert_eq!(a.range_inclusive(-5, 4), b.range_inclusive(-5, 4));
            assert_eq!(a.chance(0.5), b.chance(0.5));
        }
    }

    #[test]
    fn range_stays_inside_bounds() {
        let mut rng = seeded(1);
        for _ in 0..1000 {
            let v = rng.range_inclusive(-5, 4);
            assert!((-5..=4).contains(&v));
        }
    }

    #[test]
    fn degenerate_inputs() {
        let mut rng = seeded(1);
        assert_eq!(rng.range_inclusive(3, 3), 3);
        assert_eq!(rng.range_inclusive(5, 2), 5);
        assert_eq!(rng.pick(0), 0);
        assert_eq!(rng.pick(1), 0);
        assert!(rng.chance(1.0));
        assert!(rng.chance(1.085));
        assert!(!rng.chance(0.0));
    }

    #[test]
    fn usable_as_trait_object() {
        let mut rng = seeded(3);
        let dice: &mut dyn Dice = &mut rng;
        let idx = dice.pick(4);
        assert!(idx < 4);
    }
}
