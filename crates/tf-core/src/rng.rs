//! Deterministic per-element RNG.
//!
//! # Determinism strategy
//!
//! Each traffic element gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (element_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive element IDs uniformly across the seed space.
//! Seeding from the stable `ElementId` (not the per-session `SysId`) means
//! an element draws the same random sequence no matter where the scheduler
//! places it in the update order, so reordering never perturbs behavior.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::ElementId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-element deterministic RNG.
///
/// Create one per element at scenario init.  The type is `!Sync` to prevent
/// accidental sharing — each element owns exactly one.
#[derive(Debug)]
pub struct ElementRng(SmallRng);

impl ElementRng {
    /// Seed deterministically from the run's global seed and an element ID.
    pub fn new(global_seed: u64, element: ElementId) -> Self {
        let seed = global_seed ^ element.0.wrapping_mul(MIXING_CONSTANT);
        ElementRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
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
}
