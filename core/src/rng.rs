//! Deterministic random number generation.
//!
//! RULE: Nothing in training may call a platform RNG.
//! All randomness flows through StreamRng instances derived
//! from the single master seed passed to the trainer.
//!
//! Each stream is seeded from (master_seed XOR slot * golden ratio), so:
//!   - Adding a new stream never changes existing streams.
//!   - Slot 0 is seeded with the master seed itself.

use rand::{Rng, SeedableRng};
use rand_distr::{Bernoulli, Distribution, Exp};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for one stage of the training run.
pub struct StreamRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl StreamRng {
    /// Create a stream RNG from the master seed and a stable slot index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.gen_range(0..n)
    }

    /// Bernoulli trial: returns true with probability p.
    /// p is clamped to [0, 1].
    pub fn chance(&mut self, p: f64) -> bool {
        match Bernoulli::new(p.clamp(0.0, 1.0)) {
            Ok(dist) => dist.sample(&mut self.inner),
            // Only reachable for NaN.
            Err(_) => false,
        }
    }

    /// Sample from an exponential distribution with the given mean (scale).
    pub fn exponential(&mut self, scale: f64) -> f64 {
        assert!(scale > 0.0, "scale must be > 0");
        match Exp::new(1.0 / scale) {
            Ok(dist) => dist.sample(&mut self.inner),
            Err(_) => 0.0,
        }
    }

    /// Fisher-Yates permutation of 0..n.
    pub fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let j = self.next_u64_below(i as u64 + 1) as usize;
            idx.swap(i, j);
        }
        idx
    }
}

/// All stream RNGs for a single training run, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_stream(&self, slot: StreamSlot) -> StreamRng {
        StreamRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries, only append.
/// Reordering changes every stream's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Synthetic = 0,
    Split     = 1,
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Synthetic => "synthetic",
            Self::Split     => "split",
        }
    }
}
