//! Deterministic RNG wrapper and sampling helpers.
//!
//! # Determinism strategy
//!
//! Every random decision in a run flows through a `SimRng` seeded from the
//! scenario.  Independent concerns (traffic draws, failure schedule) use
//! [`SimRng::child`] streams derived with golden-ratio mixing, so adding
//! draws to one stream never perturbs the other — the same scenario seeds
//! always reproduce the same arrival sequence and the same failure timeline.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Deterministic simulation RNG.
///
/// Used only in the single scheduler thread; the type is deliberately not
/// `Sync` so it cannot be shared by accident.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset — used to give
    /// the traffic stream and the failure schedule independent streams from
    /// one scenario seed.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
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

    /// Exponential variate with the given rate, by inverse CDF.
    ///
    /// Drives Poisson inter-arrival gaps (rate λ) and holding times
    /// (rate 1/μ).  `rate` must be positive.
    #[inline]
    pub fn exp(&mut self, rate: f64) -> f64 {
        debug_assert!(rate > 0.0);
        let u: f64 = self.0.r#gen(); // in [0, 1)
        -(1.0 - u).ln() / rate
    }

    /// Draw an index in `0..weights.len()` with probability proportional to
    /// its weight.  Weights must be non-negative with a positive sum.
    pub fn pick_weighted(&mut self, weights: &[f64]) -> usize {
        debug_assert!(!weights.is_empty());
        let total: f64 = weights.iter().sum();
        debug_assert!(total > 0.0);
        let mut target = self.0.gen_range(0.0..total);
        for (i, &w) in weights.iter().enumerate() {
            if target < w {
                return i;
            }
            target -= w;
        }
        // Floating-point underrun on the last subtraction.
        weights.len() - 1
    }
}
