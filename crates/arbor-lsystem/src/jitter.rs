//! Injected randomness for angle variance and leaf twist.
//!
//! The interpreter never reaches for a global RNG. Callers hand it a
//! [`RandomSource`]; production code wraps a seeded `ChaCha8Rng`, tests can
//! substitute [`Constant`] to pin the geometry exactly.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A stream of uniform samples in `[0, 1)`.
pub trait RandomSource {
    /// Next sample in `[0, 1)`.
    fn next_unit(&mut self) -> f32;
}

/// Adapts any `rand` generator.
#[derive(Clone, Debug)]
pub struct RngSource<R>(pub R);

impl RngSource<ChaCha8Rng> {
    /// Deterministic source for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f32 {
        self.0.random::<f32>()
    }
}

/// Returns the same sample forever. `Constant(0.5)` means "no jitter".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constant(pub f32);

impl RandomSource for Constant {
    fn next_unit(&mut self) -> f32 {
        self.0
    }
}

/// `angle` perturbed uniformly within `±variance`.
#[inline]
pub fn jittered<R: RandomSource + ?Sized>(angle: f32, variance: f32, rng: &mut R) -> f32 {
    angle + (rng.next_unit() - 0.5) * 2.0 * variance
}
