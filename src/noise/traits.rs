use num_bigint::{BigUint, RandBigInt};
use rand::Rng;

/// Source of uniform randomness for the noising engine.
///
/// Every selection consumes randomness through this seam instead of a
/// module-level generator, so a seeded implementation reproduces the same
/// decisions end to end.
pub trait RandomSource {
    /// Uniform draw from `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform draw from `[0, bound)`. `bound` must be non-zero.
    fn next_below(&mut self, bound: &BigUint) -> BigUint;
}

/// Any `rand` generator is a valid randomness source. Draws below an
/// arbitrary-width bound go through `gen_biguint_below`, which rejection
/// samples over whole limbs instead of narrowing the bound to a machine
/// word.
impl<R: Rng> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.gen()
    }

    fn next_below(&mut self, bound: &BigUint) -> BigUint {
        self.gen_biguint_below(bound)
    }
}
