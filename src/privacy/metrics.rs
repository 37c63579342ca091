use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

/// Probabilities within this distance of an endpoint contribute no entropy,
/// keeping `log2` off zero.
const ENTROPY_TOLERANCE: f64 = 1e-9;

/// Probability that randomized response replaces the true report set with a
/// uniformly random state: `n / (n + e^epsilon - 1)`.
///
/// The exact count is collapsed to a double before the division; the
/// upstream protocol assumes IEEE-754 semantics here, so the precision loss
/// for very large spaces is intentional. A count too large for a double
/// saturates to a flip probability of 1. `num_states` must be at least 1.
pub fn flip_probability(num_states: &BigUint, epsilon: f64) -> f64 {
    assert!(!num_states.is_zero(), "state count must be at least 1");
    let states = num_states.to_f64().unwrap_or(f64::INFINITY);
    if states.is_infinite() {
        return 1.0;
    }
    states / (states + epsilon.exp() - 1.0)
}

/// Worst-case bits of information about the true state that leak through
/// the noised channel.
///
/// A degenerate single-state space carries nothing, so the gain is 0. For
/// larger spaces this is the channel-capacity expression
/// `log2(n) - H(fake) - fake * log2(n - 1)` with
/// `fake = flip * (n - 1) / n`.
pub fn information_gain(num_states: &BigUint, flip_probability: f64) -> f64 {
    if *num_states <= BigUint::one() {
        return 0.0;
    }
    let states = num_states.to_f64().unwrap_or(f64::INFINITY);
    let fake_probability = flip_probability * (states - 1.0) / states;
    states.log2()
        - binary_entropy(fake_probability)
        - fake_probability * (states - 1.0).log2()
}

/// Binary entropy `H(x) = -x log2 x - (1 - x) log2 (1 - x)`, clamped to 0
/// at the endpoints.
pub fn binary_entropy(x: f64) -> f64 {
    if (x - 0.0).abs() < ENTROPY_TOLERANCE
        || (x - 1.0).abs() < ENTROPY_TOLERANCE
    {
        return 0.0;
    }
    -x * x.log2() - (1.0 - x) * (1.0 - x).log2()
}
