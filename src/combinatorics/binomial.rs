use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::NoiseError;

/// Exact binomial coefficient C(n, k). Returns 0 when `k > n`.
///
/// Built up one factor at a time; each intermediate value is itself a
/// binomial coefficient, so every division is exact.
pub fn binomial(n: u64, k: u64) -> BigUint {
    if k > n {
        return BigUint::zero();
    }
    let k = k.min(n - k);
    let mut coefficient = BigUint::one();
    for i in 0..k {
        // C(n, i + 1) = C(n, i) * (n - i) / (i + 1)
        coefficient = coefficient * (n - i) / (i + 1);
    }
    coefficient
}

/// Decodes `rank` into the unique strictly decreasing k-tuple
/// `a_k > a_{k-1} > ... > a_1 >= 0` with `rank = sum C(a_i, i)`, the
/// combinatorial number system of degree k.
///
/// Every non-negative rank has exactly one representation, so this function
/// is total. Callers that want a combination over values `[0, n)` must keep
/// `rank < C(n, k)` themselves.
pub fn combination_at_rank(rank: &BigUint, k: u64) -> Vec<BigUint> {
    if k == 0 {
        return vec![];
    }
    let mut target = rank.clone();

    // Find the largest `candidate` with C(candidate, k) <= rank, walking
    // upward from C(k - 1, k) = 0 and maintaining the coefficient
    // incrementally.
    let mut candidate = k - 1;
    let mut coefficient = BigUint::zero();
    let mut next_coefficient = BigUint::one();
    while next_coefficient <= target {
        candidate += 1;
        coefficient = next_coefficient.clone();
        // C(n + 1, k) = C(n, k) * (n + 1) / (n + 1 - k)
        next_coefficient = next_coefficient * (candidate + 1) / (candidate + 1 - k);
    }

    // Subsequent digits are strictly decreasing; find each by decrementing
    // `candidate`, reusing the running coefficient.
    let mut digits = Vec::with_capacity(k as usize);
    let mut current_k = k;
    loop {
        if coefficient <= target {
            digits.push(BigUint::from(candidate));
            target -= &coefficient;
            if digits.len() == k as usize {
                return digits;
            }
            // C(n - 1, k - 1) = C(n, k) * k / n
            coefficient = coefficient * current_k / candidate;
            current_k -= 1;
        } else {
            // C(n - 1, k) = C(n, k) * (n - k) / n
            coefficient = coefficient * (candidate - current_k) / candidate;
        }
        candidate -= 1;
    }
}

/// Number of distinct linear arrangements of `num_stars` indistinguishable
/// stars and `num_bars` indistinguishable bars: C(stars + bars, stars).
pub fn num_stars_and_bars_sequences(
    num_stars: u64,
    num_bars: u64,
) -> Result<BigUint, NoiseError> {
    let total = num_stars
        .checked_add(num_bars)
        .ok_or(NoiseError::Overflow("stars + bars"))?;
    Ok(binomial(total, num_stars))
}

/// Positions of the `num_stars` stars within the sequence identified by
/// `rank`, in decreasing order.
pub fn star_indices(num_stars: u64, rank: &BigUint) -> Vec<BigUint> {
    combination_at_rank(rank, num_stars)
}

/// For each star of a decreasing position sequence, the number of bars
/// preceding it: position index minus the count of stars before it.
///
/// Returns a new vector in the same order as the input.
pub fn bars_preceding_each_star(star_indices: &[BigUint]) -> Vec<BigUint> {
    let num_stars = star_indices.len();
    star_indices
        .iter()
        .enumerate()
        .map(|(i, star_index)| {
            let stars_before = (num_stars - 1 - i) as u64;
            star_index.clone() - stars_before
        })
        .collect()
}

/// Closed-form state count for the uniform-window model: distribute up to
/// `num_bucket_increments` increments over `num_trigger_data * num_windows`
/// slots. The slot product is checked rather than allowed to wrap.
pub fn num_states_arithmetic(
    num_bucket_increments: u64,
    num_trigger_data: u64,
    num_windows: u64,
) -> Result<BigUint, NoiseError> {
    let num_bars = num_trigger_data
        .checked_mul(num_windows)
        .ok_or(NoiseError::Overflow("trigger data * windows"))?;
    num_stars_and_bars_sequences(num_bucket_increments, num_bars)
}
