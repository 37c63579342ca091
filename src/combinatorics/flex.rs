use std::collections::HashMap;

use log::debug;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::Serialize;

use crate::{
    combinatorics::binomial::num_states_arithmetic, error::NoiseError,
};

/// One decoded fake-report unit: a single bucket increment attributed to a
/// trigger-data type and one of that type's reporting windows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
pub struct ReportAtom {
    pub type_index: usize,
    pub window_index: u32,
}

/// Total state count for the capped/windowed report model.
///
/// When every type has the same window count and no per-type cap binds
/// (all caps >= `total_cap`), the space is a plain stars-and-bars
/// arrangement and the closed form applies. Otherwise the memoized
/// recursive counter handles heterogeneous windows and binding caps. The
/// two paths agree wherever both apply.
pub fn num_states_flex(
    total_cap: u32,
    per_type_window_counts: &[u32],
    per_type_caps: &[u32],
) -> Result<BigUint, NoiseError> {
    validate_shape(per_type_window_counts, per_type_caps)?;
    if per_type_window_counts.is_empty() {
        return Ok(BigUint::one());
    }

    let uniform_windows = per_type_window_counts
        .iter()
        .all(|count| *count == per_type_window_counts[0]);
    let caps_non_binding =
        per_type_caps.iter().all(|cap| *cap >= total_cap);
    if uniform_windows && caps_non_binding {
        debug!(
            "uniform windows ({}) and non-binding caps, using the closed-form count",
            per_type_window_counts[0]
        );
        return num_states_arithmetic(
            u64::from(total_cap),
            per_type_window_counts.len() as u64,
            u64::from(per_type_window_counts[0]),
        );
    }
    num_states_recursive(total_cap, per_type_window_counts, per_type_caps)
}

/// The general recursive counter, memoized over
/// `(remaining_cap, type_index, window_val, cap_val)`.
pub fn num_states_recursive(
    total_cap: u32,
    per_type_window_counts: &[u32],
    per_type_caps: &[u32],
) -> Result<BigUint, NoiseError> {
    validate_shape(per_type_window_counts, per_type_caps)?;
    if per_type_window_counts.is_empty() {
        return Ok(BigUint::one());
    }
    let mut space = StateSpace::new(per_type_window_counts, per_type_caps);
    let last = per_type_window_counts.len() - 1;
    Ok(space.count(
        total_cap,
        last,
        per_type_window_counts[last],
        per_type_caps[last],
    ))
}

/// Decodes `rank` into the report set it enumerates: the multiset of
/// (type, window) increments whose position in the canonical ordering of
/// the state space equals `rank`.
///
/// Rank 0 is always the empty set. Ranks at or beyond the state count are
/// rejected with [`NoiseError::RankOutOfRange`].
pub fn report_set_for_rank(
    total_cap: u32,
    per_type_window_counts: &[u32],
    per_type_caps: &[u32],
    rank: &BigUint,
) -> Result<Vec<ReportAtom>, NoiseError> {
    validate_shape(per_type_window_counts, per_type_caps)?;
    if per_type_window_counts.is_empty() {
        if rank.is_zero() {
            return Ok(vec![]);
        }
        return Err(NoiseError::RankOutOfRange {
            rank: rank.clone(),
            num_states: BigUint::one(),
        });
    }

    let mut space = StateSpace::new(per_type_window_counts, per_type_caps);
    let last = per_type_window_counts.len() - 1;

    // Counting first also seeds the memo table the decode walks.
    let num_states = space.count(
        total_cap,
        last,
        per_type_window_counts[last],
        per_type_caps[last],
    );
    if *rank >= num_states {
        return Err(NoiseError::RankOutOfRange {
            rank: rank.clone(),
            num_states,
        });
    }

    let mut atoms = vec![];
    space.decode(
        total_cap,
        last,
        per_type_window_counts[last],
        per_type_caps[last],
        rank.clone(),
        &mut atoms,
    )?;
    Ok(atoms)
}

/// Inverse of [`report_set_for_rank`]: the rank that decodes to the given
/// report set. Rejects multisets that violate the caps or name unknown
/// windows.
pub fn rank_for_report_set(
    total_cap: u32,
    per_type_window_counts: &[u32],
    per_type_caps: &[u32],
    atoms: &[ReportAtom],
) -> Result<BigUint, NoiseError> {
    validate_shape(per_type_window_counts, per_type_caps)?;
    if per_type_window_counts.is_empty() {
        if atoms.is_empty() {
            return Ok(BigUint::zero());
        }
        return Err(NoiseError::InvalidReportSet);
    }

    let mut tally: HashMap<(usize, u32), u32> = HashMap::new();
    for atom in atoms {
        if atom.type_index >= per_type_window_counts.len()
            || atom.window_index >= per_type_window_counts[atom.type_index]
        {
            return Err(NoiseError::InvalidReportSet);
        }
        *tally.entry((atom.type_index, atom.window_index)).or_default() += 1;
    }

    let mut space = StateSpace::new(per_type_window_counts, per_type_caps);
    let last = per_type_window_counts.len() - 1;
    space.encode(
        total_cap,
        last,
        per_type_window_counts[last],
        per_type_caps[last],
        &tally,
    )
}

fn validate_shape(
    per_type_window_counts: &[u32],
    per_type_caps: &[u32],
) -> Result<(), NoiseError> {
    if per_type_window_counts.len() != per_type_caps.len() {
        return Err(NoiseError::ShapeMismatch {
            windows: per_type_window_counts.len(),
            caps: per_type_caps.len(),
        });
    }
    if per_type_window_counts.iter().any(|count| *count == 0) {
        return Err(NoiseError::ZeroShapeParameter(
            "per-type window count",
        ));
    }
    Ok(())
}

type StateKey = (u32, usize, u32, u32);

/// Counting and decoding context for one capped/windowed state space.
///
/// The memo table lives for exactly one top-level call; calls with
/// different shapes never observe each other's entries.
struct StateSpace<'a> {
    windows: &'a [u32],
    caps: &'a [u32],
    memo: HashMap<StateKey, BigUint>,
}

impl<'a> StateSpace<'a> {
    fn new(windows: &'a [u32], caps: &'a [u32]) -> Self {
        Self {
            windows,
            caps,
            memo: HashMap::new(),
        }
    }

    /// Number of states reachable from the given position: `window_val`
    /// windows left for the current type (with `cap_val` of its cap left),
    /// `type_index` earlier types untouched, `remaining_cap` increments
    /// still assignable overall.
    fn count(
        &mut self,
        remaining_cap: u32,
        type_index: usize,
        window_val: u32,
        cap_val: u32,
    ) -> BigUint {
        if window_val == 0 && type_index == 0 {
            return BigUint::one();
        }
        if window_val == 0 {
            let previous = type_index - 1;
            return self.count(
                remaining_cap,
                previous,
                self.windows[previous],
                self.caps[previous],
            );
        }

        let key = (remaining_cap, type_index, window_val, cap_val);
        if let Some(cached) = self.memo.get(&key) {
            return cached.clone();
        }

        // Spend 0..=min(remaining, cap) increments in this window, then
        // move to the previous window of the same type.
        let mut total = BigUint::zero();
        for allocation in 0..=remaining_cap.min(cap_val) {
            total += self.count(
                remaining_cap - allocation,
                type_index,
                window_val - 1,
                cap_val - allocation,
            );
        }
        self.memo.insert(key, total.clone());
        total
    }

    /// Rank decoding over the same recursion as `count`: commit to the
    /// first allocation whose subtree still contains `rank`, emit that many
    /// atoms for the current window, and descend with the residual rank.
    fn decode(
        &mut self,
        remaining_cap: u32,
        type_index: usize,
        window_val: u32,
        cap_val: u32,
        mut rank: BigUint,
        atoms: &mut Vec<ReportAtom>,
    ) -> Result<(), NoiseError> {
        if window_val == 0 && type_index == 0 {
            if rank.is_zero() {
                return Ok(());
            }
            return Err(NoiseError::RankOutOfRange {
                rank,
                num_states: BigUint::one(),
            });
        }
        if window_val == 0 {
            let previous = type_index - 1;
            return self.decode(
                remaining_cap,
                previous,
                self.windows[previous],
                self.caps[previous],
                rank,
                atoms,
            );
        }

        for allocation in 0..=remaining_cap.min(cap_val) {
            let subtree = self.count(
                remaining_cap - allocation,
                type_index,
                window_val - 1,
                cap_val - allocation,
            );
            if rank < subtree {
                for _ in 0..allocation {
                    atoms.push(ReportAtom {
                        type_index,
                        window_index: window_val - 1,
                    });
                }
                return self.decode(
                    remaining_cap - allocation,
                    type_index,
                    window_val - 1,
                    cap_val - allocation,
                    rank,
                    atoms,
                );
            }
            rank -= subtree;
        }

        // Unreachable when the caller checked rank < count beforehand.
        Err(NoiseError::RankOutOfRange {
            rank,
            num_states: self.count(
                remaining_cap,
                type_index,
                window_val,
                cap_val,
            ),
        })
    }

    /// Mirror of `decode`: sum the subtree sizes of every allocation that
    /// precedes the set's own allocation at each position.
    fn encode(
        &mut self,
        remaining_cap: u32,
        type_index: usize,
        window_val: u32,
        cap_val: u32,
        tally: &HashMap<(usize, u32), u32>,
    ) -> Result<BigUint, NoiseError> {
        if window_val == 0 && type_index == 0 {
            return Ok(BigUint::zero());
        }
        if window_val == 0 {
            let previous = type_index - 1;
            return self.encode(
                remaining_cap,
                previous,
                self.windows[previous],
                self.caps[previous],
                tally,
            );
        }

        let allocation = tally
            .get(&(type_index, window_val - 1))
            .copied()
            .unwrap_or(0);
        if allocation > remaining_cap.min(cap_val) {
            return Err(NoiseError::InvalidReportSet);
        }

        let mut rank = BigUint::zero();
        for smaller in 0..allocation {
            rank += self.count(
                remaining_cap - smaller,
                type_index,
                window_val - 1,
                cap_val - smaller,
            );
        }
        rank += self.encode(
            remaining_cap - allocation,
            type_index,
            window_val - 1,
            cap_val - allocation,
            tally,
        )?;
        Ok(rank)
    }
}
