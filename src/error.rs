use num_bigint::BigUint;
use thiserror::Error;

/// Errors surfaced by the noising engine.
///
/// Shape preconditions are checked at the call boundary and reported here
/// rather than silently coerced, since a wrong state count becomes a wrong
/// noise probability downstream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NoiseError {
    /// A shape parameter that must be positive was zero.
    #[error("shape parameter `{0}` must be positive")]
    ZeroShapeParameter(&'static str),

    /// The per-type window and cap sequences have different lengths.
    #[error("per-type window count ({windows}) and cap ({caps}) sequences differ in length")]
    ShapeMismatch { windows: usize, caps: usize },

    /// A destination multiplier outside {1, 2}.
    #[error("destination multiplier must be 1 or 2, got {0}")]
    InvalidDestinationMultiplier(u32),

    /// Checked arithmetic on shape parameters overflowed.
    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),

    /// A rank at or beyond the size of the enumerated state space.
    #[error("rank {rank} is outside the state space of size {num_states}")]
    RankOutOfRange { rank: BigUint, num_states: BigUint },

    /// A report set that no rank encodes (cap or window violation).
    #[error("report set does not fit the given windows and caps")]
    InvalidReportSet,
}
