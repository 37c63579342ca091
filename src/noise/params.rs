use num_bigint::BigUint;
use serde::Serialize;

use crate::{
    combinatorics::{
        binomial::num_stars_and_bars_sequences, flex::num_states_flex,
    },
    error::NoiseError,
};

/// Shape of the fixed-window report model for one noising decision.
///
/// Constructed from a source's configuration when the source is
/// registered, read once, and discarded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NoiseParams {
    /// Maximum number of fake reports (the "stars").
    pub report_count: u32,

    /// Number of distinct trigger-data values.
    pub trigger_data_cardinality: u64,

    /// Number of reporting windows.
    pub window_count: u32,

    /// 2 when both an app and a web destination are viable, 1 otherwise.
    /// Doubling the bar count interleaves the destination choice into the
    /// same combinatorial space.
    pub destination_multiplier: u32,
}

impl NoiseParams {
    pub fn new(
        report_count: u32,
        trigger_data_cardinality: u64,
        window_count: u32,
        destination_multiplier: u32,
    ) -> Self {
        Self {
            report_count,
            trigger_data_cardinality,
            window_count,
            destination_multiplier,
        }
    }

    /// Bars of the stars-and-bars encoding, one per
    /// (trigger data, window, destination) combination. Also where the
    /// shape preconditions are enforced, since every operation on the
    /// shape starts here.
    pub fn bar_count(&self) -> Result<u64, NoiseError> {
        if self.trigger_data_cardinality == 0 {
            return Err(NoiseError::ZeroShapeParameter(
                "trigger data cardinality",
            ));
        }
        if self.window_count == 0 {
            return Err(NoiseError::ZeroShapeParameter("window count"));
        }
        if !(1..=2).contains(&self.destination_multiplier) {
            return Err(NoiseError::InvalidDestinationMultiplier(
                self.destination_multiplier,
            ));
        }
        self.trigger_data_cardinality
            .checked_mul(u64::from(self.window_count))
            .and_then(|bars| {
                bars.checked_mul(u64::from(self.destination_multiplier))
            })
            .ok_or(NoiseError::Overflow(
                "cardinality * windows * destinations",
            ))
    }

    /// Size of the enumerated state space for this shape.
    pub fn num_states(&self) -> Result<BigUint, NoiseError> {
        num_stars_and_bars_sequences(
            u64::from(self.report_count),
            self.bar_count()?,
        )
    }
}

/// Shape of the flexible report model: one window count and one report cap
/// per trigger-data type, plus an overall cap.
///
/// Empty sequences are a valid degenerate shape with a single state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FlexNoiseParams {
    pub total_cap: u32,
    pub per_type_window_counts: Vec<u32>,
    pub per_type_caps: Vec<u32>,
}

impl FlexNoiseParams {
    pub fn new(
        total_cap: u32,
        per_type_window_counts: Vec<u32>,
        per_type_caps: Vec<u32>,
    ) -> Self {
        Self {
            total_cap,
            per_type_window_counts,
            per_type_caps,
        }
    }

    /// Size of the enumerated state space for this shape, destinations not
    /// included.
    pub fn num_states(&self) -> Result<BigUint, NoiseError> {
        num_states_flex(
            self.total_cap,
            &self.per_type_window_counts,
            &self.per_type_caps,
        )
    }
}

/// A decoded fake report in the fixed-window model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ReportConfig {
    pub trigger_data: u64,
    pub window_index: u32,
    pub destination_index: u32,
}

/// A decoded fake report in the flexible model. Carries the trigger-data
/// *index*; mapping indices to registered trigger-data values is the
/// caller's job, as is converting window indices to reporting times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FlexReportConfig {
    pub type_index: usize,
    pub window_index: u32,
    pub destination_index: u32,
}
