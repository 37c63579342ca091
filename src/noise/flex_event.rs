use num_bigint::BigUint;

use crate::{
    combinatorics::flex::{num_states_flex, report_set_for_rank},
    error::NoiseError,
    noise::{
        params::{FlexNoiseParams, FlexReportConfig},
        traits::RandomSource,
    },
};

/// Window counts scaled by the destination multiplier: each real window
/// splits into one slot per viable destination, so a single rank encodes
/// the destination choice too.
fn scaled_window_counts(
    params: &FlexNoiseParams,
    destination_multiplier: u32,
) -> Result<Vec<u32>, NoiseError> {
    if !(1..=2).contains(&destination_multiplier) {
        return Err(NoiseError::InvalidDestinationMultiplier(
            destination_multiplier,
        ));
    }
    params
        .per_type_window_counts
        .iter()
        .map(|count| {
            count.checked_mul(destination_multiplier).ok_or(
                NoiseError::Overflow("windows * destinations"),
            )
        })
        .collect()
}

/// State count of the flexible model with destinations interleaved.
pub fn num_states_with_destinations(
    params: &FlexNoiseParams,
    destination_multiplier: u32,
) -> Result<BigUint, NoiseError> {
    let scaled = scaled_window_counts(params, destination_multiplier)?;
    num_states_flex(params.total_cap, &scaled, &params.per_type_caps)
}

/// Decodes `rank` into flexible-model report configs, splitting every
/// decoded window slot back into its (window, destination) pair.
pub fn flex_reports_for_rank(
    params: &FlexNoiseParams,
    destination_multiplier: u32,
    rank: &BigUint,
) -> Result<Vec<FlexReportConfig>, NoiseError> {
    let scaled = scaled_window_counts(params, destination_multiplier)?;
    let atoms = report_set_for_rank(
        params.total_cap,
        &scaled,
        &params.per_type_caps,
        rank,
    )?;
    Ok(atoms
        .into_iter()
        .map(|atom| FlexReportConfig {
            type_index: atom.type_index,
            window_index: atom.window_index / destination_multiplier,
            destination_index: atom.window_index % destination_multiplier,
        })
        .collect())
}

/// Draws a uniform rank of the destination-scaled space and decodes it.
pub fn select_random_flex_reports<R: RandomSource>(
    params: &FlexNoiseParams,
    destination_multiplier: u32,
    rng: &mut R,
) -> Result<Vec<FlexReportConfig>, NoiseError> {
    let num_states =
        num_states_with_destinations(params, destination_multiplier)?;
    let rank = rng.next_below(&num_states);
    flex_reports_for_rank(params, destination_multiplier, &rank)
}
