use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::{
    combinatorics::binomial::{bars_preceding_each_star, star_indices},
    error::NoiseError,
    noise::{
        params::{NoiseParams, ReportConfig},
        traits::RandomSource,
    },
};

/// Decodes one sequence index of the fixed-window state space into the
/// fake reports it stands for.
///
/// Every star of the stars-and-bars arrangement with a non-zero number of
/// bars before it is one report; the bar count picks the
/// (trigger data, window, destination) slot. Stars with no preceding bars
/// are "no report" placeholders. Sequence index 0 therefore decodes to the
/// empty set.
pub fn report_configs_for_sequence_index(
    params: &NoiseParams,
    sequence_index: &BigUint,
) -> Result<Vec<ReportConfig>, NoiseError> {
    // Validates the shape before any decoding.
    params.bar_count()?;

    let stars =
        star_indices(u64::from(params.report_count), sequence_index);
    let mut configs = vec![];
    for bar_count in bars_preceding_each_star(&stars) {
        if bar_count.is_zero() {
            continue;
        }
        let bar_count = bar_count
            .to_u64()
            .ok_or(NoiseError::Overflow("bar count"))?;
        let slot = (bar_count - 1) / params.trigger_data_cardinality;
        let trigger_data =
            (bar_count - 1) % params.trigger_data_cardinality;
        configs.push(ReportConfig {
            trigger_data,
            window_index: (slot % u64::from(params.window_count)) as u32,
            destination_index: (slot / u64::from(params.window_count))
                as u32,
        });
    }
    Ok(configs)
}

/// Draws a uniform state of the shape's space and materializes its report
/// configs. An empty result is the valid "never report" state.
pub fn select_random_report_configs<R: RandomSource>(
    params: &NoiseParams,
    rng: &mut R,
) -> Result<Vec<ReportConfig>, NoiseError> {
    let num_states = params.num_states()?;
    let sequence_index = rng.next_below(&num_states);
    report_configs_for_sequence_index(params, &sequence_index)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn decode(params: &NoiseParams, sequence_index: u64) -> Vec<[u64; 3]> {
        report_configs_for_sequence_index(
            params,
            &BigUint::from(sequence_index),
        )
        .unwrap()
        .into_iter()
        .map(|config| {
            [
                config.trigger_data,
                u64::from(config.window_index),
                u64::from(config.destination_index),
            ]
        })
        .collect()
    }

    #[test]
    fn test_decode_event_shape() {
        // 3 states: no report, or one report with either trigger datum.
        let params = NoiseParams::new(1, 2, 1, 1);
        assert!(decode(&params, 0).is_empty());
        assert_eq!(decode(&params, 1), vec![[0, 0, 0]]);
        assert_eq!(decode(&params, 2), vec![[1, 0, 0]]);
    }

    #[test]
    fn test_decode_event_shape_dual_destination() {
        // 5 states: the destination choice doubles the bar count.
        let params = NoiseParams::new(1, 2, 1, 2);
        assert!(decode(&params, 0).is_empty());
        assert_eq!(decode(&params, 1), vec![[0, 0, 0]]);
        assert_eq!(decode(&params, 2), vec![[1, 0, 0]]);
        assert_eq!(decode(&params, 3), vec![[0, 0, 1]]);
        assert_eq!(decode(&params, 4), vec![[1, 0, 1]]);
    }

    #[test]
    fn test_decode_event_shape_with_install_attribution() {
        // C(6, 2) = 15 states.
        let params = NoiseParams::new(2, 2, 2, 1);
        assert!(decode(&params, 0).is_empty());
        assert_eq!(decode(&params, 1), vec![[0, 0, 0]]);
        assert_eq!(
            decode(&params, 2),
            vec![[0, 0, 0], [0, 0, 0]]
        );
        assert_eq!(decode(&params, 10), vec![[1, 1, 0]]);
    }

    #[test]
    fn test_decode_navigation_shape() {
        // C(27, 3) = 2925 states.
        let params = NoiseParams::new(3, 8, 3, 1);
        assert!(decode(&params, 0).is_empty());
        assert_eq!(decode(&params, 20), vec![[3, 0, 0]]);
        assert_eq!(decode(&params, 41), vec![[4, 0, 0], [2, 0, 0]]);
        assert_eq!(decode(&params, 50), vec![[4, 0, 0], [4, 0, 0]]);
        assert_eq!(
            decode(&params, 1268),
            vec![[1, 2, 0], [6, 1, 0], [7, 0, 0]]
        );
    }

    #[test]
    fn test_decode_navigation_shape_dual_destination() {
        // C(51, 3) = 20825 states; low indices decode exactly as in the
        // single-destination shape.
        let params = NoiseParams::new(3, 8, 3, 2);
        assert!(decode(&params, 0).is_empty());
        assert_eq!(decode(&params, 20), vec![[3, 0, 0]]);
        assert_eq!(decode(&params, 41), vec![[4, 0, 0], [2, 0, 0]]);
        assert_eq!(
            decode(&params, 1268),
            vec![[1, 2, 0], [6, 1, 0], [7, 0, 0]]
        );
        assert_eq!(
            decode(&params, 9000),
            vec![[3, 1, 1], [0, 1, 1], [2, 0, 0]]
        );
        assert_eq!(
            decode(&params, 10000),
            vec![[5, 1, 1], [6, 1, 0]]
        );
    }

    #[test]
    fn test_decoded_fields_stay_in_range() {
        let params = NoiseParams::new(2, 2, 2, 2);
        let num_states = params.num_states().unwrap().to_u64().unwrap();
        for sequence_index in 0..num_states {
            let configs = decode(&params, sequence_index);
            assert!(configs.len() as u32 <= params.report_count);
            for [trigger_data, window_index, destination_index] in configs {
                assert!(trigger_data < params.trigger_data_cardinality);
                assert!(window_index < u64::from(params.window_count));
                assert!(
                    destination_index
                        < u64::from(params.destination_multiplier)
                );
            }
        }
    }

    #[test]
    fn test_selection_is_deterministic_under_a_seed() {
        let params = NoiseParams::new(3, 2, 1, 1);
        let mut first = StdRng::seed_from_u64(42);
        let mut second = StdRng::seed_from_u64(42);
        let reports_a =
            select_random_report_configs(&params, &mut first).unwrap();
        let reports_b =
            select_random_report_configs(&params, &mut second).unwrap();
        assert_eq!(reports_a, reports_b);
        assert!(reports_a.len() <= 3);
    }

    #[test]
    fn test_zero_report_count_always_selects_nothing() {
        let params = NoiseParams::new(0, 8, 3, 1);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(select_random_report_configs(&params, &mut rng)
            .unwrap()
            .is_empty());
    }
}
