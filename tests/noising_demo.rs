mod common;

use common::logging;
use noiselib::{
    noise::{
        handler::{AttributionMode, SourceNoiseHandler},
        params::NoiseParams,
    },
    privacy::{
        gain_limit::{GainLimitStatus, InformationGainLimit},
        params::PrivacyConfig,
    },
};
use rand::{rngs::StdRng, SeedableRng};

#[test]
fn main() -> Result<(), anyhow::Error> {
    logging::init_default_logging();

    let config = PrivacyConfig::default();
    let handler = SourceNoiseHandler::new(config.clone());

    // A navigation source: 3 reports over 8 trigger-data values and 3
    // windows. Its state space has 2925 configurations, so under the
    // default epsilon the substitution probability is tiny.
    let navigation = NoiseParams::mock();
    let probability = handler.attribution_probability(&navigation)?;
    assert!((probability - 0.0024263).abs() < 1e-7);

    // Registration would compare the channel's worst-case leakage against
    // the navigation ceiling; the standard shape fits.
    let ceiling = InformationGainLimit::new(config.navigation_gain_limit)?;
    let gain = handler.information_gain(&navigation)?;
    assert_eq!(ceiling.check(gain), GainLimitStatus::Continue);

    // An event source with both destinations viable doubles the bars.
    let dual_event = NoiseParams::new(1, 2, 1, 2);
    let dual_probability =
        handler.attribution_probability(&dual_event)?;
    assert!((dual_probability - 0.0000042).abs() < 1e-7);
    let event_ceiling =
        InformationGainLimit::new(config.event_gain_limit)?;
    assert_eq!(
        event_ceiling.check(handler.information_gain(&dual_event)?),
        GainLimitStatus::Continue
    );

    // Under the default epsilon, decisions are almost always truthful.
    // Whatever a draw yields, the mode and the fake-report list must
    // agree, and every decoded field must be in range.
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..500 {
        let decision =
            handler.assign_attribution_mode(&navigation, &mut rng)?;
        match decision.mode {
            AttributionMode::Truthfully | AttributionMode::Never => {
                assert!(decision.fake_reports.is_empty());
            }
            AttributionMode::Falsely => {
                assert!(!decision.fake_reports.is_empty());
            }
        }
        assert!(
            decision.fake_reports.len() as u32 <= navigation.report_count
        );
        for report in &decision.fake_reports {
            assert!(
                report.trigger_data < navigation.trigger_data_cardinality
            );
            assert!(report.window_index < navigation.window_count);
            assert!(
                report.destination_index
                    < navigation.destination_multiplier
            );
        }
    }

    // With a zero epsilon the mechanism always substitutes, which is the
    // easiest way to exercise the fake-report path deterministically.
    let always_noise =
        SourceNoiseHandler::new(PrivacyConfig::new(0.0, 6.5, 11.5));
    let mut noised = 0;
    let mut silenced = 0;
    for _ in 0..200 {
        let decision =
            always_noise.assign_attribution_mode(&navigation, &mut rng)?;
        match decision.mode {
            AttributionMode::Truthfully => {
                panic!("epsilon 0 must never stay truthful")
            }
            AttributionMode::Falsely => noised += 1,
            AttributionMode::Never => silenced += 1,
        }
    }
    assert_eq!(noised + silenced, 200);
    // Only 1 of the 2925 states is empty, so substitution dominates.
    assert!(noised > silenced);

    // The same seed replays the same decisions.
    let mut first = StdRng::seed_from_u64(7);
    let mut second = StdRng::seed_from_u64(7);
    let replay_a =
        always_noise.assign_attribution_mode(&navigation, &mut first)?;
    let replay_b =
        always_noise.assign_attribution_mode(&navigation, &mut second)?;
    assert_eq!(replay_a, replay_b);

    Ok(())
}
