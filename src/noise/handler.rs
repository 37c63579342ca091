use log::debug;
use serde::Serialize;

use crate::{
    error::NoiseError,
    noise::{
        flex_event::{
            num_states_with_destinations, select_random_flex_reports,
        },
        impression::select_random_report_configs,
        params::{
            FlexNoiseParams, FlexReportConfig, NoiseParams, ReportConfig,
        },
        traits::RandomSource,
    },
    privacy::{metrics, params::PrivacyConfig},
};

/// Whether a source's eventual reports reflect real or substituted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttributionMode {
    /// Real attributions are reported as they happen.
    Truthfully,
    /// A substituted report set is reported instead of the real one.
    Falsely,
    /// The substituted report set is empty: nothing will ever be reported.
    Never,
}

/// Outcome of one noising decision for the fixed-window model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoiseDecision {
    pub mode: AttributionMode,
    pub fake_reports: Vec<ReportConfig>,
}

/// Outcome of one noising decision for the flexible model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlexNoiseDecision {
    pub mode: AttributionMode,
    pub fake_reports: Vec<FlexReportConfig>,
}

/// Decides, per newly registered source, whether its reports stay truthful
/// or get replaced by a uniformly random report set.
///
/// The handler itself is stateless; all randomness flows through the
/// injected [`RandomSource`], so callers on separate worker threads only
/// need their own generator handle.
#[derive(Debug, Clone)]
pub struct SourceNoiseHandler {
    config: PrivacyConfig,
}

impl SourceNoiseHandler {
    pub fn new(config: PrivacyConfig) -> Self {
        Self { config }
    }

    /// Probability that this shape's reports get substituted.
    pub fn attribution_probability(
        &self,
        params: &NoiseParams,
    ) -> Result<f64, NoiseError> {
        let num_states = params.num_states()?;
        Ok(metrics::flip_probability(&num_states, self.config.epsilon))
    }

    /// Worst-case leakage of this shape's report channel, in bits.
    /// Compared against the configured ceilings at registration time.
    pub fn information_gain(
        &self,
        params: &NoiseParams,
    ) -> Result<f64, NoiseError> {
        let num_states = params.num_states()?;
        let flip =
            metrics::flip_probability(&num_states, self.config.epsilon);
        Ok(metrics::information_gain(&num_states, flip))
    }

    /// Assigns an attribution mode for a new source, generating fake
    /// reports when the randomized response lands on substitution.
    ///
    /// The caller attaches the returned configs to the source and persists
    /// them; window indices become reporting times upstream.
    pub fn assign_attribution_mode<R: RandomSource>(
        &self,
        params: &NoiseParams,
        rng: &mut R,
    ) -> Result<NoiseDecision, NoiseError> {
        let probability = self.attribution_probability(params)?;
        if rng.next_unit() > probability {
            return Ok(NoiseDecision {
                mode: AttributionMode::Truthfully,
                fake_reports: vec![],
            });
        }

        let fake_reports = select_random_report_configs(params, rng)?;
        let mode = match fake_reports.is_empty() {
            true => AttributionMode::Never,
            false => AttributionMode::Falsely,
        };
        debug!(
            "substituting {} fake report(s) for shape {:?}, mode {:?}",
            fake_reports.len(),
            params,
            mode
        );
        Ok(NoiseDecision { mode, fake_reports })
    }

    /// Flexible-model analogue of [`Self::assign_attribution_mode`].
    pub fn assign_attribution_mode_flex<R: RandomSource>(
        &self,
        params: &FlexNoiseParams,
        destination_multiplier: u32,
        rng: &mut R,
    ) -> Result<FlexNoiseDecision, NoiseError> {
        let num_states =
            num_states_with_destinations(params, destination_multiplier)?;
        let probability =
            metrics::flip_probability(&num_states, self.config.epsilon);
        if rng.next_unit() > probability {
            return Ok(FlexNoiseDecision {
                mode: AttributionMode::Truthfully,
                fake_reports: vec![],
            });
        }

        let fake_reports = select_random_flex_reports(
            params,
            destination_multiplier,
            rng,
        )?;
        let mode = match fake_reports.is_empty() {
            true => AttributionMode::Never,
            false => AttributionMode::Falsely,
        };
        debug!(
            "substituting {} flexible fake report(s), mode {:?}",
            fake_reports.len(),
            mode
        );
        Ok(FlexNoiseDecision { mode, fake_reports })
    }
}
