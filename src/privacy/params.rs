use serde::Serialize;

/// Default randomized-response epsilon for report noising.
pub const DEFAULT_EPSILON: f64 = 14.0;

/// Default information-gain ceiling for event sources, in bits.
pub const DEFAULT_EVENT_GAIN_LIMIT: f64 = 6.5;

/// Default information-gain ceiling for navigation sources, in bits.
pub const DEFAULT_NAVIGATION_GAIN_LIMIT: f64 = 11.5;

/// Static privacy configuration for the noise handler: the flip-probability
/// epsilon plus the per-source-kind information-gain ceilings.
#[derive(Debug, Clone, Serialize)]
pub struct PrivacyConfig {
    pub epsilon: f64,
    pub event_gain_limit: f64,
    pub navigation_gain_limit: f64,
}

impl PrivacyConfig {
    pub fn new(
        epsilon: f64,
        event_gain_limit: f64,
        navigation_gain_limit: f64,
    ) -> Self {
        Self {
            epsilon,
            event_gain_limit,
            navigation_gain_limit,
        }
    }
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_EPSILON,
            DEFAULT_EVENT_GAIN_LIMIT,
            DEFAULT_NAVIGATION_GAIN_LIMIT,
        )
    }
}
