use anyhow::bail;
use log::warn;
use serde::Serialize;

/// Registration-time ceiling on the worst-case information gain of a
/// source's report channel, in bits.
///
/// Sources whose channel would leak more than the ceiling are rejected
/// before any report is scheduled, so the check runs on exact inputs and
/// has no state to update.
#[derive(Debug, Clone, Serialize)]
pub struct InformationGainLimit {
    pub max_bits: f64,
}

impl InformationGainLimit {
    pub fn new(max_bits: f64) -> Result<Self, anyhow::Error> {
        if !max_bits.is_finite() || max_bits < 0.0 {
            bail!(
                "information-gain ceiling must be finite and non-negative, got {max_bits}"
            );
        }
        Ok(Self { max_bits })
    }

    /// Checks a computed gain against the ceiling.
    pub fn check(&self, gain_bits: f64) -> GainLimitStatus {
        let margin = (self.max_bits - gain_bits).abs();
        if margin < 1e-9 && margin > 0.0 {
            warn!(
                "check: information gain ({gain_bits}) is within {margin} of the ceiling ({})",
                self.max_bits,
            );
        }

        match gain_bits > self.max_bits {
            true => GainLimitStatus::Exceeded,
            false => GainLimitStatus::Continue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GainLimitStatus {
    Continue,
    Exceeded,
}
