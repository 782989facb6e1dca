//! Wald confidence interval for the success probability

use serde::{Deserialize, Serialize};

/// Two-sided standard normal quantile for 95% confidence.
pub const Z_95: f64 = 1.96;

/// Confidence level reported alongside [`Z_95`], in percent.
pub const CONFIDENCE_LEVEL: u8 = 95;

/// Normal-approximation interval for a proportion, clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
    /// Confidence level in percent.
    pub confidence: u8,
}

impl ConfidenceInterval {
    /// 95% Wald interval centred on `center` after `total_trials` observations.
    ///
    /// `SE = √(p·q / max(trials, 1))`, so an empty experiment yields the
    /// single-observation width instead of dividing by zero.
    ///
    /// Centred on the theoretical `p` by the callers in this crate, not on the
    /// observed proportion.
    #[must_use]
    pub fn wald(center: f64, total_trials: u64) -> Self {
        let se = standard_error(center, total_trials);
        Self {
            lower: (center - Z_95 * se).clamp(0.0, 1.0),
            upper: (center + Z_95 * se).clamp(0.0, 1.0),
            confidence: CONFIDENCE_LEVEL,
        }
    }

    /// `upper − lower`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `value` lies inside the closed interval.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }
}

/// `√(p·(1−p) / max(n, 1))`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn standard_error(p: f64, total_trials: u64) -> f64 {
    (p * (1.0 - p) / total_trials.max(1) as f64).sqrt()
}
