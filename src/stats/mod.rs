//! Binomial Statistics Engine
//!
//! Pure functions of `(ExperimentConfig, ExperimentLog)`. Nothing here keeps
//! state between calls; every result is recomputed from the log on demand.
//!
//! | Quantity | Formula |
//! |---|---|
//! | P(X=k) | C(n,k)·p^k·q^(n−k) |
//! | mean | n·p |
//! | variance | n·p·q |
//! | observed | successes / trials (0 when empty) |
//! | 95% CI | p ± 1.96·√(p·q / max(trials, 1)), clamped to [0, 1] |
//!
//! ## Example
//!
//! ```rust
//! use dice_lab::experiment::{ExperimentConfig, ExperimentLog, SuccessFaces};
//! use dice_lab::stats::analyze;
//!
//! let config = ExperimentConfig::new(1, SuccessFaces::new([5, 6])?, 10)?;
//! let result = analyze(&config, &ExperimentLog::new());
//!
//! assert!((result.p - 1.0 / 3.0).abs() < 1e-12);
//! assert_eq!(result.observed_probability, 0.0);
//! assert!(result.confidence_interval.width() > 0.0);
//! # Ok::<(), dice_lab::Error>(())
//! ```

mod binomial;
mod interval;
mod observed;

pub use binomial::{
    binomial_coefficient, binomial_pmf, BinomialDistribution, BinomialParameters,
    DistributionPoint, PointProbability, SummaryStatistics,
};
pub use interval::{standard_error, ConfidenceInterval, CONFIDENCE_LEVEL, Z_95};
pub use observed::{
    chi_square_deviation, convergence_rating, convergence_series, convergence_summary,
    observed_probability, success_histogram, ConvergencePoint, ConvergenceRating,
    ConvergenceSummary, HistogramBin, AGREEMENT_TOLERANCE, CONVERGENCE_WINDOW,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::experiment::{ExperimentConfig, ExperimentLog, SuccessEvent};

/// Everything derived from the current `(config, log)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinomialResult {
    /// Success definition the model was built with.
    pub success_event: SuccessEvent,
    /// Number of binomial trials in the theoretical model.
    pub n: u32,
    /// Success probability per trial.
    pub p: f64,
    /// `1 − p`.
    pub q: f64,
    /// PMF/CDF table over `k = 0..=n`.
    pub distribution: Vec<DistributionPoint>,
    /// n·p
    pub mean: f64,
    /// n·p·q
    pub variance: f64,
    /// √(n·p·q)
    pub standard_deviation: f64,
    /// Successes observed so far.
    pub observed_successes: u64,
    /// Bernoulli trials observed so far.
    pub total_trials: u64,
    /// `observed_successes / total_trials`, 0 when empty.
    pub observed_probability: f64,
    /// Observed minus theoretical proportion, `None` before the first trial.
    pub difference: Option<f64>,
    /// `(O − E)² / E` for the success count.
    pub chi_square: f64,
    /// 95% Wald interval centred on `p`.
    pub confidence_interval: ConfidenceInterval,
    /// Agreement of the most recent trials with `p`.
    pub convergence: ConvergenceRating,
}

impl BinomialResult {
    /// Parameters of the theoretical model.
    #[must_use]
    pub fn parameters(&self) -> BinomialParameters {
        BinomialParameters::new(self.n, self.p)
    }

    /// Whether the observed proportion is within [`AGREEMENT_TOLERANCE`] of `p`.
    #[must_use]
    pub fn within_tolerance(&self) -> bool {
        self.difference
            .is_some_and(|d| d.abs() < AGREEMENT_TOLERANCE)
    }

    /// Summary moments.
    #[must_use]
    pub const fn summary(&self) -> SummaryStatistics {
        SummaryStatistics {
            mean: self.mean,
            variance: self.variance,
            standard_deviation: self.standard_deviation,
        }
    }
}

/// Derive the full statistics snapshot for `config` and `log`.
#[must_use]
pub fn analyze(config: &ExperimentConfig, log: &ExperimentLog) -> BinomialResult {
    let parameters = BinomialParameters::from_config(config);
    let event = config.success_event();
    let p = parameters.p();

    let observed_successes = log.successes(event);
    let total_trials = log.bernoulli_trials(event);
    let observed = observed_probability(observed_successes, total_trials);
    let summary = parameters.summary();

    debug!(
        n = parameters.n(),
        p,
        trials = total_trials,
        successes = observed_successes,
        "binomial statistics recomputed"
    );

    BinomialResult {
        success_event: event,
        n: parameters.n(),
        p,
        q: parameters.q(),
        distribution: BinomialDistribution::new(parameters).into_points(),
        mean: summary.mean,
        variance: summary.variance,
        standard_deviation: summary.standard_deviation,
        observed_successes,
        total_trials,
        observed_probability: observed,
        difference: (total_trials > 0).then(|| observed - p),
        chi_square: chi_square_deviation(observed_successes, total_trials, p),
        confidence_interval: ConfidenceInterval::wald(p, total_trials),
        convergence: convergence_rating(config, log, p),
    }
}
