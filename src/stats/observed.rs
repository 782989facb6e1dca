//! Empirical side of the experiment: observed rates, deviation, convergence

use serde::{Deserialize, Serialize};

use super::binomial::binomial_pmf;
use crate::experiment::{ExperimentConfig, ExperimentLog};

/// Trials considered by [`convergence_rating`].
pub const CONVERGENCE_WINDOW: usize = 10;

/// Observed minus theoretical below this counts as close agreement.
pub const AGREEMENT_TOLERANCE: f64 = 0.05;

/// `successes / trials`, defined as 0 before any trial.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn observed_probability(successes: u64, trials: u64) -> f64 {
    if trials == 0 {
        0.0
    } else {
        successes as f64 / trials as f64
    }
}

/// Single-cell chi-square style deviation `(O − E)² / E` with `E = trials · p`.
///
/// Zero when nothing was observed yet or nothing was expected.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn chi_square_deviation(successes: u64, trials: u64, p: f64) -> f64 {
    let expected = trials as f64 * p;
    if trials == 0 || expected <= 0.0 {
        return 0.0;
    }
    let diff = successes as f64 - expected;
    diff * diff / expected
}

/// Running estimate after one trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvergencePoint {
    /// Trial index.
    pub trial: u32,
    /// Cumulative observed proportion up to this trial.
    pub observed_probability: f64,
    /// Theoretical success probability.
    pub theoretical_probability: f64,
    /// |observed − theoretical|
    pub difference: f64,
}

/// Cumulative observed proportion after every trial.
#[must_use]
pub fn convergence_series(config: &ExperimentConfig, log: &ExperimentLog, p: f64) -> Vec<ConvergencePoint> {
    let event = config.success_event();
    let mut successes = 0_u64;
    let mut trials = 0_u64;
    log.iter()
        .map(|record| {
            successes += record.successes_for(event);
            trials += record.trials_for(event);
            let observed = observed_probability(successes, trials);
            ConvergencePoint {
                trial: record.index(),
                observed_probability: observed,
                theoretical_probability: p,
                difference: (observed - p).abs(),
            }
        })
        .collect()
}

/// How closely the recent success rate tracks the theoretical one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConvergenceRating {
    /// Fewer than [`CONVERGENCE_WINDOW`] trials recorded.
    InsufficientData,
    /// Within 0.05.
    Excellent,
    /// Within 0.10.
    Good,
    /// Within 0.20.
    Moderate,
    /// 0.20 or further away.
    Slow,
}

impl ConvergenceRating {
    fn from_difference(difference: f64) -> Self {
        if difference < AGREEMENT_TOLERANCE {
            Self::Excellent
        } else if difference < 0.1 {
            Self::Good
        } else if difference < 0.2 {
            Self::Moderate
        } else {
            Self::Slow
        }
    }
}

/// Rate the last [`CONVERGENCE_WINDOW`] trials against `p`.
#[must_use]
pub fn convergence_rating(config: &ExperimentConfig, log: &ExperimentLog, p: f64) -> ConvergenceRating {
    let records = log.records();
    if records.len() < CONVERGENCE_WINDOW {
        return ConvergenceRating::InsufficientData;
    }
    let event = config.success_event();
    let recent = &records[records.len() - CONVERGENCE_WINDOW..];
    let successes: u64 = recent.iter().map(|r| r.successes_for(event)).sum();
    let trials: u64 = recent.iter().map(|r| r.trials_for(event)).sum();
    ConvergenceRating::from_difference((observed_probability(successes, trials) - p).abs())
}

/// Frequency of one per-trial success count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    /// Success dice in a trial.
    pub successes: u8,
    /// Trials with exactly that many success dice.
    pub frequency: u64,
    /// `frequency / trials`.
    pub observed_share: f64,
    /// P(successes) for Binomial(diceCount, p_die).
    pub theoretical_share: f64,
}

/// Histogram of per-trial success counts over `0..=diceCount`.
///
/// The theoretical column models the dice of one trial, so it uses the
/// per-die probability regardless of the success event.
#[must_use]
pub fn success_histogram(config: &ExperimentConfig, log: &ExperimentLog) -> Vec<HistogramBin> {
    let dice = config.dice_count();
    let p_die = config.per_die_probability();
    let mut frequencies = vec![0_u64; usize::from(dice) + 1];
    for record in log {
        if let Some(slot) = frequencies.get_mut(usize::from(record.success_count())) {
            *slot += 1;
        }
    }
    let trials = log.len() as u64;
    (0..=dice)
        .zip(frequencies)
        .map(|(successes, frequency)| HistogramBin {
            successes,
            frequency,
            observed_share: observed_probability(frequency, trials),
            theoretical_share: binomial_pmf(u32::from(dice), u32::from(successes), p_die),
        })
        .collect()
}

/// Spread of the experiment so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvergenceSummary {
    /// Largest |observed − theoretical| along the convergence series.
    pub max_difference: f64,
    /// Smallest |observed − theoretical| along the convergence series.
    pub min_difference: f64,
    /// Most frequent per-trial success count (the smallest one on ties).
    pub most_frequent_successes: u8,
    /// Population standard deviation of per-trial success counts.
    pub success_std_dev: f64,
}

/// Summarise convergence and per-trial variability. `None` before the first trial.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn convergence_summary(
    config: &ExperimentConfig,
    log: &ExperimentLog,
    p: f64,
) -> Option<ConvergenceSummary> {
    if log.is_empty() {
        return None;
    }
    let series = convergence_series(config, log, p);
    let (min_difference, max_difference) = series
        .iter()
        .map(|point| point.difference)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        });

    let most_frequent_successes = success_histogram(config, log)
        .iter()
        .fold(None::<&HistogramBin>, |best, bin| match best {
            Some(b) if b.frequency >= bin.frequency => Some(b),
            _ => Some(bin),
        })
        .map_or(0, |bin| bin.successes);

    let count = log.len() as f64;
    let mean = log.iter().map(|r| f64::from(r.success_count())).sum::<f64>() / count;
    let variance = log
        .iter()
        .map(|r| {
            let d = f64::from(r.success_count()) - mean;
            d * d
        })
        .sum::<f64>()
        / count;

    Some(ConvergenceSummary {
        max_difference,
        min_difference,
        most_frequent_successes,
        success_std_dev: variance.sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::SuccessFaces;

    fn log_from(rolls: &[[u8; 2]]) -> ExperimentLog {
        let faces = SuccessFaces::new([6]).unwrap();
        let mut log = ExperimentLog::new();
        for roll in rolls {
            log.append(roll.to_vec(), &faces);
        }
        log
    }

    #[test]
    fn test_observed_probability_empty() {
        assert!(observed_probability(0, 0).abs() < f64::EPSILON);
        assert!((observed_probability(2, 3) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_chi_square() {
        assert!(chi_square_deviation(0, 0, 0.5).abs() < f64::EPSILON);
        assert!(chi_square_deviation(3, 10, 0.0).abs() < f64::EPSILON);
        // E = 5, O = 7 -> 4 / 5
        assert!((chi_square_deviation(7, 10, 0.5) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_convergence_series_tracks_cumulative_rate() {
        let config = ExperimentConfig::default();
        let log = log_from(&[[6, 3], [2, 2], [6, 6]]);
        let series = convergence_series(&config, &log, 0.3);
        let observed: Vec<f64> = series.iter().map(|p| p.observed_probability).collect();
        assert!((observed[0] - 1.0).abs() < 1e-12);
        assert!((observed[1] - 0.5).abs() < 1e-12);
        assert!((observed[2] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(series[2].trial, 3);
        assert!((series[1].difference - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_convergence_rating_window() {
        let config = ExperimentConfig::default();
        let short = log_from(&[[6, 1]; 9]);
        assert_eq!(
            convergence_rating(&config, &short, 0.3),
            ConvergenceRating::InsufficientData
        );

        // 3 of the last 10 trials succeed
        let mut rolls = vec![[1_u8, 1]; 20];
        for roll in rolls.iter_mut().skip(17) {
            *roll = [6, 2];
        }
        let log = log_from(&rolls);
        assert_eq!(convergence_rating(&config, &log, 0.3), ConvergenceRating::Excellent);
        assert_eq!(convergence_rating(&config, &log, 0.38), ConvergenceRating::Good);
        assert_eq!(convergence_rating(&config, &log, 0.45), ConvergenceRating::Moderate);
        assert_eq!(convergence_rating(&config, &log, 0.9), ConvergenceRating::Slow);
    }

    #[test]
    fn test_success_histogram() {
        let config = ExperimentConfig::default();
        let log = log_from(&[[6, 3], [2, 2], [6, 6], [1, 4]]);
        let bins = success_histogram(&config, &log);
        let freqs: Vec<u64> = bins.iter().map(|b| b.frequency).collect();
        assert_eq!(freqs, vec![2, 1, 1]);
        assert!((bins[0].observed_share - 0.5).abs() < 1e-12);
        assert!((bins[0].theoretical_share - 25.0 / 36.0).abs() < 1e-12);
        let total: f64 = bins.iter().map(|b| b.theoretical_share).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_convergence_summary_empty() {
        let config = ExperimentConfig::default();
        assert!(convergence_summary(&config, &ExperimentLog::new(), 0.3).is_none());
    }

    #[test]
    fn test_convergence_summary() {
        let config = ExperimentConfig::default();
        // success counts 1, 0, 2, 0 -> mean 0.75
        let log = log_from(&[[6, 3], [2, 2], [6, 6], [1, 4]]);
        let summary = convergence_summary(&config, &log, 0.3).unwrap();

        // running rates 1, 1/2, 2/3, 1/2
        assert!((summary.max_difference - 0.7).abs() < 1e-12);
        assert!((summary.min_difference - 0.2).abs() < 1e-12);
        assert_eq!(summary.most_frequent_successes, 0);
        let expected = ((0.0625 + 0.5625 + 1.5625 + 0.5625) / 4.0_f64).sqrt();
        assert!((summary.success_std_dev - expected).abs() < 1e-12);
    }

    #[test]
    fn test_convergence_summary_tie_prefers_fewer_successes() {
        let config = ExperimentConfig::default();
        let log = log_from(&[[6, 6], [6, 1]]);
        let summary = convergence_summary(&config, &log, 1.0).unwrap();
        assert_eq!(summary.most_frequent_successes, 1);
        assert!((summary.success_std_dev - 0.5).abs() < 1e-12);
        assert!(summary.max_difference.abs() < 1e-12);
    }
}
