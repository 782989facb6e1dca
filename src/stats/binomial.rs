//! Binomial distribution: coefficient, PMF, CDF and moments
//!
//! # Mathematical Definition
//! - PMF: P(X=k) = C(n,k) · p^k · q^(n−k), k ∈ [0, n]
//! - CDF: F(k) = Σ_{i≤k} P(X=i)
//! - Mean: n·p
//! - Variance: n·p·q

use serde::{Deserialize, Serialize};

use crate::experiment::{ExperimentConfig, SuccessEvent};
use crate::{Error, Result};

/// Binomial coefficient C(n, k) as a floating-point running product.
///
/// Computes `Π_{i<k} (n−i)/(i+1)` over the shorter side `min(k, n−k)`, so
/// intermediate values stay quotients rather than factorials and
/// `C(n,k) == C(n,n−k)` holds exactly.
///
/// Returns 0 for `k > n` and 1 for `k ∈ {0, n}`.
#[must_use]
pub fn binomial_coefficient(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    if k == 0 || k == n {
        return 1.0;
    }
    let k = k.min(n - k);
    let n = f64::from(n);
    (0..k).map(f64::from).fold(1.0, |acc, i| acc * (n - i) / (i + 1.0))
}

/// ln C(n, k) over the same `min(k, n−k)` factors as [`binomial_coefficient`].
fn ln_binomial_coefficient(n: u32, k: u32) -> f64 {
    let k = k.min(n - k);
    let n = f64::from(n);
    (0..k)
        .map(f64::from)
        .map(|i| ((n - i) / (i + 1.0)).ln())
        .sum()
}

/// P(X = k) for X ~ Binomial(n, p). Zero outside `[0, n]`.
///
/// Degenerate `p ∈ {0, 1}` is exact. Once `C(n,k)` overflows or `p^k·q^(n−k)`
/// leaves the normal range the term is evaluated in log space instead.
#[must_use]
pub fn binomial_pmf(n: u32, k: u32, p: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    let q = 1.0 - p;
    if p <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    if q <= 0.0 {
        return if k == n { 1.0 } else { 0.0 };
    }
    let coefficient = binomial_coefficient(n, k);
    let powers = powu(p, k) * powu(q, n - k);
    if coefficient.is_finite() && powers.is_normal() {
        return coefficient * powers;
    }
    let exponent = f64::from(k).mul_add(p.ln(), f64::from(n - k) * q.ln());
    (ln_binomial_coefficient(n, k) + exponent).exp()
}

/// `base^exp` for unsigned exponents, exact at `0^0 = 1`.
fn powu(base: f64, exp: u32) -> f64 {
    i32::try_from(exp).map_or_else(|_| base.powf(f64::from(exp)), |e| base.powi(e))
}

/// Parameters of the binomial model.
///
/// `q` is always derived as `1 − p`, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinomialParameters {
    n: u32,
    p: f64,
}

impl BinomialParameters {
    /// Create parameters for `n` trials with success probability `p`.
    ///
    /// `p` is clamped into `[0, 1]`.
    #[must_use]
    pub fn new(n: u32, p: f64) -> Self {
        Self {
            n,
            p: p.clamp(0.0, 1.0),
        }
    }

    /// Parameters of the theoretical model for `config`.
    ///
    /// - `AnyDie`: `n = trialTarget`, `p = 1 − (1 − p_die)^diceCount`
    /// - `PerDie`: `n = trialTarget · diceCount`, `p = p_die`
    #[must_use]
    pub fn from_config(config: &ExperimentConfig) -> Self {
        match config.success_event() {
            SuccessEvent::AnyDie => Self::new(config.trial_target(), config.any_die_probability()),
            SuccessEvent::PerDie => Self::new(
                config
                    .trial_target()
                    .saturating_mul(u32::from(config.dice_count())),
                config.per_die_probability(),
            ),
        }
    }

    /// Number of trials.
    #[must_use]
    pub const fn n(&self) -> u32 {
        self.n
    }

    /// Success probability per trial.
    #[must_use]
    pub const fn p(&self) -> f64 {
        self.p
    }

    /// Failure probability per trial.
    #[must_use]
    pub fn q(&self) -> f64 {
        1.0 - self.p
    }

    /// Mean = n·p.
    #[must_use]
    pub fn mean(&self) -> f64 {
        f64::from(self.n) * self.p
    }

    /// Variance = n·p·q.
    #[must_use]
    pub fn variance(&self) -> f64 {
        f64::from(self.n) * self.p * self.q()
    }

    /// Standard deviation = √(n·p·q).
    #[must_use]
    pub fn standard_deviation(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Mean, variance and standard deviation together.
    #[must_use]
    pub fn summary(&self) -> SummaryStatistics {
        SummaryStatistics {
            mean: self.mean(),
            variance: self.variance(),
            standard_deviation: self.standard_deviation(),
        }
    }

    /// P(X = k).
    #[must_use]
    pub fn pmf(&self, k: u32) -> f64 {
        binomial_pmf(self.n, k, self.p)
    }
}

/// Moments of the binomial model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStatistics {
    /// n·p
    pub mean: f64,
    /// n·p·q
    pub variance: f64,
    /// √variance
    pub standard_deviation: f64,
}

/// One row of the distribution table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionPoint {
    /// Number of successes.
    pub k: u32,
    /// P(X = k)
    pub probability: f64,
    /// P(X ≤ k)
    pub cumulative_probability: f64,
}

/// Result of a single point-probability query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointProbability {
    /// Number of successes.
    pub k: u32,
    /// P(X = k)
    pub probability: f64,
    /// P(X = k) · 100
    pub percentage: f64,
    /// C(n, k)
    pub coefficient: f64,
}

/// Full PMF/CDF table over `k = 0..=n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinomialDistribution {
    parameters: BinomialParameters,
    points: Vec<DistributionPoint>,
}

impl BinomialDistribution {
    /// Tabulate the distribution for `parameters`.
    ///
    /// The cumulative column is a running sum in increasing `k`.
    #[must_use]
    pub fn new(parameters: BinomialParameters) -> Self {
        let mut cumulative = 0.0;
        let points = (0..=parameters.n())
            .map(|k| {
                let probability = parameters.pmf(k);
                cumulative += probability;
                DistributionPoint {
                    k,
                    probability,
                    cumulative_probability: cumulative,
                }
            })
            .collect();
        Self { parameters, points }
    }

    /// Parameters the table was built from.
    #[must_use]
    pub const fn parameters(&self) -> BinomialParameters {
        self.parameters
    }

    /// Table rows ordered by `k`.
    #[must_use]
    pub fn points(&self) -> &[DistributionPoint] {
        &self.points
    }

    /// Consume the table, keeping the rows.
    #[must_use]
    pub fn into_points(self) -> Vec<DistributionPoint> {
        self.points
    }

    /// Σ P(X=k); ≈ 1 for well-formed parameters.
    #[must_use]
    pub fn total_probability(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.cumulative_probability)
    }

    /// Most likely `k` (the smallest one on ties).
    #[must_use]
    pub fn mode(&self) -> u32 {
        self.points
            .iter()
            .fold(None::<&DistributionPoint>, |best, point| match best {
                Some(b) if b.probability >= point.probability => Some(b),
                _ => Some(point),
            })
            .map_or(0, |p| p.k)
    }

    /// P(X = k) with the supporting coefficient.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `k > n`.
    pub fn probability_of(&self, k: u32) -> Result<PointProbability> {
        let n = self.parameters.n();
        let point = self
            .points
            .get(k as usize)
            .ok_or(Error::OutOfRange { k, n })?;
        Ok(PointProbability {
            k,
            probability: point.probability,
            percentage: point.probability * 100.0,
            coefficient: binomial_coefficient(n, k),
        })
    }
}
