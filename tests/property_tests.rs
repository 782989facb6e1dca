//! Property-based tests for dice-lab
//!
//! Mathematical invariants of the binomial engine and data-integrity
//! properties of the experiment log.
//! Run with ProptestConfig::with_cases(100).

use dice_lab::experiment::{count_successes, ExperimentConfig, ExperimentLog, SuccessFaces};
use dice_lab::stats::{analyze, binomial_coefficient, BinomialDistribution, BinomialParameters};
use proptest::prelude::*;

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

/// Non-empty set of success faces
fn arb_faces() -> impl Strategy<Value = SuccessFaces> {
    proptest::collection::vec(1u8..=6, 1..6).prop_map(|v| SuccessFaces::new(v).unwrap())
}

/// One trial's dice
fn arb_roll(dice: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(1u8..=6, dice)
}

fn relative_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * a.abs().max(b.abs()).max(1.0)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ========================================================================
    // Binomial Engine Properties
    // ========================================================================

    /// Property: PMF sums to 1
    #[test]
    fn prop_pmf_sums_to_one(n in 0u32..2000, p in 0.0f64..=1.0) {
        let dist = BinomialDistribution::new(BinomialParameters::new(n, p));
        let total: f64 = dist.points().iter().map(|pt| pt.probability).sum();
        prop_assert!((total - 1.0).abs() < 1e-6, "sum = {}", total);
    }

    /// Property: C(n,k) == C(n,n-k)
    #[test]
    fn prop_coefficient_symmetry(n in 0u32..500, k_frac in 0.0f64..=1.0) {
        let k = ((f64::from(n) * k_frac).floor() as u32).min(n);
        prop_assert_eq!(binomial_coefficient(n, k), binomial_coefficient(n, n - k));
    }

    /// Property: P(X=0) = q^n and P(X=n) = p^n
    #[test]
    fn prop_pmf_boundaries(n in 0u32..200, p in 0.0f64..=1.0) {
        let params = BinomialParameters::new(n, p);
        let q = 1.0 - p;
        prop_assert!(relative_eq(params.pmf(0), q.powi(n as i32), 1e-12));
        prop_assert!(relative_eq(params.pmf(n), p.powi(n as i32), 1e-12));
    }

    /// Property: CDF is non-decreasing and ends at 1
    #[test]
    fn prop_cdf_monotone(n in 0u32..2000, p in 0.0f64..=1.0) {
        let dist = BinomialDistribution::new(BinomialParameters::new(n, p));
        let points = dist.points();
        for pair in points.windows(2) {
            prop_assert!(pair[1].cumulative_probability >= pair[0].cumulative_probability);
        }
        prop_assert!((dist.total_probability() - 1.0).abs() < 1e-6);
    }

    /// Property: mean = n·p and variance = n·p·q
    #[test]
    fn prop_mean_variance_identity(
        dice in 1u8..=6,
        faces in arb_faces(),
        target in 1u32..1000
    ) {
        let config = ExperimentConfig::new(dice, faces, target).unwrap();
        let result = analyze(&config, &ExperimentLog::new());
        let n = f64::from(result.n);
        prop_assert!(relative_eq(result.mean, n * result.p, 1e-12));
        prop_assert!(relative_eq(result.variance, n * result.p * result.q, 1e-12));
        prop_assert!(result.q == 1.0 - result.p);
    }

    /// Property: confidence interval stays in [0, 1] and brackets p
    #[test]
    fn prop_confidence_interval_bounds(
        faces in arb_faces(),
        rolls in proptest::collection::vec(arb_roll(2), 0..50)
    ) {
        let config = ExperimentConfig::new(2, faces, 100).unwrap();
        let mut log = ExperimentLog::new();
        for roll in rolls {
            log.append(roll, config.success_faces());
        }
        let ci = analyze(&config, &log).confidence_interval;
        prop_assert!(0.0 <= ci.lower && ci.lower <= ci.upper && ci.upper <= 1.0);
        prop_assert!(ci.contains(config.any_die_probability()));
    }

    // ========================================================================
    // Experiment Log Properties
    // ========================================================================

    /// Property: t appends give length t with indices 1..=t
    #[test]
    fn prop_log_append_invariant(
        faces in arb_faces(),
        rolls in proptest::collection::vec(arb_roll(3), 0..100)
    ) {
        let mut log = ExperimentLog::new();
        let t = rolls.len();
        for roll in rolls {
            log.append(roll, &faces);
        }
        prop_assert_eq!(log.len(), t);
        for (i, record) in log.iter().enumerate() {
            prop_assert_eq!(record.index() as usize, i + 1);
        }
    }

    /// Property: success count never exceeds the dice rolled
    #[test]
    fn prop_success_count_bounded(faces in arb_faces(), roll in arb_roll(6)) {
        let hits = count_successes(&roll, &faces);
        prop_assert!(usize::from(hits) <= roll.len());
        let expected = roll.iter().filter(|&&v| faces.contains(v)).count();
        prop_assert_eq!(usize::from(hits), expected);
    }

    /// Property: observed probability lies in [0, 1]
    #[test]
    fn prop_observed_probability_bounded(
        faces in arb_faces(),
        rolls in proptest::collection::vec(arb_roll(2), 0..60)
    ) {
        let config = ExperimentConfig::new(2, faces, 60).unwrap();
        let mut log = ExperimentLog::new();
        for roll in rolls {
            log.append(roll, config.success_faces());
        }
        let result = analyze(&config, &log);
        prop_assert!((0.0..=1.0).contains(&result.observed_probability));
        prop_assert!(result.observed_successes <= result.total_trials);
    }
}
