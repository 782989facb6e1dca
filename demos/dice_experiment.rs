//! Dice Experiment Example
//!
//! Runs a short experiment with deferred rolls, prints the convergence of the
//! observed rate and exports the result.
//!
//! Run with: cargo run --example dice_experiment
//! Set RUST_LOG=dice_lab=debug to see every recorded trial.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use dice_lab::experiment::{ExperimentConfig, ExperimentSession, SuccessFaces};
use dice_lab::export::{default_file_name, to_csv, ExportableStatistics};
use dice_lab::roll::{DiceRoller, RollTiming};
use dice_lab::stats::{convergence_series, convergence_summary, success_histogram};
use dice_lab::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("dice_lab=info");

    println!("=== dice-lab: Binomial Dice Experiment ===\n");

    // -------------------------------------------------------------------------
    // 1. Configure
    // -------------------------------------------------------------------------
    let faces = SuccessFaces::parse("5,6").context("parsing success criteria")?;
    let config = ExperimentConfig::new(2, faces, 30)?;
    println!(
        "1. {} dice, success faces {{{}}}, {} trials",
        config.dice_count(),
        config.success_faces(),
        config.trial_target()
    );

    let session = Arc::new(Mutex::new(ExperimentSession::new(config.clone())));

    // -------------------------------------------------------------------------
    // 2. Roll (shortened settle time for the demo)
    // -------------------------------------------------------------------------
    println!("\n2. Rolling...");
    let timing = RollTiming::new(Duration::from_millis(20), Duration::from_millis(10));
    let mut roller = DiceRoller::new(timing);
    for _ in 0..config.trial_target() {
        let record = roller.roll(&session)?.settled().await?;
        println!(
            "   #{:>2} {:?} -> {} success dice",
            record.index(),
            record.dice_values(),
            record.success_count()
        );
    }

    let guard = session
        .lock()
        .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
    let stats = guard.statistics();

    // -------------------------------------------------------------------------
    // 3. Statistics
    // -------------------------------------------------------------------------
    println!("\n3. Binomial model");
    println!("   n = {}, p = {:.4}, q = {:.4}", stats.n, stats.p, stats.q);
    println!(
        "   mean = {:.4}, variance = {:.4}, sd = {:.4}",
        stats.mean, stats.variance, stats.standard_deviation
    );
    println!(
        "   observed = {:.4} ({} / {}), chi^2 = {:.4}, convergence = {:?}",
        stats.observed_probability,
        stats.observed_successes,
        stats.total_trials,
        stats.chi_square,
        stats.convergence
    );
    println!(
        "   95% CI = [{:.4}, {:.4}]",
        stats.confidence_interval.lower, stats.confidence_interval.upper
    );

    println!("\n   Convergence (every 5th trial):");
    for point in convergence_series(guard.config(), guard.log(), stats.p)
        .iter()
        .filter(|p| p.trial % 5 == 0)
    {
        println!(
            "   trial {:>2}: observed {:.3} vs {:.3}",
            point.trial, point.observed_probability, point.theoretical_probability
        );
    }

    println!("\n   Success dice per trial:");
    for bin in success_histogram(guard.config(), guard.log()) {
        println!(
            "   {} -> {:>2} trials ({:.3} observed, {:.3} expected)",
            bin.successes, bin.frequency, bin.observed_share, bin.theoretical_share
        );
    }

    if let Some(summary) = convergence_summary(guard.config(), guard.log(), stats.p) {
        println!(
            "   max diff {:.3}, min diff {:.3}, most frequent {}, std dev {:.3}",
            summary.max_difference,
            summary.min_difference,
            summary.most_frequent_successes,
            summary.success_std_dev
        );
    }

    // -------------------------------------------------------------------------
    // 4. Export
    // -------------------------------------------------------------------------
    println!("\n4. Export as {}", default_file_name(Utc::now().date_naive()));
    let csv = to_csv(guard.log(), Some(&stats))?;
    println!("{}", csv.lines().take(4).collect::<Vec<_>>().join("\n"));
    println!("   ...");

    let json = ExportableStatistics::from(&stats).to_json()?;
    println!("\n   JSON payload: {} bytes", json.len());

    Ok(())
}
