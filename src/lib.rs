//! # dice-lab: Binomial Dice Experiments
//!
//! **Version**: 0.1.0
//!
//! dice-lab runs a repeated dice-rolling experiment, keeps an append-only log
//! of every trial, and compares the observed success rate against the
//! closed-form binomial model as trials stream in.
//!
//! ## Components
//!
//! - **Trial Outcome Evaluator**: counts dice landing on a success face
//! - **Experiment Log**: ordered, append-only trial records
//! - **Binomial Statistics Engine**: PMF/CDF, moments, observed rate,
//!   95% confidence interval, convergence
//! - **Export**: CSV rows plus a versioned statistics schema
//!
//! Charts, panels and animation are left to the consumer, which reads the
//! [`stats::BinomialResult`] and the [`experiment::ExperimentLog`].
//!
//! ## Example Usage
//!
//! ```rust
//! use dice_lab::experiment::{ExperimentConfig, ExperimentSession, SuccessFaces};
//!
//! let config = ExperimentConfig::new(2, SuccessFaces::new([6])?, 100)?;
//! let mut session = ExperimentSession::new(config);
//!
//! for dice in [vec![6, 3], vec![2, 2], vec![6, 6]] {
//!     let ticket = session.begin_roll()?;
//!     session.complete_roll(ticket, dice)?;
//! }
//!
//! let stats = session.statistics();
//! assert_eq!(stats.observed_successes, 2);
//! assert!((stats.observed_probability - 2.0 / 3.0).abs() < 1e-12);
//! # Ok::<(), dice_lab::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod error;
pub mod experiment;
pub mod export;
#[cfg(feature = "tokio")]
pub mod roll;
pub mod stats;
pub mod telemetry;

pub use error::{Error, Result};
