//! Dice Experiment Model
//!
//! Configuration, trial evaluation and the append-only experiment log.
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentSession ──┬── ExperimentConfig (dice, success faces, target)
//!                     └── ExperimentLog ──< TrialRecord (N) [append-only]
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use dice_lab::experiment::{ExperimentConfig, ExperimentSession, SuccessFaces};
//!
//! let config = ExperimentConfig::new(2, SuccessFaces::parse("6")?, 100)?;
//! let mut session = ExperimentSession::new(config);
//!
//! // Settle a roll with known dice
//! let ticket = session.begin_roll()?;
//! let record = session.complete_roll(ticket, vec![6, 3])?;
//! assert_eq!(record.index(), 1);
//! assert_eq!(record.success_count(), 1);
//!
//! let stats = session.statistics();
//! assert_eq!(stats.total_trials, 1);
//! # Ok::<(), dice_lab::Error>(())
//! ```

mod config;
mod log;
mod outcome;
mod session;
mod trial_record;

pub use config::{
    presets, ExperimentConfig, ExperimentConfigBuilder, Preset, SuccessEvent, SuccessFaces,
    FACES, MAX_DICE,
};
pub use log::{ExperimentLog, ExportRow, ExportRows, DICE_SEPARATOR};
pub use outcome::count_successes;
pub use session::{roll_dice, ExperimentSession, RollTicket};
pub use trial_record::TrialRecord;
