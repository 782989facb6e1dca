//! Experiment Session - explicit owner of configuration, log and roll guard

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use tracing::{info, warn};

use super::{ExperimentConfig, ExperimentLog, TrialRecord, FACES};
use crate::stats::{self, BinomialResult};
use crate::{Error, Result};

/// Proof that a roll was started on a session.
///
/// Obtained from [`ExperimentSession::begin_roll`] and consumed by
/// [`ExperimentSession::complete_roll`], so every started roll appends
/// exactly one record. A ticket only settles on the session that issued it.
#[derive(Debug)]
#[must_use = "a started roll must be completed"]
pub struct RollTicket {
    session_id: u64,
    dice_count: u8,
}

impl RollTicket {
    /// Number of dice the roll must produce.
    #[must_use]
    pub const fn dice_count(&self) -> u8 {
        self.dice_count
    }
}

/// One running experiment.
///
/// Each session owns its config and log exclusively; independent sessions
/// never share state. Sessions are not `Clone`: a copy would share the roll
/// guard identity of its source.
#[derive(Debug)]
pub struct ExperimentSession {
    id: u64,
    config: ExperimentConfig,
    log: ExperimentLog,
    rolling: bool,
}

impl ExperimentSession {
    /// Create an empty session with the given configuration.
    #[must_use]
    pub fn new(config: ExperimentConfig) -> Self {
        Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            config,
            log: ExperimentLog::new(),
            rolling: false,
        }
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Recorded trials.
    #[must_use]
    pub const fn log(&self) -> &ExperimentLog {
        &self.log
    }

    /// Whether a roll is in flight.
    #[must_use]
    pub const fn is_rolling(&self) -> bool {
        self.rolling
    }

    /// `(completed trials, trial target)`.
    #[must_use]
    pub fn progress(&self) -> (u32, u32) {
        (self.log.current_trial(), self.config.trial_target())
    }

    /// Whether the trial target has been reached.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.log.current_trial() >= self.config.trial_target()
    }

    /// Start a roll, setting the single-flight guard.
    ///
    /// # Errors
    ///
    /// Returns `RollInProgress` if another roll has not settled yet and
    /// `TrialTargetReached` once the planned trials are done.
    pub fn begin_roll(&mut self) -> Result<RollTicket> {
        if self.rolling {
            warn!("roll refused: another roll is in flight");
            return Err(Error::RollInProgress);
        }
        if self.is_complete() {
            let target = self.config.trial_target();
            warn!(target, "roll refused: trial target reached");
            return Err(Error::TrialTargetReached { target });
        }
        self.rolling = true;
        Ok(RollTicket {
            session_id: self.id,
            dice_count: self.config.dice_count(),
        })
    }

    /// Settle a started roll: append the record and clear the guard.
    ///
    /// # Errors
    ///
    /// Returns `ForeignTicket` when `ticket` was issued by another session;
    /// this session is left untouched. Returns `InvalidRoll` when the number
    /// of dice differs from [`RollTicket::dice_count`]; the roll is then
    /// abandoned, nothing is appended and the guard is cleared.
    pub fn complete_roll(
        &mut self,
        ticket: RollTicket,
        dice_values: Vec<u8>,
    ) -> Result<&TrialRecord> {
        if ticket.session_id != self.id {
            warn!("roll refused: ticket issued by another session");
            return Err(Error::ForeignTicket);
        }
        self.rolling = false;
        if dice_values.len() != usize::from(ticket.dice_count) {
            warn!(
                expected = ticket.dice_count,
                got = dice_values.len(),
                "roll abandoned: wrong number of dice"
            );
            return Err(Error::InvalidRoll {
                expected: ticket.dice_count,
                got: dice_values.len(),
            });
        }
        Ok(self.log.append(dice_values, self.config.success_faces()))
    }

    /// Roll immediately with `rng`, skipping the settle delay.
    ///
    /// # Errors
    ///
    /// Same refusals as [`ExperimentSession::begin_roll`].
    pub fn roll_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&TrialRecord> {
        let ticket = self.begin_roll()?;
        let dice = roll_dice(rng, ticket.dice_count());
        self.complete_roll(ticket, dice)
    }

    /// Clear the log. An in-flight roll still lands afterwards as trial 1.
    pub fn reset(&mut self) {
        self.log.reset();
    }

    /// Replace the configuration.
    ///
    /// The log is cleared when the dice count or success faces change, since
    /// existing success counts were evaluated against the old faces.
    ///
    /// # Errors
    ///
    /// Returns `RollInProgress` while a roll is in flight.
    pub fn reconfigure(&mut self, config: ExperimentConfig) -> Result<()> {
        if self.rolling {
            warn!("reconfigure refused: roll in flight");
            return Err(Error::RollInProgress);
        }
        let cleared = !self.config.same_trial_shape(&config) && !self.log.is_empty();
        if cleared {
            self.log.reset();
        }
        info!(
            dice = config.dice_count(),
            faces = %config.success_faces(),
            target = config.trial_target(),
            cleared,
            "experiment reconfigured"
        );
        self.config = config;
        Ok(())
    }

    /// Derived binomial statistics for the current `(config, log)`.
    #[must_use]
    pub fn statistics(&self) -> BinomialResult {
        stats::analyze(&self.config, &self.log)
    }
}

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(0);

impl Default for ExperimentSession {
    fn default() -> Self {
        Self::new(ExperimentConfig::default())
    }
}

/// Draw `dice_count` fair dice.
pub fn roll_dice<R: Rng + ?Sized>(rng: &mut R, dice_count: u8) -> Vec<u8> {
    (0..dice_count).map(|_| rng.gen_range(1..=FACES)).collect()
}
