//! Deferred dice roll
//!
//! A roll takes a randomized settle time (2-3 s by default) before its record
//! lands in the log. The roll runs on a spawned Tokio task, so dropping the
//! returned [`RollHandle`] does not cancel it: once started, a roll always
//! appends exactly one record.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::{Arc, Mutex};
//! use dice_lab::experiment::ExperimentSession;
//! use dice_lab::roll::{DiceRoller, RollTiming};
//!
//! # async fn example() -> dice_lab::Result<()> {
//! let session = Arc::new(Mutex::new(ExperimentSession::default()));
//! let mut roller = DiceRoller::new(RollTiming::default());
//!
//! let record = roller.roll(&session)?.settled().await?;
//! assert_eq!(record.index(), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::experiment::{roll_dice, ExperimentSession, TrialRecord};
use crate::{Error, Result};

/// Session shared between the caller and in-flight rolls.
pub type SharedSession = Arc<Mutex<ExperimentSession>>;

/// Settle time of a roll: `base + U[0, 1) · jitter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollTiming {
    base: Duration,
    jitter: Duration,
}

impl RollTiming {
    /// Create a timing with a fixed part and a random extra.
    #[must_use]
    pub const fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    /// Settle immediately.
    #[must_use]
    pub const fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Fixed part of the delay.
    #[must_use]
    pub const fn base(&self) -> Duration {
        self.base
    }

    /// Upper bound of the random extra.
    #[must_use]
    pub const fn jitter(&self) -> Duration {
        self.jitter
    }

    /// Draw one settle time.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        self.base + self.jitter.mul_f64(rng.gen::<f64>())
    }
}

impl Default for RollTiming {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000), Duration::from_millis(1000))
    }
}

/// Starts deferred rolls on a shared session.
#[derive(Debug)]
pub struct DiceRoller<R = StdRng> {
    rng: R,
    timing: RollTiming,
}

impl DiceRoller<StdRng> {
    /// Roller seeded from OS entropy.
    #[must_use]
    pub fn new(timing: RollTiming) -> Self {
        Self::with_rng(StdRng::from_entropy(), timing)
    }

    /// Reproducible roller.
    #[must_use]
    pub fn seeded(seed: u64, timing: RollTiming) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), timing)
    }
}

impl<R: Rng> DiceRoller<R> {
    /// Roller drawing from `rng`.
    #[must_use]
    pub const fn with_rng(rng: R, timing: RollTiming) -> Self {
        Self { rng, timing }
    }

    /// Settle-time configuration.
    #[must_use]
    pub const fn timing(&self) -> RollTiming {
        self.timing
    }

    /// Start a roll on `session`.
    ///
    /// The single-flight guard is set before this returns; the record is
    /// appended and the guard cleared when the settle time elapses.
    ///
    /// # Errors
    ///
    /// Returns `RollAborted` outside a Tokio runtime, `SessionPoisoned` if the
    /// lock is poisoned, and the refusals of
    /// [`ExperimentSession::begin_roll`].
    pub fn roll(&mut self, session: &SharedSession) -> Result<RollHandle> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::RollAborted(e.to_string()))?;

        let ticket = lock(session)?.begin_roll()?;
        let dice = roll_dice(&mut self.rng, ticket.dice_count());
        let delay = self.timing.sample(&mut self.rng);
        debug!(?delay, dice = ?dice, "roll started");

        let session = Arc::clone(session);
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let mut guard = lock(&session)?;
            let record = guard.complete_roll(ticket, dice)?.clone();
            Ok::<_, Error>(record)
        });
        Ok(RollHandle { handle })
    }
}

/// In-flight roll. Dropping it leaves the roll running.
#[derive(Debug)]
pub struct RollHandle {
    handle: JoinHandle<Result<TrialRecord>>,
}

impl RollHandle {
    /// Wait for the dice to settle and return the appended record.
    ///
    /// # Errors
    ///
    /// Returns `RollAborted` if the roll task panicked, or `SessionPoisoned`.
    pub async fn settled(self) -> Result<TrialRecord> {
        self.handle
            .await
            .map_err(|e| Error::RollAborted(e.to_string()))?
    }

    /// Whether the record has landed.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.handle.is_finished()
    }
}

fn lock(session: &SharedSession) -> Result<MutexGuard<'_, ExperimentSession>> {
    session.lock().map_err(|_| Error::SessionPoisoned)
}
