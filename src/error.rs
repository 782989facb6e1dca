//! Error types for dice-lab
//!
//! Every failure here is local and recoverable: configuration errors are fixed
//! by re-entering input, refused rolls by waiting, empty exports by rolling.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// dice-lab error types
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration violates the experiment constraints
    #[error("Invalid experiment configuration: {0}")]
    InvalidConfig(String),

    /// Success criteria text could not be parsed
    #[error("Invalid success criteria: {0}\nExpected comma-separated face values, e.g. \"5,6\"")]
    InvalidCriteria(String),

    /// Export requested before any trial was recorded
    #[error("No trials recorded yet, nothing to export")]
    EmptyExperiment,

    /// A roll is already in flight for this session
    #[error("A roll is already in progress\nWait for the dice to settle before rolling again")]
    RollInProgress,

    /// The planned number of trials has been reached
    #[error("Trial target of {target} reached\nReset the experiment or raise the target to keep rolling")]
    TrialTargetReached {
        /// Configured trial target
        target: u32,
    },

    /// Point probability requested for a k outside `[0, n]`
    #[error("k = {k} is out of range for n = {n} (expected 0 <= k <= n)")]
    OutOfRange {
        /// Requested success count
        k: u32,
        /// Number of binomial trials
        n: u32,
    },

    /// Roll ticket presented to a session that did not issue it
    #[error("Roll ticket belongs to a different session")]
    ForeignTicket,

    /// Settled roll does not match the dice the ticket was issued for
    #[error("Roll produced {got} dice, expected {expected}")]
    InvalidRoll {
        /// Dice count the ticket was issued for
        expected: u8,
        /// Dice actually supplied
        got: usize,
    },

    /// Shared session lock was poisoned by a panicking holder
    #[error("Experiment session lock poisoned")]
    SessionPoisoned,

    /// Deferred roll could not run to completion
    #[error("Roll aborted: {0}")]
    RollAborted(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
