//! Trial Record - one completed roll of the configured dice

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{count_successes, SuccessEvent, SuccessFaces};

/// Trial Record represents a single completed trial.
///
/// Created exactly once when all dice have settled and never mutated
/// afterwards. The success count is evaluated at creation time against the
/// success faces in force at that moment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrialRecord {
    index: u32,
    dice_values: Vec<u8>,
    success_count: u8,
    recorded_at: DateTime<Utc>,
}

impl TrialRecord {
    pub(crate) fn new(
        index: u32,
        dice_values: Vec<u8>,
        success_faces: &SuccessFaces,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        let success_count = count_successes(&dice_values, success_faces);
        Self {
            index,
            dice_values,
            success_count,
            recorded_at,
        }
    }

    /// 1-based trial number.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Face values in roll order.
    #[must_use]
    pub fn dice_values(&self) -> &[u8] {
        &self.dice_values
    }

    /// Number of dice showing a success face.
    #[must_use]
    pub const fn success_count(&self) -> u8 {
        self.success_count
    }

    /// When the trial completed.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Whether at least one die succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success_count > 0
    }

    /// Successes this trial contributes under `event`.
    #[must_use]
    pub fn successes_for(&self, event: SuccessEvent) -> u64 {
        match event {
            SuccessEvent::AnyDie => u64::from(self.is_success()),
            SuccessEvent::PerDie => u64::from(self.success_count),
        }
    }

    /// Bernoulli trials this record contributes under `event`.
    #[must_use]
    pub fn trials_for(&self, event: SuccessEvent) -> u64 {
        match event {
            SuccessEvent::AnyDie => 1,
            SuccessEvent::PerDie => self.dice_values.len() as u64,
        }
    }
}
