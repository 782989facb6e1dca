//! Experiment Log - append-only sequence of trial records
//!
//! The log is the single source of truth for what happened. Statistics only
//! ever read it; the only mutators are [`ExperimentLog::append`] and a full
//! [`ExperimentLog::reset`].

use std::slice;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::{SuccessEvent, SuccessFaces, TrialRecord};

/// Separator between dice values in an exported row.
pub const DICE_SEPARATOR: &str = ";";

/// Ordered, append-only log of trials.
///
/// ## Invariants
///
/// - `records[i].index() == i + 1`, no gaps or duplicates
/// - `len() == current_trial()` at all times
#[derive(Debug, Default, Clone, Serialize)]
pub struct ExperimentLog {
    records: Vec<TrialRecord>,
}

impl ExperimentLog {
    /// Create a new empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed trial stamped with the current time.
    ///
    /// Evaluates the success count, assigns the next index and returns the
    /// stored record.
    pub fn append(&mut self, dice_values: Vec<u8>, success_faces: &SuccessFaces) -> &TrialRecord {
        self.append_at(dice_values, success_faces, Utc::now())
    }

    /// Record a completed trial with an explicit timestamp.
    pub fn append_at(
        &mut self,
        dice_values: Vec<u8>,
        success_faces: &SuccessFaces,
        recorded_at: DateTime<Utc>,
    ) -> &TrialRecord {
        let index = self.next_index();
        let record = TrialRecord::new(index, dice_values, success_faces, recorded_at);
        debug!(
            trial = record.index(),
            dice = ?record.dice_values(),
            successes = record.success_count(),
            "trial recorded"
        );
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Clear every record; the next append is trial 1 again.
    pub fn reset(&mut self) {
        info!(cleared = self.records.len(), "experiment log reset");
        self.records.clear();
    }

    /// Number of recorded trials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no trial has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the last completed trial (0 when empty).
    #[must_use]
    pub fn current_trial(&self) -> u32 {
        self.records.last().map_or(0, TrialRecord::index)
    }

    /// All records in trial order.
    #[must_use]
    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    /// Iterate records in trial order.
    pub fn iter(&self) -> slice::Iter<'_, TrialRecord> {
        self.records.iter()
    }

    /// Most recent record, if any.
    #[must_use]
    pub fn last(&self) -> Option<&TrialRecord> {
        self.records.last()
    }

    /// Total successes under `event`.
    #[must_use]
    pub fn successes(&self, event: SuccessEvent) -> u64 {
        self.records.iter().map(|r| r.successes_for(event)).sum()
    }

    /// Total Bernoulli trials observed under `event`.
    #[must_use]
    pub fn bernoulli_trials(&self, event: SuccessEvent) -> u64 {
        self.records.iter().map(|r| r.trials_for(event)).sum()
    }

    /// Flat rows for CSV-style export.
    ///
    /// The iterator is lazy and borrows the log; call again to restart.
    #[must_use]
    pub fn export_rows(&self) -> ExportRows<'_> {
        ExportRows {
            inner: self.records.iter(),
        }
    }

    fn next_index(&self) -> u32 {
        self.current_trial() + 1
    }
}

impl<'a> IntoIterator for &'a ExperimentLog {
    type Item = &'a TrialRecord;
    type IntoIter = slice::Iter<'a, TrialRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// One flat export row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    /// 1-based trial number.
    pub index: u32,
    /// Dice values joined by [`DICE_SEPARATOR`].
    pub results: String,
    /// Success dice in the trial.
    pub successes: u8,
    /// Completion time.
    pub timestamp: DateTime<Utc>,
}

impl From<&TrialRecord> for ExportRow {
    fn from(record: &TrialRecord) -> Self {
        let results: Vec<String> = record
            .dice_values()
            .iter()
            .map(ToString::to_string)
            .collect();
        Self {
            index: record.index(),
            results: results.join(DICE_SEPARATOR),
            successes: record.success_count(),
            timestamp: record.recorded_at(),
        }
    }
}

/// Lazy iterator over [`ExportRow`]s.
#[derive(Debug, Clone)]
pub struct ExportRows<'a> {
    inner: slice::Iter<'a, TrialRecord>,
}

impl Iterator for ExportRows<'_> {
    type Item = ExportRow;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(ExportRow::from)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ExportRows<'_> {}
