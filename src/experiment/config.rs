//! Experiment Configuration - dice count, success faces, trial target

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of faces on a die.
pub const FACES: u8 = 6;

/// Largest supported number of dice per trial.
pub const MAX_DICE: u8 = 6;

/// Set of face values that count as a success for one die.
///
/// Always non-empty, every member in `[1, 6]`, duplicates collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct SuccessFaces(BTreeSet<u8>);

impl SuccessFaces {
    /// Create a face set from any collection of values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the set is empty or a value is outside `[1, 6]`.
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Result<Self> {
        let set: BTreeSet<u8> = faces.into_iter().collect();
        if set.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one success face is required".to_string(),
            ));
        }
        if let Some(bad) = set.iter().find(|&&f| !(1..=FACES).contains(&f)) {
            return Err(Error::InvalidConfig(format!(
                "success face {bad} is outside 1..={FACES}"
            )));
        }
        Ok(Self(set))
    }

    /// Parse comma-separated criteria such as `"5, 6"`.
    ///
    /// Whitespace around tokens is ignored, empty tokens are skipped and
    /// repeated values collapse.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCriteria` for a non-numeric token and `InvalidConfig`
    /// when the resulting set is empty or out of range.
    pub fn parse(criteria: &str) -> Result<Self> {
        let mut faces = Vec::new();
        for token in criteria.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let face = token
                .parse::<u8>()
                .map_err(|_| Error::InvalidCriteria(format!("'{token}' is not a face value")))?;
            faces.push(face);
        }
        Self::new(faces)
    }

    /// Whether `value` is a success face.
    #[must_use]
    pub fn contains(&self, value: u8) -> bool {
        self.0.contains(&value)
    }

    /// Number of distinct success faces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; kept for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the faces in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    /// Probability that a single fair die lands on a success face: `|faces| / 6`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn per_die_probability(&self) -> f64 {
        self.0.len() as f64 / f64::from(FACES)
    }
}

impl TryFrom<Vec<u8>> for SuccessFaces {
    type Error = Error;

    fn try_from(faces: Vec<u8>) -> Result<Self> {
        Self::new(faces)
    }
}

impl From<SuccessFaces> for Vec<u8> {
    fn from(faces: SuccessFaces) -> Self {
        faces.0.into_iter().collect()
    }
}

impl fmt::Display for SuccessFaces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", joined.join(","))
    }
}

/// What counts as one success in the binomial model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuccessEvent {
    /// A trial succeeds when at least one die shows a success face.
    ///
    /// `n = trialTarget`, `p = 1 - (1 - p_die)^diceCount`.
    #[default]
    AnyDie,
    /// Every die is its own Bernoulli trial.
    ///
    /// `n = trialTarget * diceCount`, `p = p_die`.
    PerDie,
}

/// Validated experiment configuration.
///
/// Construct through [`ExperimentConfig::new`], the builder, or serde; every
/// path runs the same validation so downstream code never re-checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawExperimentConfig", rename_all = "camelCase")]
pub struct ExperimentConfig {
    dice_count: u8,
    success_faces: SuccessFaces,
    trial_target: u32,
    success_event: SuccessEvent,
}

impl ExperimentConfig {
    /// Create a configuration using the default success event (at least one die).
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `dice_count` is outside `[1, 6]` or
    /// `trial_target` is zero.
    pub fn new(dice_count: u8, success_faces: SuccessFaces, trial_target: u32) -> Result<Self> {
        Self::builder()
            .dice_count(dice_count)
            .success_faces(success_faces)
            .trial_target(trial_target)
            .build()
    }

    /// Create a configuration builder seeded with the defaults.
    #[must_use]
    pub fn builder() -> ExperimentConfigBuilder {
        ExperimentConfigBuilder::default()
    }

    /// Number of dice rolled per trial.
    #[must_use]
    pub const fn dice_count(&self) -> u8 {
        self.dice_count
    }

    /// Faces counting as a success.
    #[must_use]
    pub const fn success_faces(&self) -> &SuccessFaces {
        &self.success_faces
    }

    /// Planned number of trials.
    #[must_use]
    pub const fn trial_target(&self) -> u32 {
        self.trial_target
    }

    /// Success event definition used by the binomial model.
    #[must_use]
    pub const fn success_event(&self) -> SuccessEvent {
        self.success_event
    }

    /// Probability that one die lands on a success face.
    #[must_use]
    pub fn per_die_probability(&self) -> f64 {
        self.success_faces.per_die_probability()
    }

    /// Probability that a trial has at least one success die.
    #[must_use]
    pub fn any_die_probability(&self) -> f64 {
        1.0 - (1.0 - self.per_die_probability()).powi(i32::from(self.dice_count))
    }

    /// Copy of this configuration with a different trial target.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `trial_target` is zero.
    pub fn with_trial_target(&self, trial_target: u32) -> Result<Self> {
        validate_trial_target(trial_target)?;
        Ok(Self {
            trial_target,
            ..self.clone()
        })
    }

    /// Whether `other` produces trial records comparable with this one.
    #[must_use]
    pub fn same_trial_shape(&self, other: &Self) -> bool {
        self.dice_count == other.dice_count && self.success_faces == other.success_faces
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            dice_count: 2,
            success_faces: SuccessFaces(BTreeSet::from([6])),
            trial_target: 100,
            success_event: SuccessEvent::AnyDie,
        }
    }
}

/// Wire form of [`ExperimentConfig`], validated on conversion.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExperimentConfig {
    dice_count: u8,
    success_faces: SuccessFaces,
    trial_target: u32,
    #[serde(default)]
    success_event: SuccessEvent,
}

impl TryFrom<RawExperimentConfig> for ExperimentConfig {
    type Error = Error;

    fn try_from(raw: RawExperimentConfig) -> Result<Self> {
        Self::builder()
            .dice_count(raw.dice_count)
            .success_faces(raw.success_faces)
            .trial_target(raw.trial_target)
            .success_event(raw.success_event)
            .build()
    }
}

/// Builder for `ExperimentConfig`.
#[derive(Debug, Clone)]
pub struct ExperimentConfigBuilder {
    dice_count: u8,
    success_faces: SuccessFaces,
    trial_target: u32,
    success_event: SuccessEvent,
}

impl Default for ExperimentConfigBuilder {
    fn default() -> Self {
        let defaults = ExperimentConfig::default();
        Self {
            dice_count: defaults.dice_count,
            success_faces: defaults.success_faces,
            trial_target: defaults.trial_target,
            success_event: defaults.success_event,
        }
    }
}

impl ExperimentConfigBuilder {
    /// Set the number of dice per trial.
    #[must_use]
    pub const fn dice_count(mut self, dice_count: u8) -> Self {
        self.dice_count = dice_count;
        self
    }

    /// Set the success faces.
    #[must_use]
    pub fn success_faces(mut self, success_faces: SuccessFaces) -> Self {
        self.success_faces = success_faces;
        self
    }

    /// Set the planned number of trials.
    #[must_use]
    pub const fn trial_target(mut self, trial_target: u32) -> Self {
        self.trial_target = trial_target;
        self
    }

    /// Set the success event definition.
    #[must_use]
    pub const fn success_event(mut self, success_event: SuccessEvent) -> Self {
        self.success_event = success_event;
        self
    }

    /// Build the `ExperimentConfig`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `dice_count` is outside `[1, 6]` or
    /// `trial_target` is zero.
    pub fn build(self) -> Result<ExperimentConfig> {
        if !(1..=MAX_DICE).contains(&self.dice_count) {
            return Err(Error::InvalidConfig(format!(
                "dice count {} is outside 1..={MAX_DICE}",
                self.dice_count
            )));
        }
        validate_trial_target(self.trial_target)?;
        Ok(ExperimentConfig {
            dice_count: self.dice_count,
            success_faces: self.success_faces,
            trial_target: self.trial_target,
            success_event: self.success_event,
        })
    }
}

fn validate_trial_target(trial_target: u32) -> Result<()> {
    if trial_target == 0 {
        return Err(Error::InvalidConfig(
            "trial target must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Named starting configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    /// Display name.
    pub name: &'static str,
    /// Configuration the preset applies.
    pub config: ExperimentConfig,
}

/// The canonical preset configurations, simplest first.
#[must_use]
pub fn presets() -> Vec<Preset> {
    let preset = |name, dice_count, faces: &[u8], trial_target| Preset {
        name,
        config: ExperimentConfig {
            dice_count,
            success_faces: SuccessFaces(faces.iter().copied().collect()),
            trial_target,
            success_event: SuccessEvent::AnyDie,
        },
    };
    vec![
        preset("single die, 6", 1, &[6], 50),
        preset("two dice, 6", 2, &[6], 100),
        preset("two dice, high numbers (5-6)", 2, &[5, 6], 100),
        preset("three dice, 4-6", 3, &[4, 5, 6], 150),
    ]
}
