//! Dense tabular POMDP.
//!
//! Transition and observation probabilities are stored as dense nested tables
//! (`T[s][a][s']`, `O[a][s'][z]`); entries that were never set are zero.
//! Rewards are stored sparsely in a [`RewardTable`] whose keys may leave any
//! component as a wildcard, so `R(*, listen, *, *) = -1` covers every state,
//! successor and observation at once.
//!
//! # JSON format
//!
//! ```text
//! {
//!   "num_states": 2, "num_actions": 1, "num_observations": 1,
//!   "horizon": { "kind": "infinite", "discount": 0.9 },
//!   "transitions": [[[1.0, 0.0]], [[0.0, 1.0]]],
//!   "observations": [[[1.0], [1.0]]],
//!   "rewards": [ { "value": 0.0 }, { "state": 1, "value": 1.0 } ]
//! }
//! ```
//!
//! Reward entries omit the components that are wildcards.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::entity::EntityLabel;
use crate::pomdp::belief::PROBABILITY_TOLERANCE;
use crate::pomdp::model::{check_shape, Horizon, ModelError, Pomdp};

/// One component of a reward key: a concrete index or a wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// Matches every index.
    Any,
    /// Matches exactly this index.
    Is(usize),
}

impl Slot {
    fn index(&self) -> Option<usize> {
        match self {
            Slot::Any => None,
            Slot::Is(i) => Some(*i),
        }
    }
}

impl From<Option<usize>> for Slot {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Slot::Any, Slot::Is)
    }
}

/// Key of a reward entry `R(s, a, s', z)` with optional wildcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RewardKey {
    /// Source state.
    pub state: Slot,
    /// Action taken.
    pub action: Slot,
    /// Successor state.
    pub next_state: Slot,
    /// Observation received.
    pub observation: Slot,
}

impl RewardKey {
    /// The key that matches everything.
    pub fn any() -> Self {
        Self {
            state: Slot::Any,
            action: Slot::Any,
            next_state: Slot::Any,
            observation: Slot::Any,
        }
    }

    /// A fully specified key.
    pub fn exact(state: usize, action: usize, next_state: usize, observation: usize) -> Self {
        Self {
            state: Slot::Is(state),
            action: Slot::Is(action),
            next_state: Slot::Is(next_state),
            observation: Slot::Is(observation),
        }
    }

    /// Builder method: fix the source state.
    pub fn with_state(mut self, state: usize) -> Self {
        self.state = Slot::Is(state);
        self
    }

    /// Builder method: fix the action.
    pub fn with_action(mut self, action: usize) -> Self {
        self.action = Slot::Is(action);
        self
    }

    /// Builder method: fix the successor state.
    pub fn with_next_state(mut self, next_state: usize) -> Self {
        self.next_state = Slot::Is(next_state);
        self
    }

    /// Builder method: fix the observation.
    pub fn with_observation(mut self, observation: usize) -> Self {
        self.observation = Slot::Is(observation);
        self
    }

    /// The key for a concrete query restricted to the components in `mask`
    /// (action 8, state 4, successor 2, observation 1).
    fn masked(mask: u8, state: usize, action: usize, next_state: usize, observation: usize) -> Self {
        let pick = |bit: u8, index: usize| {
            if mask & bit != 0 {
                Slot::Is(index)
            } else {
                Slot::Any
            }
        };
        Self {
            state: pick(4, state),
            action: pick(8, action),
            next_state: pick(2, next_state),
            observation: pick(1, observation),
        }
    }
}

/// Masks in lookup order: more specified components first; among keys with
/// the same count, the action is the most significant component, then the
/// state, successor and observation.
const SPECIFICITY_ORDER: [u8; 16] = [15, 14, 13, 11, 7, 12, 10, 9, 6, 5, 3, 8, 4, 2, 1, 0];

/// A reward entry as written to JSON. Absent components are wildcards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardEntry {
    /// Source state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<usize>,
    /// Action taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<usize>,
    /// Successor state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_state: Option<usize>,
    /// Observation received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<usize>,
    /// Reward value.
    pub value: f64,
}

/// Sparse reward function with wildcard keys.
///
/// A lookup returns the value of the most specific matching entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<RewardEntry>", into = "Vec<RewardEntry>")]
pub struct RewardTable {
    entries: FxHashMap<RewardKey, f64>,
}

impl RewardTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry.
    pub fn set(&mut self, key: RewardKey, value: f64) {
        self.entries.insert(key, value);
    }

    /// Value of the most specific entry matching `R(s, a, s', z)`.
    pub fn get(&self, state: usize, action: usize, next_state: usize, observation: usize) -> Option<f64> {
        SPECIFICITY_ORDER.iter().find_map(|&mask| {
            let key = RewardKey::masked(mask, state, action, next_state, observation);
            self.entries.get(&key).copied()
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by key.
    pub fn entries(&self) -> Vec<(RewardKey, f64)> {
        let mut entries: Vec<(RewardKey, f64)> = self.entries.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Smallest stored value, or 0 for an empty table.
    pub fn min(&self) -> f64 {
        self.entries.values().copied().reduce(f64::min).unwrap_or(0.0)
    }

    /// Largest stored value, or 0 for an empty table.
    pub fn max(&self) -> f64 {
        self.entries.values().copied().reduce(f64::max).unwrap_or(0.0)
    }
}

impl From<Vec<RewardEntry>> for RewardTable {
    fn from(entries: Vec<RewardEntry>) -> Self {
        let mut table = RewardTable::new();
        for entry in entries {
            let key = RewardKey {
                state: entry.state.into(),
                action: entry.action.into(),
                next_state: entry.next_state.into(),
                observation: entry.observation.into(),
            };
            table.set(key, entry.value);
        }
        table
    }
}

impl From<RewardTable> for Vec<RewardEntry> {
    fn from(table: RewardTable) -> Self {
        table
            .entries()
            .into_iter()
            .map(|(key, value)| RewardEntry {
                state: key.state.index(),
                action: key.action.index(),
                next_state: key.next_state.index(),
                observation: key.observation.index(),
                value,
            })
            .collect()
    }
}

/// Errors from loading a model file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read model: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid model document.
    #[error("failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),

    /// The model parsed but is not a valid POMDP.
    #[error("invalid model: {0}")]
    Invalid(#[from] ModelError),
}

/// A POMDP stored as dense probability tables and a sparse reward table.
///
/// # Example
/// ```
/// use pbvi_solver::models::tabular::{RewardKey, TabularPomdp};
/// use pbvi_solver::pomdp::{Horizon, Pomdp};
///
/// let mut model = TabularPomdp::new(2, 1, 1, Horizon::infinite(0.9));
/// model.set_transition_row(0, 0, &[1.0, 0.0]).unwrap();
/// model.set_transition_row(1, 0, &[0.0, 1.0]).unwrap();
/// model.set_observation_row(0, 0, &[1.0]).unwrap();
/// model.set_observation_row(0, 1, &[1.0]).unwrap();
/// model.set_reward(RewardKey::any(), 0.0);
/// model.set_reward(RewardKey::any().with_state(1), 1.0);
///
/// assert!(model.validate().is_ok());
/// assert_eq!(model.reward(1, 0, 1, 0), Some(1.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularPomdp {
    num_states: usize,
    num_actions: usize,
    num_observations: usize,
    horizon: Horizon,
    /// `transitions[s][a][s']`
    transitions: Vec<Vec<Vec<f64>>>,
    /// `observations[a][s'][z]`
    observations: Vec<Vec<Vec<f64>>>,
    rewards: RewardTable,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    state_labels: Vec<EntityLabel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    action_labels: Vec<EntityLabel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    observation_labels: Vec<EntityLabel>,
}

impl TabularPomdp {
    /// Create a model with all probabilities zero and no rewards.
    pub fn new(num_states: usize, num_actions: usize, num_observations: usize, horizon: Horizon) -> Self {
        Self {
            num_states,
            num_actions,
            num_observations,
            horizon,
            transitions: vec![vec![vec![0.0; num_states]; num_actions]; num_states],
            observations: vec![vec![vec![0.0; num_observations]; num_states]; num_actions],
            rewards: RewardTable::new(),
            state_labels: Vec::new(),
            action_labels: Vec::new(),
            observation_labels: Vec::new(),
        }
    }

    /// Build a model from complete tables without validating them.
    pub(crate) fn from_tables(
        horizon: Horizon,
        transitions: Vec<Vec<Vec<f64>>>,
        observations: Vec<Vec<Vec<f64>>>,
        rewards: RewardTable,
    ) -> Self {
        let num_states = transitions.len();
        let num_actions = observations.len();
        let num_observations = observations
            .first()
            .and_then(|rows| rows.first())
            .map_or(0, Vec::len);

        Self {
            num_states,
            num_actions,
            num_observations,
            horizon,
            transitions,
            observations,
            rewards,
            state_labels: Vec::new(),
            action_labels: Vec::new(),
            observation_labels: Vec::new(),
        }
    }

    fn check_index(kind: &'static str, index: usize, len: usize) -> Result<(), ModelError> {
        if index >= len {
            return Err(ModelError::IndexOutOfRange { kind, index, len });
        }
        Ok(())
    }

    fn check_probability(what: &'static str, value: f64) -> Result<(), ModelError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ModelError::InvalidProbability { what, value });
        }
        Ok(())
    }

    /// Set `T(s, a, s')`.
    pub fn set_transition(
        &mut self,
        state: usize,
        action: usize,
        next_state: usize,
        probability: f64,
    ) -> Result<(), ModelError> {
        Self::check_index("state", state, self.num_states)?;
        Self::check_index("action", action, self.num_actions)?;
        Self::check_index("state", next_state, self.num_states)?;
        Self::check_probability("transition", probability)?;
        self.transitions[state][action][next_state] = probability;
        Ok(())
    }

    /// Set the whole distribution `T(s, a, ·)`.
    pub fn set_transition_row(&mut self, state: usize, action: usize, row: &[f64]) -> Result<(), ModelError> {
        Self::check_index("state", state, self.num_states)?;
        Self::check_index("action", action, self.num_actions)?;
        if row.len() != self.num_states {
            return Err(ModelError::DimensionMismatch {
                what: "transition row",
                expected: self.num_states,
                found: row.len(),
            });
        }
        for &p in row {
            Self::check_probability("transition", p)?;
        }
        self.transitions[state][action].copy_from_slice(row);
        Ok(())
    }

    /// Set `O(a, s', z)`.
    pub fn set_observation(
        &mut self,
        action: usize,
        next_state: usize,
        observation: usize,
        probability: f64,
    ) -> Result<(), ModelError> {
        Self::check_index("action", action, self.num_actions)?;
        Self::check_index("state", next_state, self.num_states)?;
        Self::check_index("observation", observation, self.num_observations)?;
        Self::check_probability("observation", probability)?;
        self.observations[action][next_state][observation] = probability;
        Ok(())
    }

    /// Set the whole distribution `O(a, s', ·)`.
    pub fn set_observation_row(&mut self, action: usize, next_state: usize, row: &[f64]) -> Result<(), ModelError> {
        Self::check_index("action", action, self.num_actions)?;
        Self::check_index("state", next_state, self.num_states)?;
        if row.len() != self.num_observations {
            return Err(ModelError::DimensionMismatch {
                what: "observation row",
                expected: self.num_observations,
                found: row.len(),
            });
        }
        for &p in row {
            Self::check_probability("observation", p)?;
        }
        self.observations[action][next_state].copy_from_slice(row);
        Ok(())
    }

    /// Insert or replace a reward entry. Out-of-range keys are reported by
    /// [`validate`](Self::validate).
    pub fn set_reward(&mut self, key: RewardKey, value: f64) {
        self.rewards.set(key, value);
    }

    /// The reward table.
    pub fn rewards(&self) -> &RewardTable {
        &self.rewards
    }

    /// Replace the horizon.
    pub fn set_horizon(&mut self, horizon: Horizon) {
        self.horizon = horizon;
    }

    /// Set state labels, one per state.
    pub fn set_state_labels(&mut self, labels: Vec<EntityLabel>) -> Result<(), ModelError> {
        Self::check_labels("state labels", &labels, self.num_states)?;
        self.state_labels = labels;
        Ok(())
    }

    /// Set action labels, one per action.
    pub fn set_action_labels(&mut self, labels: Vec<EntityLabel>) -> Result<(), ModelError> {
        Self::check_labels("action labels", &labels, self.num_actions)?;
        self.action_labels = labels;
        Ok(())
    }

    /// Set observation labels, one per observation.
    pub fn set_observation_labels(&mut self, labels: Vec<EntityLabel>) -> Result<(), ModelError> {
        Self::check_labels("observation labels", &labels, self.num_observations)?;
        self.observation_labels = labels;
        Ok(())
    }

    /// Set all labels of a model built from tables whose shape is known.
    pub(crate) fn label_all(
        &mut self,
        states: Vec<EntityLabel>,
        actions: Vec<EntityLabel>,
        observations: Vec<EntityLabel>,
    ) {
        self.state_labels = states;
        self.action_labels = actions;
        self.observation_labels = observations;
    }

    fn check_labels(what: &'static str, labels: &[EntityLabel], expected: usize) -> Result<(), ModelError> {
        if !labels.is_empty() && labels.len() != expected {
            return Err(ModelError::DimensionMismatch {
                what,
                expected,
                found: labels.len(),
            });
        }
        Ok(())
    }

    /// Check that the model is a well-formed POMDP.
    ///
    /// Verifies the shape and horizon, table dimensions, probability ranges,
    /// that every `T(s, a, ·)` and `O(a, s', ·)` sums to one, and that every
    /// reward key is in range.
    pub fn validate(&self) -> Result<(), ModelError> {
        check_shape(self)?;
        self.validate_dimensions()?;

        for (s, per_action) in self.transitions.iter().enumerate() {
            for (a, row) in per_action.iter().enumerate() {
                Self::validate_row("transition", row, || format!("T({}, {}, ·)", s, a))?;
            }
        }

        for (a, per_state) in self.observations.iter().enumerate() {
            for (sp, row) in per_state.iter().enumerate() {
                Self::validate_row("observation", row, || format!("O({}, {}, ·)", a, sp))?;
            }
        }

        for (key, _) in self.rewards.entries() {
            let slots = [
                ("state", key.state, self.num_states),
                ("action", key.action, self.num_actions),
                ("state", key.next_state, self.num_states),
                ("observation", key.observation, self.num_observations),
            ];
            for (kind, slot, len) in slots {
                if let Some(index) = slot.index() {
                    Self::check_index(kind, index, len)?;
                }
            }
        }

        Self::check_labels("state labels", &self.state_labels, self.num_states)?;
        Self::check_labels("action labels", &self.action_labels, self.num_actions)?;
        Self::check_labels("observation labels", &self.observation_labels, self.num_observations)?;

        Ok(())
    }

    fn validate_dimensions(&self) -> Result<(), ModelError> {
        let mismatch = |what, expected, found| ModelError::DimensionMismatch { what, expected, found };

        if self.transitions.len() != self.num_states {
            return Err(mismatch("transition table", self.num_states, self.transitions.len()));
        }
        for per_action in &self.transitions {
            if per_action.len() != self.num_actions {
                return Err(mismatch("transition table", self.num_actions, per_action.len()));
            }
            for row in per_action {
                if row.len() != self.num_states {
                    return Err(mismatch("transition row", self.num_states, row.len()));
                }
            }
        }

        if self.observations.len() != self.num_actions {
            return Err(mismatch("observation table", self.num_actions, self.observations.len()));
        }
        for per_state in &self.observations {
            if per_state.len() != self.num_states {
                return Err(mismatch("observation table", self.num_states, per_state.len()));
            }
            for row in per_state {
                if row.len() != self.num_observations {
                    return Err(mismatch("observation row", self.num_observations, row.len()));
                }
            }
        }

        Ok(())
    }

    fn validate_row(what: &'static str, row: &[f64], describe: impl Fn() -> String) -> Result<(), ModelError> {
        for &p in row {
            Self::check_probability(what, p)?;
        }
        let sum: f64 = row.iter().sum();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(ModelError::InvalidDistribution { what: describe(), sum });
        }
        Ok(())
    }

    /// Parse a model from a JSON string and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Load and validate a model from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        let model: Self = serde_json::from_reader(BufReader::new(file))?;
        model.validate()?;
        Ok(model)
    }

    /// Write the model as pretty-printed JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

impl Pomdp for TabularPomdp {
    fn num_states(&self) -> usize {
        self.num_states
    }

    fn num_actions(&self) -> usize {
        self.num_actions
    }

    fn num_observations(&self) -> usize {
        self.num_observations
    }

    fn transition(&self, state: usize, action: usize, next_state: usize) -> Option<f64> {
        self.transitions.get(state)?.get(action)?.get(next_state).copied()
    }

    fn observation(&self, action: usize, next_state: usize, observation: usize) -> Option<f64> {
        self.observations.get(action)?.get(next_state)?.get(observation).copied()
    }

    fn reward(&self, state: usize, action: usize, next_state: usize, observation: usize) -> Option<f64> {
        self.rewards.get(state, action, next_state, observation)
    }

    fn horizon(&self) -> Horizon {
        self.horizon
    }

    fn reward_min(&self) -> f64 {
        self.rewards.min()
    }

    fn reward_max(&self) -> f64 {
        self.rewards.max()
    }

    fn state_name(&self, state: usize) -> String {
        self.state_labels
            .get(state)
            .map_or_else(|| format!("s{}", state), ToString::to_string)
    }

    fn action_name(&self, action: usize) -> String {
        self.action_labels
            .get(action)
            .map_or_else(|| format!("a{}", action), ToString::to_string)
    }

    fn observation_name(&self, observation: usize) -> String {
        self.observation_labels
            .get(observation)
            .map_or_else(|| format!("z{}", observation), ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_model() -> TabularPomdp {
        let mut model = TabularPomdp::new(2, 2, 2, Horizon::infinite(0.9));
        for a in 0..2 {
            model.set_transition_row(0, a, &[1.0, 0.0]).unwrap();
            model.set_transition_row(1, a, &[0.0, 1.0]).unwrap();
            model.set_observation_row(a, 0, &[0.5, 0.5]).unwrap();
            model.set_observation_row(a, 1, &[0.5, 0.5]).unwrap();
        }
        model.set_reward(RewardKey::any(), 0.0);
        model
    }

    #[test]
    fn test_wildcard_precedence() {
        let mut table = RewardTable::new();
        table.set(RewardKey::any(), 1.0);
        table.set(RewardKey::any().with_state(0), 2.0);
        table.set(RewardKey::any().with_action(1), 3.0);
        table.set(RewardKey::any().with_action(1).with_state(0), 4.0);
        table.set(RewardKey::exact(0, 1, 1, 1), 5.0);

        assert_eq!(table.get(1, 0, 0, 0), Some(1.0));
        assert_eq!(table.get(0, 0, 0, 0), Some(2.0));
        // Action alone outranks state alone.
        assert_eq!(table.get(0, 1, 1, 0).unwrap(), 4.0);
        assert_eq!(table.get(1, 1, 0, 0), Some(3.0));
        assert_eq!(table.get(0, 1, 1, 1), Some(5.0));

        assert_eq!(table.min(), 1.0);
        assert_eq!(table.max(), 5.0);
    }

    #[test]
    fn test_action_beats_state_at_same_specificity() {
        let mut table = RewardTable::new();
        table.set(RewardKey::any().with_state(0), 2.0);
        table.set(RewardKey::any().with_action(0), 3.0);
        assert_eq!(table.get(0, 0, 0, 0), Some(3.0));
    }

    #[test]
    fn test_missing_reward_is_none() {
        let mut table = RewardTable::new();
        table.set(RewardKey::any().with_action(0), -1.0);
        assert_eq!(table.get(0, 1, 0, 0), None);
        assert_eq!(RewardTable::new().min(), 0.0);
    }

    #[test]
    fn test_setters_check_ranges() {
        let mut model = TabularPomdp::new(2, 1, 1, Horizon::finite(1));
        assert!(matches!(
            model.set_transition(2, 0, 0, 1.0),
            Err(ModelError::IndexOutOfRange { kind: "state", index: 2, len: 2 })
        ));
        assert!(matches!(
            model.set_observation(0, 0, 0, 1.5),
            Err(ModelError::InvalidProbability { .. })
        ));
        assert!(matches!(
            model.set_transition_row(0, 0, &[1.0]),
            Err(ModelError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_validate() {
        let model = identity_model();
        assert!(model.validate().is_ok());

        let mut broken = model.clone();
        broken.set_transition(0, 1, 1, 0.5).unwrap();
        assert!(matches!(
            broken.validate(),
            Err(ModelError::InvalidDistribution { .. })
        ));

        let mut bad_key = model.clone();
        bad_key.set_reward(RewardKey::any().with_observation(7), 1.0);
        assert!(matches!(
            bad_key.validate(),
            Err(ModelError::IndexOutOfRange { kind: "observation", .. })
        ));

        let empty = TabularPomdp::new(0, 1, 1, Horizon::finite(1));
        assert_eq!(empty.validate(), Err(ModelError::NoStates));
    }

    #[test]
    fn test_unset_probabilities_are_zero() {
        let model = TabularPomdp::new(2, 1, 1, Horizon::finite(1));
        assert_eq!(model.transition(0, 0, 1), Some(0.0));
        assert_eq!(model.transition(5, 0, 1), None);
        assert_eq!(model.reward(0, 0, 0, 0), None);
    }

    #[test]
    fn test_labels() {
        let mut model = identity_model();
        assert_eq!(model.state_name(1), "s1");
        model
            .set_state_labels(vec![EntityLabel::named("on"), EntityLabel::named("off")])
            .unwrap();
        assert_eq!(model.state_name(1), "off");
        assert!(model.set_action_labels(vec![EntityLabel::Indexed(0)]).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let mut model = identity_model();
        model.set_reward(RewardKey::any().with_state(1).with_action(0), 2.5);
        model.save_json(&path).unwrap();

        let loaded = TabularPomdp::from_json_file(&path).unwrap();
        assert_eq!(loaded, model);
        assert_eq!(loaded.reward(1, 0, 0, 1), Some(2.5));
    }

    #[test]
    fn test_from_json_str_validates() {
        let json = r#"{
            "num_states": 1, "num_actions": 1, "num_observations": 1,
            "horizon": { "kind": "finite", "length": 2, "discount": 1.0 },
            "transitions": [[[0.5]]],
            "observations": [[[1.0]]],
            "rewards": [ { "value": 1.0 } ]
        }"#;
        assert!(matches!(
            TabularPomdp::from_json_str(json),
            Err(LoadError::Invalid(ModelError::InvalidDistribution { .. }))
        ));

        let fixed = json.replace("[[[0.5]]]", "[[[1.0]]]");
        let model = TabularPomdp::from_json_str(&fixed).unwrap();
        assert_eq!(model.reward(0, 0, 0, 0), Some(1.0));
        assert!(matches!(TabularPomdp::from_json_str("{"), Err(LoadError::Parse(_))));
    }
}
