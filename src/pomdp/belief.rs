//! Belief states and the Bayesian belief update.
//!
//! A belief is a probability distribution over the model's states. After
//! taking action `a` and observing `z`, the belief moves to
//!
//! ```text
//! b'(s') ∝ O(a, s', z) · Σ_s T(s, a, s') · b(s)
//! ```
//!
//! Beliefs are immutable once built: every update creates a new value, since
//! beliefs from earlier rounds stay in the solver's pool as probe points.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pomdp::model::{ModelError, Pomdp};

/// Tolerance used when checking that a belief sums to one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Normalizing constants at or below this are treated as zero.
pub const NORMALIZATION_EPSILON: f64 = 1e-12;

/// Errors from constructing or updating beliefs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BeliefError {
    /// A belief with no entries.
    #[error("belief has no entries")]
    Empty,

    /// An entry that is negative, above one, or not a number.
    #[error("probability {value} for state {state} is out of range [0, 1]")]
    ProbabilityOutOfRange {
        /// State index of the entry.
        state: usize,
        /// The offending value.
        value: f64,
    },

    /// Entries that do not sum to one.
    #[error("invalid probability distribution: does not sum to 1.0 (sum={0})")]
    InvalidDistribution(f64),

    /// A belief defined over more states than the model has.
    #[error("belief over {found} states does not fit a model with {expected} states")]
    DimensionMismatch {
        /// Number of states in the model.
        expected: usize,
        /// Number of entries in the belief.
        found: usize,
    },

    /// The observation cannot occur from this belief after this action.
    #[error("observation {observation} has zero probability after action {action}")]
    ZeroProbabilityObservation {
        /// Action taken.
        action: usize,
        /// Observation received.
        observation: usize,
    },

    /// A model lookup failed during the update.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A probability distribution over states.
///
/// Entries beyond the stored length read as zero, so a belief over the first
/// `k` states of a larger model is valid as long as it sums to one.
///
/// Serializes as a plain array of probabilities. Deserializing goes through
/// [`BeliefState::from_probs`], so a file cannot produce an invalid belief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct BeliefState {
    probs: Vec<f64>,
}

impl TryFrom<Vec<f64>> for BeliefState {
    type Error = BeliefError;

    fn try_from(probs: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_probs(probs)
    }
}

impl From<BeliefState> for Vec<f64> {
    fn from(belief: BeliefState) -> Self {
        belief.probs
    }
}

impl BeliefState {
    /// Create a belief from a probability vector.
    ///
    /// Every entry must lie in [0, 1] and the entries must sum to one within
    /// [`PROBABILITY_TOLERANCE`].
    pub fn from_probs(probs: Vec<f64>) -> Result<Self, BeliefError> {
        if probs.is_empty() {
            return Err(BeliefError::Empty);
        }

        for (state, &value) in probs.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                return Err(BeliefError::ProbabilityOutOfRange { state, value });
            }
        }

        let sum: f64 = probs.iter().sum();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(BeliefError::InvalidDistribution(sum));
        }

        Ok(Self { probs })
    }

    /// The uniform belief over `num_states` states.
    ///
    /// `num_states` must be positive.
    pub fn uniform(num_states: usize) -> Self {
        debug_assert!(num_states > 0, "uniform belief over zero states");
        Self {
            probs: vec![1.0 / num_states as f64; num_states],
        }
    }

    /// The belief that puts all mass on `state`.
    pub fn point(num_states: usize, state: usize) -> Self {
        debug_assert!(state < num_states, "point belief outside the state range");
        let mut probs = vec![0.0; num_states];
        probs[state] = 1.0;
        Self { probs }
    }

    /// Build a belief from weights that are already known to be a distribution.
    pub(crate) fn from_normalized(probs: Vec<f64>) -> Self {
        Self { probs }
    }

    /// Probability of `state`. States past the stored length have probability 0.
    pub fn get(&self, state: usize) -> f64 {
        self.probs.get(state).copied().unwrap_or(0.0)
    }

    /// Number of stored entries.
    pub fn num_states(&self) -> usize {
        self.probs.len()
    }

    /// The stored probabilities.
    pub fn probs(&self) -> &[f64] {
        &self.probs
    }

    /// States with non-zero probability, with their mass.
    pub fn support(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.probs
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, p)| p > 0.0)
    }

    /// L1 distance to another belief.
    pub fn l1_distance(&self, other: &BeliefState) -> f64 {
        let n = self.probs.len().max(other.probs.len());
        (0..n).map(|s| (self.get(s) - other.get(s)).abs()).sum()
    }

    /// Sample a state according to this belief.
    pub fn sample_state<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        sample_index(rng, self.probs.iter().copied())
    }

    /// Check that this belief fits a model with `num_states` states.
    pub fn check_dimension(&self, num_states: usize) -> Result<(), BeliefError> {
        if self.probs.len() > num_states {
            return Err(BeliefError::DimensionMismatch {
                expected: num_states,
                found: self.probs.len(),
            });
        }
        Ok(())
    }
}

/// Sample an index according to a list of non-negative weights summing to one.
///
/// Falls back to the last index with positive weight, which absorbs floating
/// point shortfall in the cumulative sum.
pub(crate) fn sample_index<R, I>(rng: &mut R, weights: I) -> usize
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = f64>,
{
    let r: f64 = rng.gen();
    let mut cumsum = 0.0;
    let mut last_positive = 0;

    for (i, w) in weights.into_iter().enumerate() {
        if w > 0.0 {
            last_positive = i;
        }
        cumsum += w;
        if r < cumsum {
            return i;
        }
    }

    last_positive
}

/// Compute the predicted, unnormalized successor weights
/// `O(a, s', z) · Σ_s T(s, a, s') · b(s)` for every `s'`.
fn unnormalized_update<M: Pomdp + ?Sized>(
    model: &M,
    belief: &BeliefState,
    action: usize,
    observation: usize,
) -> Result<Vec<f64>, BeliefError> {
    let n = model.num_states();
    belief.check_dimension(n)?;

    let mut weights = vec![0.0; n];
    for (next_state, weight) in weights.iter_mut().enumerate() {
        let mut predicted = 0.0;
        for (state, p) in belief.support() {
            predicted += model.transition_checked(state, action, next_state)? * p;
        }
        if predicted > 0.0 {
            *weight = model.observation_checked(action, next_state, observation)? * predicted;
        }
    }

    Ok(weights)
}

/// Probability of receiving `observation` after taking `action` from `belief`.
///
/// This is the normalizing constant of [`belief_update`].
pub fn observation_probability<M: Pomdp + ?Sized>(
    model: &M,
    belief: &BeliefState,
    action: usize,
    observation: usize,
) -> Result<f64, BeliefError> {
    let weights = unnormalized_update(model, belief, action, observation)?;
    Ok(weights.iter().sum())
}

/// Perform the belief update for `action` followed by `observation`.
///
/// # Errors
/// Returns [`BeliefError::ZeroProbabilityObservation`] when the observation
/// cannot occur from this belief (normalizing constant at or below
/// [`NORMALIZATION_EPSILON`]), and [`BeliefError::Model`] when a transition or
/// observation lookup has no entry.
///
/// # Example
/// ```
/// use pbvi_solver::models::tiger::{tiger_pomdp, HEAR_LEFT, LISTEN, TIGER_LEFT};
/// use pbvi_solver::pomdp::{belief_update, BeliefState, Horizon};
///
/// let model = tiger_pomdp(Horizon::finite(1));
/// let b = BeliefState::uniform(2);
/// let b2 = belief_update(&model, &b, LISTEN, HEAR_LEFT).unwrap();
/// assert!((b2.get(TIGER_LEFT) - 0.85).abs() < 1e-12);
/// ```
pub fn belief_update<M: Pomdp + ?Sized>(
    model: &M,
    belief: &BeliefState,
    action: usize,
    observation: usize,
) -> Result<BeliefState, BeliefError> {
    let mut weights = unnormalized_update(model, belief, action, observation)?;

    let normalizer: f64 = weights.iter().sum();
    if normalizer <= NORMALIZATION_EPSILON || !normalizer.is_finite() {
        return Err(BeliefError::ZeroProbabilityObservation {
            action,
            observation,
        });
    }

    for w in weights.iter_mut() {
        *w /= normalizer;
    }

    Ok(BeliefState::from_normalized(weights))
}
