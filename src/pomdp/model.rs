//! Model trait definition for the POMDP solvers.
//!
//! Any model that implements the `Pomdp` trait can be solved with PBVI or
//! exact value iteration. This keeps the solvers independent of how the
//! transition, observation and reward tables are stored.
//!
//! States, actions and observations are addressed by index (`0..n`). The
//! solvers only enumerate and compare these indices; labels are a model-layer
//! concern.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Planning horizon of a POMDP.
///
/// A finite horizon runs a fixed number of stages and may still discount
/// (the discount defaults to 1.0). An infinite horizon always discounts.
///
/// # Example
/// ```
/// use pbvi_solver::pomdp::Horizon;
///
/// let h = Horizon::infinite(0.95);
/// assert!(!h.is_finite());
/// assert_eq!(h.length(), None);
/// assert_eq!(h.discount(), 0.95);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Horizon {
    /// A fixed number of decision stages.
    Finite {
        /// Number of stages (must be positive).
        length: usize,
        /// Per-stage discount factor in [0, 1].
        discount: f64,
    },
    /// An unbounded number of stages with a discount factor.
    Infinite {
        /// Per-stage discount factor in [0, 1].
        discount: f64,
    },
}

impl Horizon {
    /// Create an undiscounted finite horizon.
    pub fn finite(length: usize) -> Self {
        Horizon::Finite {
            length,
            discount: 1.0,
        }
    }

    /// Create a discounted finite horizon.
    pub fn finite_discounted(length: usize, discount: f64) -> Self {
        Horizon::Finite { length, discount }
    }

    /// Create an infinite horizon with the given discount factor.
    pub fn infinite(discount: f64) -> Self {
        Horizon::Infinite { discount }
    }

    /// Whether this horizon has a fixed number of stages.
    pub fn is_finite(&self) -> bool {
        matches!(self, Horizon::Finite { .. })
    }

    /// Number of stages, or `None` for an infinite horizon.
    pub fn length(&self) -> Option<usize> {
        match self {
            Horizon::Finite { length, .. } => Some(*length),
            Horizon::Infinite { .. } => None,
        }
    }

    /// The discount factor applied to future reward.
    pub fn discount(&self) -> f64 {
        match self {
            Horizon::Finite { discount, .. } | Horizon::Infinite { discount } => *discount,
        }
    }

    /// Validate the horizon parameters.
    pub fn validate(&self) -> Result<(), ModelError> {
        let discount = self.discount();
        if !(0.0..=1.0).contains(&discount) {
            return Err(ModelError::InvalidDiscount(discount));
        }
        if let Horizon::Finite { length: 0, .. } = self {
            return Err(ModelError::EmptyHorizon);
        }
        Ok(())
    }
}

impl std::fmt::Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Horizon::Finite { length, discount } => {
                write!(f, "finite({}, gamma={})", length, discount)
            }
            Horizon::Infinite { discount } => write!(f, "infinite(gamma={})", discount),
        }
    }
}

/// Errors raised by a model that cannot be solved as given.
///
/// Shape errors mean the model is not a finite, queryable POMDP. Lookup
/// misses mean a table had no entry (after any wildcard resolution) for a
/// query the solver needed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// The model has no states.
    #[error("model has no states")]
    NoStates,

    /// The model has no actions.
    #[error("model has no actions")]
    NoActions,

    /// The model has no observations.
    #[error("model has no observations")]
    NoObservations,

    /// A finite horizon with zero stages.
    #[error("finite horizon must have at least one stage")]
    EmptyHorizon,

    /// Discount factor outside [0, 1].
    #[error("discount factor {0} is out of range [0, 1]")]
    InvalidDiscount(f64),

    /// An index outside the model's range.
    #[error("{kind} index {index} is out of range (model has {len})")]
    IndexOutOfRange {
        /// Which kind of entity was indexed.
        kind: &'static str,
        /// The offending index.
        index: usize,
        /// Number of entities of that kind.
        len: usize,
    },

    /// A probability outside [0, 1].
    #[error("{what} probability {value} is out of range [0, 1]")]
    InvalidProbability {
        /// Which table the probability belongs to.
        what: &'static str,
        /// The offending value.
        value: f64,
    },

    /// A conditional distribution that does not sum to one.
    #[error("{what} does not sum to 1.0 (sum={sum})")]
    InvalidDistribution {
        /// Description of the distribution row.
        what: String,
        /// The actual row sum.
        sum: f64,
    },

    /// A table was built with the wrong number of entries.
    #[error("{what} has {found} entries, expected {expected}")]
    DimensionMismatch {
        /// Which table.
        what: &'static str,
        /// Expected entry count.
        expected: usize,
        /// Actual entry count.
        found: usize,
    },

    /// No transition entry for `T(s, a, s')`.
    #[error("no transition probability for T({state}, {action}, {next_state})")]
    MissingTransition {
        /// Source state.
        state: usize,
        /// Action taken.
        action: usize,
        /// Successor state.
        next_state: usize,
    },

    /// No observation entry for `O(a, s', z)`.
    #[error("no observation probability for O({action}, {next_state}, {observation})")]
    MissingObservation {
        /// Action taken.
        action: usize,
        /// Successor state.
        next_state: usize,
        /// Observation received.
        observation: usize,
    },

    /// No reward entry for `R(s, a, s', z)`.
    #[error("no reward for R({state}, {action}, {next_state}, {observation})")]
    MissingReward {
        /// Source state.
        state: usize,
        /// Action taken.
        action: usize,
        /// Successor state.
        next_state: usize,
        /// Observation received.
        observation: usize,
    },
}

/// The interface a POMDP model exposes to the solvers.
///
/// Lookups return `Option`: `None` means the model has no entry for the query.
/// Models that treat missing entries as zero should return `Some(0.0)` and
/// document it. The solvers never assume a zero default themselves.
///
/// # Example
/// ```ignore
/// struct MyModel;
///
/// impl Pomdp for MyModel {
///     fn num_states(&self) -> usize { 2 }
///     // ... implement required methods
/// }
/// ```
pub trait Pomdp: Send + Sync {
    /// Number of states.
    fn num_states(&self) -> usize;

    /// Number of actions.
    fn num_actions(&self) -> usize;

    /// Number of observations.
    fn num_observations(&self) -> usize;

    /// Probability `T(s, a, s')` of moving to `next_state`.
    fn transition(&self, state: usize, action: usize, next_state: usize) -> Option<f64>;

    /// Probability `O(a, s', z)` of observing `observation` after reaching `next_state`.
    fn observation(&self, action: usize, next_state: usize, observation: usize) -> Option<f64>;

    /// Reward `R(s, a, s', z)`.
    fn reward(
        &self,
        state: usize,
        action: usize,
        next_state: usize,
        observation: usize,
    ) -> Option<f64>;

    /// The planning horizon.
    fn horizon(&self) -> Horizon;

    /// Smallest reward value the model can produce.
    fn reward_min(&self) -> f64;

    /// Largest reward value the model can produce.
    fn reward_max(&self) -> f64;

    /// Human-readable name of a state.
    fn state_name(&self, state: usize) -> String {
        format!("s{}", state)
    }

    /// Human-readable name of an action.
    fn action_name(&self, action: usize) -> String {
        format!("a{}", action)
    }

    /// Human-readable name of an observation.
    fn observation_name(&self, observation: usize) -> String {
        format!("z{}", observation)
    }

    /// `T(s, a, s')`, with a missing entry reported as an error.
    fn transition_checked(
        &self,
        state: usize,
        action: usize,
        next_state: usize,
    ) -> Result<f64, ModelError> {
        self.transition(state, action, next_state)
            .ok_or(ModelError::MissingTransition {
                state,
                action,
                next_state,
            })
    }

    /// `O(a, s', z)`, with a missing entry reported as an error.
    fn observation_checked(
        &self,
        action: usize,
        next_state: usize,
        observation: usize,
    ) -> Result<f64, ModelError> {
        self.observation(action, next_state, observation)
            .ok_or(ModelError::MissingObservation {
                action,
                next_state,
                observation,
            })
    }

    /// `R(s, a, s', z)`, with a missing entry reported as an error.
    fn reward_checked(
        &self,
        state: usize,
        action: usize,
        next_state: usize,
        observation: usize,
    ) -> Result<f64, ModelError> {
        self.reward(state, action, next_state, observation)
            .ok_or(ModelError::MissingReward {
                state,
                action,
                next_state,
                observation,
            })
    }
}

/// Check that a model has the shape the solvers require.
///
/// This verifies non-empty state, action and observation sets and a valid
/// horizon. Table contents are checked lazily when the solver queries them.
pub fn check_shape<M: Pomdp + ?Sized>(model: &M) -> Result<(), ModelError> {
    if model.num_states() == 0 {
        return Err(ModelError::NoStates);
    }
    if model.num_actions() == 0 {
        return Err(ModelError::NoActions);
    }
    if model.num_observations() == 0 {
        return Err(ModelError::NoObservations);
    }
    model.horizon().validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizon_queries() {
        let finite = Horizon::finite(4);
        assert!(finite.is_finite());
        assert_eq!(finite.length(), Some(4));
        assert_eq!(finite.discount(), 1.0);

        let infinite = Horizon::infinite(0.9);
        assert!(!infinite.is_finite());
        assert_eq!(infinite.length(), None);
        assert_eq!(infinite.discount(), 0.9);
    }

    #[test]
    fn test_horizon_validation() {
        assert!(Horizon::finite(1).validate().is_ok());
        assert_eq!(Horizon::finite(0).validate(), Err(ModelError::EmptyHorizon));
        assert_eq!(
            Horizon::infinite(1.5).validate(),
            Err(ModelError::InvalidDiscount(1.5))
        );
        assert!(Horizon::finite_discounted(3, -0.1).validate().is_err());
    }

    #[test]
    fn test_horizon_serde() {
        let h = Horizon::infinite(0.95);
        let json = serde_json::to_string(&h).unwrap();
        assert!(json.contains("\"kind\":\"infinite\""));
        let back: Horizon = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }
}
