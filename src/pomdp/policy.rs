//! Alpha-vector policies produced by the solvers.
//!
//! A finite-horizon policy holds one gamma set per stage, where stage `t`
//! is the value function with `t + 1` steps to go. An infinite-horizon policy
//! holds a single stationary gamma set.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pomdp::alpha::{best_alpha, AlphaVector};
use crate::pomdp::belief::BeliefState;
use crate::pomdp::model::Horizon;

/// The solved value function as sets of alpha vectors.
///
/// # Example
/// ```
/// use pbvi_solver::models::tiger::{tiger_pomdp, LISTEN};
/// use pbvi_solver::pomdp::{BeliefState, Horizon, PbviConfig, PbviSolver};
///
/// let model = tiger_pomdp(Horizon::finite(2));
/// let mut solver = PbviSolver::new(PbviConfig::default());
/// solver.add_initial_belief(BeliefState::uniform(2));
///
/// let policy = solver.solve(&model).unwrap();
/// assert_eq!(policy.num_stages(), 2);
/// assert_eq!(policy.action_for_time_step(&BeliefState::uniform(2), 0), Some(LISTEN));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyAlphaVectors {
    horizon: Horizon,
    stages: Vec<Vec<AlphaVector>>,
}

impl PolicyAlphaVectors {
    /// A finite-horizon policy; `stages[t]` has `t + 1` steps to go.
    pub fn finite(horizon: Horizon, stages: Vec<Vec<AlphaVector>>) -> Self {
        Self { horizon, stages }
    }

    /// A stationary infinite-horizon policy.
    pub fn infinite(horizon: Horizon, gamma: Vec<AlphaVector>) -> Self {
        Self {
            horizon,
            stages: vec![gamma],
        }
    }

    /// The horizon this policy was solved for.
    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    /// Whether this is a per-stage policy.
    pub fn is_finite(&self) -> bool {
        self.horizon.is_finite()
    }

    /// Number of stored gamma sets (1 for infinite horizons).
    pub fn num_stages(&self) -> usize {
        self.stages.len()
    }

    /// Gamma set of one stage.
    pub fn stage(&self, stage: usize) -> Option<&[AlphaVector]> {
        self.stages.get(stage).map(Vec::as_slice)
    }

    /// All gamma sets, in stage order.
    pub fn stages(&self) -> &[Vec<AlphaVector>] {
        &self.stages
    }

    /// The gamma set with the most steps to go (the stationary set for an
    /// infinite horizon).
    pub fn vectors(&self) -> &[AlphaVector] {
        self.stages.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of vectors over all stages.
    pub fn num_vectors(&self) -> usize {
        self.stages.iter().map(Vec::len).sum()
    }

    /// Iterate `(stage, vector)` pairs in stage order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &AlphaVector)> + '_ {
        self.stages
            .iter()
            .enumerate()
            .flat_map(|(stage, gamma)| gamma.iter().map(move |alpha| (stage, alpha)))
    }

    /// Best action at `belief` using [`vectors`](Self::vectors).
    pub fn best_action(&self, belief: &BeliefState) -> Option<usize> {
        Self::argmax_action(self.vectors(), belief)
    }

    /// Best action at `belief` using the gamma set of `stage`.
    pub fn best_action_at(&self, belief: &BeliefState, stage: usize) -> Option<usize> {
        Self::argmax_action(self.stage(stage)?, belief)
    }

    /// Value of `belief` under [`vectors`](Self::vectors).
    pub fn value(&self, belief: &BeliefState) -> Option<f64> {
        best_alpha(self.vectors(), belief).map(|(_, v)| v)
    }

    /// Value of `belief` under the gamma set of `stage`.
    pub fn value_at(&self, belief: &BeliefState, stage: usize) -> Option<f64> {
        best_alpha(self.stage(stage)?, belief).map(|(_, v)| v)
    }

    /// Action to take at decision step `time_step` of an episode.
    ///
    /// Step 0 is the first decision, which has the most steps to go, so it
    /// uses stage `H - 1`. Steps at or past the horizon return `None`.
    /// Infinite-horizon policies ignore the step.
    pub fn action_for_time_step(&self, belief: &BeliefState, time_step: usize) -> Option<usize> {
        if !self.is_finite() {
            return self.best_action(belief);
        }
        let stage = self.stages.len().checked_sub(time_step + 1)?;
        self.best_action_at(belief, stage)
    }

    fn argmax_action(gamma: &[AlphaVector], belief: &BeliefState) -> Option<usize> {
        best_alpha(gamma, belief).and_then(|(i, _)| gamma[i].action())
    }

    /// Write the policy as pretty-printed JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Load a policy written by [`save_json`](Self::save_json).
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let policy = serde_json::from_reader(reader)?;
        Ok(policy)
    }
}
