//! Bellman backup engine.
//!
//! Builds new alpha vectors from the previous value function approximation.
//!
//! # Overview
//!
//! Every backup is assembled from two pieces:
//!
//! - **Γ_{a,*}**, the immediate expected reward of each action, which never
//!   changes between rounds and is computed once per solve:
//!   ```text
//!   γ_{a,*}(s) = Σ_{s'} T(s, a, s') · Σ_z O(a, s', z) · R(s, a, s', z)
//!   ```
//! - **Backprojections** of the previous vectors through the dynamics:
//!   ```text
//!   g^α_{a,z}(s) = γ · Σ_{s'} T(s, a, s') · O(a, s', z) · α(s')
//!   ```
//!
//! The exact backup cross-sums the backprojections over all observations.
//! The point-based backup picks one backprojection per observation, the one
//! that is best at a specific belief, so its cost is linear in |Γ|.

use rustc_hash::FxHashSet;

use crate::pomdp::alpha::AlphaVector;
use crate::pomdp::belief::BeliefState;
use crate::pomdp::model::{ModelError, Pomdp};

/// Model quantities shared by every backup of a solve.
///
/// Holds Γ_{a,*} for every action and the dense kernel
/// `K[a][z][s][s'] = T(s, a, s') · O(a, s', z)`. Building the cache performs
/// every model lookup the backups need, so a missing entry fails the solve
/// before the first sweep and the backups themselves cannot fail.
#[derive(Debug, Clone)]
pub struct BackupCache {
    num_states: usize,
    num_actions: usize,
    num_observations: usize,
    discount: f64,
    gamma_a_star: Vec<AlphaVector>,
    kernel: Vec<f64>,
}

impl BackupCache {
    /// Query the model and build the cache.
    pub fn build<M: Pomdp + ?Sized>(model: &M) -> Result<Self, ModelError> {
        let num_states = model.num_states();
        let num_actions = model.num_actions();
        let num_observations = model.num_observations();

        let mut kernel = vec![0.0; num_actions * num_observations * num_states * num_states];
        let mut gamma_a_star = Vec::with_capacity(num_actions);

        for action in 0..num_actions {
            let mut reward_vector = AlphaVector::zeros(num_states).with_action(action);

            for state in 0..num_states {
                let mut expected = 0.0;
                for next_state in 0..num_states {
                    let t = model.transition_checked(state, action, next_state)?;
                    for observation in 0..num_observations {
                        let o = model.observation_checked(action, next_state, observation)?;
                        let r = model.reward_checked(state, action, next_state, observation)?;
                        expected += t * o * r;

                        let idx = Self::kernel_index(
                            num_states,
                            num_observations,
                            action,
                            observation,
                            state,
                            next_state,
                        );
                        kernel[idx] = t * o;
                    }
                }
                reward_vector.set(state, expected);
            }

            gamma_a_star.push(reward_vector);
        }

        Ok(Self {
            num_states,
            num_actions,
            num_observations,
            discount: model.horizon().discount(),
            gamma_a_star,
            kernel,
        })
    }

    fn kernel_index(
        num_states: usize,
        num_observations: usize,
        action: usize,
        observation: usize,
        state: usize,
        next_state: usize,
    ) -> usize {
        ((action * num_observations + observation) * num_states + state) * num_states + next_state
    }

    /// Γ_{a,*} for `action`.
    pub fn gamma_a_star(&self, action: usize) -> &AlphaVector {
        &self.gamma_a_star[action]
    }

    /// Number of states.
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Number of actions.
    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Number of observations.
    pub fn num_observations(&self) -> usize {
        self.num_observations
    }

    /// Discount factor applied to backprojections.
    pub fn discount(&self) -> f64 {
        self.discount
    }

    /// Backproject `alpha` through `action` and `observation`.
    ///
    /// The result carries no action.
    pub fn backproject(&self, alpha: &AlphaVector, action: usize, observation: usize) -> AlphaVector {
        let n = self.num_states;
        let mut result = AlphaVector::zeros(n);

        for state in 0..n {
            let base = Self::kernel_index(n, self.num_observations, action, observation, state, 0);
            let row = &self.kernel[base..base + n];
            let value: f64 = row
                .iter()
                .enumerate()
                .map(|(next_state, &k)| k * alpha.get(next_state))
                .sum();
            result.set(state, self.discount * value);
        }

        result
    }
}

/// Backprojections of a whole gamma set, for every action and observation.
///
/// Computed once per sweep and shared read-only by every belief's backup.
/// `get(a, z)[i]` is the backprojection of `gamma[i]`.
#[derive(Debug, Clone)]
pub struct Projections {
    num_observations: usize,
    sets: Vec<Vec<AlphaVector>>,
}

impl Projections {
    /// Backproject every vector of `gamma` through every action/observation pair.
    pub fn compute(cache: &BackupCache, gamma: &[AlphaVector]) -> Self {
        let mut sets = Vec::with_capacity(cache.num_actions() * cache.num_observations());
        for action in 0..cache.num_actions() {
            for observation in 0..cache.num_observations() {
                sets.push(
                    gamma
                        .iter()
                        .map(|alpha| cache.backproject(alpha, action, observation))
                        .collect(),
                );
            }
        }

        Self {
            num_observations: cache.num_observations(),
            sets,
        }
    }

    /// Backprojections for one action/observation pair, in gamma order.
    pub fn get(&self, action: usize, observation: usize) -> &[AlphaVector] {
        &self.sets[action * self.num_observations + observation]
    }
}

/// Point-based backup of `belief` under `action`.
///
/// For each observation the backprojection with the highest value at `belief`
/// is chosen. Since `b · g^α_{a,z} = γ · P(z | b, a) · α(τ(b, a, z))`, this is
/// the vector that is best at the successor belief whenever the observation is
/// possible; when it is not, every candidate scores zero and the first is
/// kept. Ties go to the earliest vector in gamma.
///
/// The result is `Γ_{a,*} + Σ_z g^{α_z}_{a,z}`, tagged with `action`.
pub fn point_based_backup(
    cache: &BackupCache,
    projections: &Projections,
    action: usize,
    belief: &BeliefState,
) -> AlphaVector {
    let mut result = cache.gamma_a_star(action).clone();

    for observation in 0..cache.num_observations() {
        let candidates = projections.get(action, observation);
        if let Some((best, _)) = crate::pomdp::alpha::best_alpha(candidates, belief) {
            result += &candidates[best];
        }
    }

    result.set_action(action);
    result
}

/// Backup `belief` under every action and keep the maximizer.
///
/// Ties go to the lowest action index.
pub fn best_backup(cache: &BackupCache, projections: &Projections, belief: &BeliefState) -> AlphaVector {
    let mut best: Option<(AlphaVector, f64)> = None;

    for action in 0..cache.num_actions() {
        let candidate = point_based_backup(cache, projections, action, belief);
        let value = candidate.compute_value(belief);
        match &best {
            Some((_, best_value)) if value <= *best_value => {}
            _ => best = Some((candidate, value)),
        }
    }

    match best {
        Some((alpha, _)) => alpha,
        None => AlphaVector::zeros(cache.num_states()),
    }
}

/// Exact backup Γ_a for one action.
///
/// Cross-sums the backprojection sets of every observation and adds Γ_{a,*}.
/// The result has `|Γ|^|Z|` vectors, all tagged with `action`; it is empty
/// when gamma is empty.
pub fn full_backup(cache: &BackupCache, projections: &Projections, action: usize) -> Vec<AlphaVector> {
    let mut result = vec![cache.gamma_a_star(action).clone()];

    for observation in 0..cache.num_observations() {
        result = AlphaVector::cross_sum(&result, projections.get(action, observation));
    }

    for alpha in result.iter_mut() {
        alpha.set_action(action);
    }
    result
}

/// Remove duplicate and pointwise-dominated vectors, keeping set order.
///
/// A vector is dropped when another vector is at least as large everywhere
/// and either strictly larger somewhere or an identical earlier copy.
pub fn prune_dominated(gamma: Vec<AlphaVector>) -> Vec<AlphaVector> {
    let mut seen: FxHashSet<Vec<u64>> = FxHashSet::default();
    let mut unique = Vec::with_capacity(gamma.len());

    for alpha in gamma {
        let key: Vec<u64> = alpha.values().iter().map(|v| v.to_bits()).collect();
        if seen.insert(key) {
            unique.push(alpha);
        }
    }

    let keep: Vec<bool> = unique
        .iter()
        .enumerate()
        .map(|(i, alpha)| {
            !unique
                .iter()
                .enumerate()
                .any(|(j, other)| i != j && other.dominates(alpha) && !alpha.dominates(other))
        })
        .collect();

    unique
        .into_iter()
        .zip(keep)
        .filter_map(|(alpha, keep)| keep.then_some(alpha))
        .collect()
}
