//! Belief-set expansion heuristics for infinite-horizon PBVI.
//!
//! Each heuristic produces exactly one new belief per belief already in the
//! pool. New beliefs are returned to the caller, which appends them; existing
//! beliefs are never replaced.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::pomdp::alpha::{best_alpha, AlphaVector};
use crate::pomdp::belief::{
    belief_update, observation_probability, sample_index, BeliefError, BeliefState,
    NORMALIZATION_EPSILON,
};
use crate::pomdp::config::ConfigError;
use crate::pomdp::model::Pomdp;

/// Probability of a uniformly random action in greedy stochastic simulation.
pub const GREEDY_EXPLORATION: f64 = 0.1;

/// Smallest `1 - γ` used when bounding values for greedy error reduction.
const MIN_DISCOUNT_GAP: f64 = 1e-6;

/// How the belief set grows between rounds of updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionRule {
    /// Never add beliefs.
    None,
    /// Uniformly random points on the probability simplex.
    #[default]
    RandomBeliefSelection,
    /// Simulate one step with a uniformly random action.
    StochasticSimulationRandomAction,
    /// Simulate one step with an ε-greedy action (ε = 0.1).
    StochasticSimulationGreedyAction,
    /// Simulate every action, keep the successor farthest from the pool.
    StochasticSimulationExploratoryAction,
    /// Keep the reachable successor with the largest expected error bound.
    GreedyErrorReduction,
}

impl ExpansionRule {
    /// All rules, in declaration order.
    pub const ALL: [ExpansionRule; 6] = [
        ExpansionRule::None,
        ExpansionRule::RandomBeliefSelection,
        ExpansionRule::StochasticSimulationRandomAction,
        ExpansionRule::StochasticSimulationGreedyAction,
        ExpansionRule::StochasticSimulationExploratoryAction,
        ExpansionRule::GreedyErrorReduction,
    ];

    /// The snake_case name used in configuration files and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            ExpansionRule::None => "none",
            ExpansionRule::RandomBeliefSelection => "random_belief_selection",
            ExpansionRule::StochasticSimulationRandomAction => "stochastic_simulation_random_action",
            ExpansionRule::StochasticSimulationGreedyAction => "stochastic_simulation_greedy_action",
            ExpansionRule::StochasticSimulationExploratoryAction => {
                "stochastic_simulation_exploratory_action"
            }
            ExpansionRule::GreedyErrorReduction => "greedy_error_reduction",
        }
    }
}

impl fmt::Display for ExpansionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExpansionRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ExpansionRule::ALL
            .iter()
            .copied()
            .find(|rule| rule.name() == normalized)
            .ok_or_else(|| ConfigError::UnknownExpansionRule(s.to_string()))
    }
}

/// Grow the belief pool by one belief per existing belief.
///
/// `gamma` is the current value function, used by the greedy heuristics.
/// Returns the new beliefs in the order of the beliefs they were derived from.
pub fn expand<M, R>(
    rule: ExpansionRule,
    model: &M,
    beliefs: &[BeliefState],
    gamma: &[AlphaVector],
    rng: &mut R,
) -> Result<Vec<BeliefState>, BeliefError>
where
    M: Pomdp + ?Sized,
    R: Rng + ?Sized,
{
    let mut added = Vec::with_capacity(beliefs.len());

    match rule {
        ExpansionRule::None => {}
        ExpansionRule::RandomBeliefSelection => {
            for _ in beliefs {
                added.push(random_belief(model.num_states(), rng));
            }
        }
        ExpansionRule::StochasticSimulationRandomAction => {
            for belief in beliefs {
                let action = rng.gen_range(0..model.num_actions());
                added.push(simulate_successor(model, belief, action, rng)?);
            }
        }
        ExpansionRule::StochasticSimulationGreedyAction => {
            for belief in beliefs {
                let action = greedy_action(model, belief, gamma, rng);
                added.push(simulate_successor(model, belief, action, rng)?);
            }
        }
        ExpansionRule::StochasticSimulationExploratoryAction => {
            for belief in beliefs {
                let next = exploratory_successor(model, belief, &added, rng)?;
                added.push(next);
            }
        }
        ExpansionRule::GreedyErrorReduction => {
            for belief in beliefs {
                added.push(error_reduction_successor(model, belief, beliefs, gamma)?);
            }
        }
    }

    Ok(added)
}

/// Draw a belief uniformly from the probability simplex.
///
/// Sorts `n - 1` uniform draws and takes the gaps between consecutive cut
/// points (including 0 and 1), so every entry is non-negative and the entries
/// sum to one.
pub fn random_belief<R: Rng + ?Sized>(num_states: usize, rng: &mut R) -> BeliefState {
    let mut cuts: Vec<f64> = Vec::with_capacity(num_states + 1);
    cuts.push(0.0);
    cuts.extend((1..num_states).map(|_| rng.gen::<f64>()));
    cuts.push(1.0);
    cuts.sort_by(|a, b| a.total_cmp(b));

    let probs = cuts.windows(2).map(|w| w[1] - w[0]).collect();
    BeliefState::from_normalized(probs)
}

/// Simulate one step from `belief` under `action` and return the updated belief.
///
/// Samples `s ~ b`, `s' ~ T(s, a, ·)`, `z ~ O(a, s', ·)`, then applies the
/// belief update for `(a, z)`.
pub fn simulate_successor<M, R>(
    model: &M,
    belief: &BeliefState,
    action: usize,
    rng: &mut R,
) -> Result<BeliefState, BeliefError>
where
    M: Pomdp + ?Sized,
    R: Rng + ?Sized,
{
    let state = belief.sample_state(rng);

    let transitions = (0..model.num_states())
        .map(|next| model.transition_checked(state, action, next))
        .collect::<Result<Vec<_>, _>>()?;
    let next_state = sample_index(rng, transitions);

    let observations = (0..model.num_observations())
        .map(|z| model.observation_checked(action, next_state, z))
        .collect::<Result<Vec<_>, _>>()?;
    let observation = sample_index(rng, observations);

    belief_update(model, belief, action, observation)
}

/// ε-greedy action: random with probability [`GREEDY_EXPLORATION`], otherwise
/// the action of the best vector in `gamma` at `belief`.
fn greedy_action<M, R>(model: &M, belief: &BeliefState, gamma: &[AlphaVector], rng: &mut R) -> usize
where
    M: Pomdp + ?Sized,
    R: Rng + ?Sized,
{
    if rng.gen::<f64>() < GREEDY_EXPLORATION {
        return rng.gen_range(0..model.num_actions());
    }

    best_alpha(gamma, belief)
        .and_then(|(i, _)| gamma[i].action())
        .unwrap_or_else(|| rng.gen_range(0..model.num_actions()))
}

/// Simulate a successor for every action and keep the one whose minimum L1
/// distance to the beliefs added earlier this round is largest. Ties go to
/// the lowest action, so the first belief of a round, where every candidate
/// is infinitely far from the empty set, always takes action 0.
fn exploratory_successor<M, R>(
    model: &M,
    belief: &BeliefState,
    added: &[BeliefState],
    rng: &mut R,
) -> Result<BeliefState, BeliefError>
where
    M: Pomdp + ?Sized,
    R: Rng + ?Sized,
{
    let mut best: Option<(BeliefState, f64)> = None;

    for action in 0..model.num_actions() {
        let candidate = simulate_successor(model, belief, action, rng)?;
        let distance = added
            .iter()
            .map(|other| candidate.l1_distance(other))
            .fold(f64::INFINITY, f64::min);

        match &best {
            Some((_, best_distance)) if distance <= *best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }

    Ok(best.map(|(b, _)| b).unwrap_or_else(|| belief.clone()))
}

/// Upper bound on the approximation error at `candidate`, measured from the
/// nearest pool belief and the vector that is best there.
///
/// For each state the bound uses the largest achievable value
/// `Rmax / (1 - γ)` where the candidate gains mass and the smallest
/// `Rmin / (1 - γ)` where it loses mass.
fn error_bound(
    candidate: &BeliefState,
    pool: &[BeliefState],
    gamma: &[AlphaVector],
    value_min: f64,
    value_max: f64,
) -> f64 {
    // Ties go to the earliest pool belief.
    let nearest = pool
        .iter()
        .min_by(|a, b| candidate.l1_distance(a).total_cmp(&candidate.l1_distance(b)));

    let Some(nearest) = nearest else {
        return 0.0;
    };

    let zero = AlphaVector::default();
    let alpha = best_alpha(gamma, nearest).map_or(&zero, |(i, _)| &gamma[i]);

    let n = candidate.num_states().max(nearest.num_states());
    (0..n)
        .map(|s| {
            let delta = candidate.get(s) - nearest.get(s);
            if delta >= 0.0 {
                (value_max - alpha.get(s)) * delta
            } else {
                (value_min - alpha.get(s)) * delta
            }
        })
        .sum()
}

/// Reachable successor of `belief` with the largest probability-weighted
/// error bound. Ties go to the lowest (action, observation) pair.
fn error_reduction_successor<M: Pomdp + ?Sized>(
    model: &M,
    belief: &BeliefState,
    pool: &[BeliefState],
    gamma: &[AlphaVector],
) -> Result<BeliefState, BeliefError> {
    let gap = (1.0 - model.horizon().discount()).max(MIN_DISCOUNT_GAP);
    let value_min = model.reward_min() / gap;
    let value_max = model.reward_max() / gap;

    let mut best: Option<(BeliefState, f64)> = None;

    for action in 0..model.num_actions() {
        for observation in 0..model.num_observations() {
            let p = observation_probability(model, belief, action, observation)?;
            if p <= NORMALIZATION_EPSILON {
                continue;
            }

            let candidate = belief_update(model, belief, action, observation)?;
            let score = p * error_bound(&candidate, pool, gamma, value_min, value_max);

            match &best {
                Some((_, best_score)) if score <= *best_score => {}
                _ => best = Some((candidate, score)),
            }
        }
    }

    Ok(best.map(|(b, _)| b).unwrap_or_else(|| belief.clone()))
}
