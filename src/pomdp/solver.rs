//! Point-Based Value Iteration (PBVI) solver.
//!
//! PBVI approximates the optimal value function of a POMDP by backing it up
//! only at a finite set of belief points. Each backup yields one alpha vector
//! per belief, so the value function stays as large as the belief set instead
//! of growing exponentially.
//!
//! # Overview
//!
//! - **Finite horizon**: the initial beliefs are backed up once per stage.
//!   Stage `t` holds the vectors with `t + 1` steps to go.
//! - **Infinite horizon**: rounds of `update_iterations` sweeps alternate with
//!   belief-set expansion. Every round, including the last, ends with an
//!   expansion, so the final pool holds beliefs the returned gamma set has
//!   not been backed up at yet.
//!
//! The per-belief backups of a sweep are independent and run on rayon; they
//! read the previous gamma set and the backup cache, and the results are
//! collected in belief order, so a parallel sweep equals a sequential one.
//!
//! # Theory
//!
//! A sweep replaces Γ with `{ backup(b, Γ) : b ∈ B }`. For an infinite horizon
//! each sweep is a γ-contraction on the belief points, which is what
//! [`compute_update_iterations`] uses to bound the number of sweeps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::pomdp::alpha::AlphaVector;
use crate::pomdp::backup::{best_backup, BackupCache, Projections};
use crate::pomdp::belief::BeliefState;
use crate::pomdp::config::{ConfigError, PbviConfig, PbviStats};
use crate::pomdp::error::SolveError;
use crate::pomdp::expansion::{expand, ExpansionRule};
use crate::pomdp::model::{check_shape, Horizon, Pomdp};
use crate::pomdp::policy::PolicyAlphaVectors;

/// Reward ranges below this are clamped when bounding the update count.
const MIN_REWARD_RANGE: f64 = 1e-6;

/// Number of sweeps after which the infinite-horizon value function is
/// within `epsilon` of its fixed point on the belief set.
///
/// ```text
/// updates = floor((ln ε − ln(Rmax − Rmin)) / ln γ)
/// ```
///
/// The reward range is clamped to at least 1e-6 and the result to at least 1.
///
/// # Errors
/// [`ConfigError::InvalidEpsilon`] for `epsilon <= 0`, and
/// [`ConfigError::InvalidDiscount`] unless `0 < γ < 1`.
pub fn compute_update_iterations<M: Pomdp + ?Sized>(
    model: &M,
    epsilon: f64,
) -> Result<usize, ConfigError> {
    if !(epsilon > 0.0) {
        return Err(ConfigError::InvalidEpsilon(epsilon));
    }

    let discount = model.horizon().discount();
    if !(discount > 0.0 && discount < 1.0) {
        return Err(ConfigError::InvalidDiscount(discount));
    }

    let range = (model.reward_max() - model.reward_min()).max(MIN_REWARD_RANGE);
    let updates = ((epsilon.ln() - range.ln()) / discount.ln()).floor();

    Ok(if updates >= 1.0 { updates as usize } else { 1 })
}

/// Where the per-belief backups of a sweep run.
enum Executor {
    Sequential,
    Global,
    Dedicated(rayon::ThreadPool),
}

impl Executor {
    fn from_config(config: &PbviConfig) -> Result<Self, ConfigError> {
        match config.num_threads {
            Some(0) | Some(1) => Ok(Executor::Sequential),
            None => Ok(Executor::Global),
            Some(n) => rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map(Executor::Dedicated)
                .map_err(|e| ConfigError::ThreadPool(e.to_string())),
        }
    }

    /// One synchronous sweep: back up every belief against `gamma`.
    fn sweep(
        &self,
        cache: &BackupCache,
        gamma: &[AlphaVector],
        beliefs: &[BeliefState],
    ) -> Vec<AlphaVector> {
        let projections = Projections::compute(cache, gamma);
        let backup = |belief: &BeliefState| best_backup(cache, &projections, belief);

        match self {
            Executor::Sequential => beliefs.iter().map(backup).collect(),
            Executor::Global => beliefs.par_iter().map(backup).collect(),
            Executor::Dedicated(pool) => pool.install(|| beliefs.par_iter().map(backup).collect()),
        }
    }
}

/// The PBVI solver.
///
/// Holds the configuration, the seed beliefs and, after a successful solve,
/// the full belief pool that was used.
///
/// # Example
/// ```
/// use pbvi_solver::models::tiger::{tiger_pomdp, LISTEN};
/// use pbvi_solver::pomdp::{BeliefState, ExpansionRule, Horizon, PbviConfig, PbviSolver};
///
/// let model = tiger_pomdp(Horizon::infinite(0.95));
/// let config = PbviConfig::new()
///     .with_expansion_rule(ExpansionRule::None)
///     .with_update_iterations(50);
///
/// let mut solver = PbviSolver::new(config);
/// solver.add_initial_belief(BeliefState::uniform(2));
/// solver.add_initial_belief(BeliefState::point(2, 0));
/// solver.add_initial_belief(BeliefState::point(2, 1));
///
/// let policy = solver.solve(&model).unwrap();
/// assert_eq!(policy.best_action(&BeliefState::uniform(2)), Some(LISTEN));
/// ```
pub struct PbviSolver {
    /// Configuration for the solver.
    config: PbviConfig,

    /// Beliefs that seed every solve.
    initial_beliefs: Vec<BeliefState>,

    /// Belief pool of the last successful solve.
    beliefs: Vec<BeliefState>,

    /// Statistics tracking.
    stats: PbviStats,

    /// Random number generator for expansion.
    rng: StdRng,

    /// Raised from another thread to stop between sweeps.
    cancel: Option<Arc<AtomicBool>>,
}

impl PbviSolver {
    /// Create a new solver with no initial beliefs.
    pub fn new(config: PbviConfig) -> Self {
        let rng = Self::make_rng(config.seed);

        Self {
            config,
            initial_beliefs: Vec::new(),
            beliefs: Vec::new(),
            stats: PbviStats::new(),
            rng,
            cancel: None,
        }
    }

    fn make_rng(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Add a belief that seeds the belief pool.
    pub fn add_initial_belief(&mut self, belief: BeliefState) {
        self.initial_beliefs.push(belief);
    }

    /// Replace the seed beliefs.
    pub fn set_initial_beliefs(&mut self, beliefs: Vec<BeliefState>) {
        self.initial_beliefs = beliefs;
    }

    /// The seed beliefs.
    pub fn initial_beliefs(&self) -> &[BeliefState] {
        &self.initial_beliefs
    }

    /// The belief pool used by the last successful solve.
    ///
    /// Empty before the first solve. After a failed solve it holds the seed
    /// beliefs.
    pub fn belief_states(&self) -> &[BeliefState] {
        &self.beliefs
    }

    /// Drop the seed beliefs, the belief pool and the statistics.
    pub fn reset(&mut self) {
        self.initial_beliefs.clear();
        self.beliefs.clear();
        self.stats = PbviStats::new();
    }

    /// The current configuration.
    pub fn config(&self) -> &PbviConfig {
        &self.config
    }

    /// Replace the configuration. Reseeds the generator when a seed is set.
    pub fn set_config(&mut self, config: PbviConfig) {
        if config.seed.is_some() {
            self.rng = Self::make_rng(config.seed);
        }
        self.config = config;
    }

    /// The expansion rule.
    pub fn expansion_rule(&self) -> ExpansionRule {
        self.config.expansion_rule
    }

    /// Set the expansion rule.
    pub fn set_expansion_rule(&mut self, rule: ExpansionRule) {
        self.config.expansion_rule = rule;
    }

    /// Sweeps per expansion round.
    pub fn update_iterations(&self) -> usize {
        self.config.effective_update_iterations()
    }

    /// Set the sweeps per round. Zero is clamped to one.
    pub fn set_update_iterations(&mut self, iterations: usize) {
        self.config.update_iterations = iterations.max(1);
    }

    /// Number of expansion rounds.
    pub fn expansion_iterations(&self) -> usize {
        self.config.effective_expansion_iterations()
    }

    /// Set the number of expansion rounds. Zero is clamped to one.
    pub fn set_expansion_iterations(&mut self, iterations: usize) {
        self.config.expansion_iterations = iterations.max(1);
    }

    /// Set the sweeps per round from a convergence threshold.
    ///
    /// See [`compute_update_iterations`]. Returns the new count.
    pub fn compute_update_iterations<M: Pomdp + ?Sized>(
        &mut self,
        model: &M,
        epsilon: f64,
    ) -> Result<usize, ConfigError> {
        let updates = compute_update_iterations(model, epsilon)?;
        self.config.update_iterations = updates;
        Ok(updates)
    }

    /// Install a flag that cancels the solve when raised.
    ///
    /// The flag is checked before every sweep.
    pub fn set_cancel_flag(&mut self, flag: Arc<AtomicBool>) {
        self.cancel = Some(flag);
    }

    /// Statistics of the last solve.
    pub fn stats(&self) -> &PbviStats {
        &self.stats
    }

    /// Solve the model.
    ///
    /// # Errors
    /// Fails when the model or an initial belief is malformed, when there are
    /// no initial beliefs, when a model lookup has no entry, or when the
    /// solve is cancelled. On failure no policy is returned and the belief
    /// pool is reset to the initial beliefs.
    pub fn solve<M: Pomdp + ?Sized>(&mut self, model: &M) -> Result<PolicyAlphaVectors, SolveError> {
        self.solve_with_callback(model, |_| {})
    }

    /// Solve with a callback for progress tracking.
    ///
    /// # Arguments
    /// * `model` - The POMDP to solve
    /// * `callback` - Called with the current statistics after every sweep
    pub fn solve_with_callback<M, F>(
        &mut self,
        model: &M,
        mut callback: F,
    ) -> Result<PolicyAlphaVectors, SolveError>
    where
        M: Pomdp + ?Sized,
        F: FnMut(&PbviStats),
    {
        let start_time = Instant::now();
        self.stats = PbviStats::new();
        self.beliefs = self.initial_beliefs.clone();

        let result = self.run(model, start_time, &mut callback);

        if result.is_err() {
            self.beliefs = self.initial_beliefs.clone();
        }

        self.stats.belief_points = self.beliefs.len();
        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        self.stats.update_rate();

        match &result {
            Ok(policy) => info!(
                sweeps = self.stats.sweeps,
                beliefs = self.stats.belief_points,
                vectors = policy.num_vectors(),
                elapsed = self.stats.elapsed_seconds,
                "pbvi solve finished"
            ),
            Err(e) => info!(error = %e, "pbvi solve failed"),
        }

        result
    }

    fn run<M, F>(
        &mut self,
        model: &M,
        start_time: Instant,
        callback: &mut F,
    ) -> Result<PolicyAlphaVectors, SolveError>
    where
        M: Pomdp + ?Sized,
        F: FnMut(&PbviStats),
    {
        check_shape(model)?;
        self.config.validate()?;

        if self.initial_beliefs.is_empty() {
            return Err(ConfigError::NoInitialBeliefs.into());
        }
        for belief in &self.initial_beliefs {
            belief.check_dimension(model.num_states())?;
        }

        let cache = BackupCache::build(model)?;
        let executor = Executor::from_config(&self.config)?;
        let horizon = model.horizon();

        info!(
            horizon = %horizon,
            states = model.num_states(),
            actions = model.num_actions(),
            observations = model.num_observations(),
            beliefs = self.beliefs.len(),
            rule = %self.config.expansion_rule,
            "pbvi solve started"
        );

        match horizon {
            Horizon::Finite { length, .. } => {
                self.solve_finite(&cache, &executor, horizon, length, start_time, callback)
            }
            Horizon::Infinite { .. } => {
                self.solve_infinite(model, &cache, &executor, horizon, start_time, callback)
            }
        }
    }

    fn solve_finite<F>(
        &mut self,
        cache: &BackupCache,
        executor: &Executor,
        horizon: Horizon,
        length: usize,
        start_time: Instant,
        callback: &mut F,
    ) -> Result<PolicyAlphaVectors, SolveError>
    where
        F: FnMut(&PbviStats),
    {
        let zeros = vec![AlphaVector::zeros(cache.num_states()); self.beliefs.len()];
        let mut stages: Vec<Vec<AlphaVector>> = Vec::with_capacity(length);

        for stage in 0..length {
            self.check_cancelled()?;

            let previous = stages.last().unwrap_or(&zeros);
            let next = executor.sweep(cache, previous, &self.beliefs);

            self.record_sweep(next.len(), Some(stage), start_time);
            debug!(stage, vectors = next.len(), "finite-horizon stage backed up");
            callback(&self.stats);

            stages.push(next);
        }

        Ok(PolicyAlphaVectors::finite(horizon, stages))
    }

    fn solve_infinite<M, F>(
        &mut self,
        model: &M,
        cache: &BackupCache,
        executor: &Executor,
        horizon: Horizon,
        start_time: Instant,
        callback: &mut F,
    ) -> Result<PolicyAlphaVectors, SolveError>
    where
        M: Pomdp + ?Sized,
        F: FnMut(&PbviStats),
    {
        let rounds = self.config.effective_expansion_iterations();
        let updates = self.config.effective_update_iterations();
        let rule = self.config.expansion_rule;

        let mut gamma = vec![AlphaVector::zeros(cache.num_states()); self.beliefs.len()];

        for round in 0..rounds {
            for _ in 0..updates {
                self.check_cancelled()?;

                gamma = executor.sweep(cache, &gamma, &self.beliefs);

                self.record_sweep(gamma.len(), None, start_time);
                callback(&self.stats);
            }
            debug!(round, sweeps = updates, vectors = gamma.len(), "update round finished");

            if rule != ExpansionRule::None {
                let added = expand(rule, model, &self.beliefs, &gamma, &mut self.rng)?;
                self.beliefs.extend(added);
                self.stats.expansions += 1;
                self.stats.belief_points = self.beliefs.len();
                debug!(round, %rule, beliefs = self.beliefs.len(), "belief set expanded");
            }
        }

        Ok(PolicyAlphaVectors::infinite(horizon, gamma))
    }

    fn record_sweep(&mut self, gamma_size: usize, stage: Option<usize>, start_time: Instant) {
        self.stats.sweeps += 1;
        self.stats.gamma_size = gamma_size;
        self.stats.stage = stage;
        self.stats.belief_points = self.beliefs.len();
        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        self.stats.update_rate();
    }

    fn check_cancelled(&self) -> Result<(), SolveError> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(SolveError::Cancelled),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tabular::{RewardKey, TabularPomdp};
    use crate::models::tiger::{tiger_pomdp, LISTEN, OPEN_LEFT, OPEN_RIGHT, TIGER_LEFT, TIGER_RIGHT};
    use crate::pomdp::belief::BeliefError;

    fn tiger_beliefs() -> Vec<BeliefState> {
        vec![
            BeliefState::point(2, TIGER_LEFT),
            BeliefState::point(2, TIGER_RIGHT),
            BeliefState::from_probs(vec![0.25, 0.75]).unwrap(),
            BeliefState::from_probs(vec![0.75, 0.25]).unwrap(),
            BeliefState::uniform(2),
        ]
    }

    fn solver_with(config: PbviConfig) -> PbviSolver {
        let mut solver = PbviSolver::new(config);
        solver.set_initial_beliefs(tiger_beliefs());
        solver
    }

    #[test]
    fn test_tiger_infinite_listens_at_uniform() {
        let model = tiger_pomdp(Horizon::infinite(0.95));
        let config = PbviConfig::new()
            .with_expansion_rule(ExpansionRule::None)
            .with_update_iterations(100)
            .with_threads(1);
        let mut solver = solver_with(config);

        let policy = solver.solve(&model).unwrap();

        println!("Tiger gamma set:");
        for alpha in policy.vectors() {
            println!("  {:?} -> {:?}", alpha.values(), alpha.action());
        }

        assert!(!policy.is_finite());
        assert_eq!(policy.vectors().len(), 5);
        assert_eq!(policy.best_action(&BeliefState::uniform(2)), Some(LISTEN));
        assert_eq!(
            policy.best_action(&BeliefState::point(2, TIGER_LEFT)),
            Some(OPEN_RIGHT)
        );
        assert_eq!(
            policy.best_action(&BeliefState::point(2, TIGER_RIGHT)),
            Some(OPEN_LEFT)
        );
        assert_eq!(solver.stats().sweeps, 100);
    }

    #[test]
    fn test_horizon_one_is_immediate_reward() {
        let model = tiger_pomdp(Horizon::finite(1));
        let mut solver = solver_with(PbviConfig::default());
        let policy = solver.solve(&model).unwrap();
        let cache = BackupCache::build(&model).unwrap();

        assert_eq!(policy.num_stages(), 1);
        let stage = policy.stage(0).unwrap();
        assert_eq!(stage.len(), 5);

        for alpha in stage {
            let action = alpha.action().unwrap();
            assert_eq!(alpha.values(), cache.gamma_a_star(action).values());
        }

        // Uniform is the last seed belief.
        assert_eq!(stage[4].action(), Some(LISTEN));
        assert_eq!(stage[0].action(), Some(OPEN_RIGHT));
    }

    #[test]
    fn test_tiger_finite_listens_first() {
        let model = tiger_pomdp(Horizon::finite(3));
        let mut solver = solver_with(PbviConfig::default());
        let policy = solver.solve(&model).unwrap();

        assert_eq!(policy.num_stages(), 3);
        let uniform = BeliefState::uniform(2);
        for t in 0..3 {
            assert_eq!(policy.action_for_time_step(&uniform, t), Some(LISTEN));
        }
        assert_eq!(solver.stats().sweeps, 3);
        assert_eq!(solver.stats().stage, Some(2));
        // Finite horizons never expand.
        assert_eq!(solver.belief_states().len(), 5);
    }

    #[test]
    fn test_sweep_is_idempotent_and_parallel_safe() {
        let model = tiger_pomdp(Horizon::infinite(0.9));
        let cache = BackupCache::build(&model).unwrap();
        let beliefs = tiger_beliefs();
        let gamma: Vec<AlphaVector> = (0..3).map(|a| cache.gamma_a_star(a).clone()).collect();

        let sequential = Executor::Sequential;
        let first = sequential.sweep(&cache, &gamma, &beliefs);
        let second = sequential.sweep(&cache, &gamma, &beliefs);
        assert_eq!(first, second);

        let parallel = Executor::Global.sweep(&cache, &gamma, &beliefs);
        assert_eq!(first, parallel);
    }

    #[test]
    fn test_expansion_grows_pool() {
        let model = tiger_pomdp(Horizon::infinite(0.95));
        let config = PbviConfig::new()
            .with_expansion_rule(ExpansionRule::RandomBeliefSelection)
            .with_expansion_iterations(3)
            .with_update_iterations(5)
            .with_seed(17);
        let mut solver = solver_with(config);

        let policy = solver.solve(&model).unwrap();

        // Each round doubles the pool, the last one included.
        assert_eq!(solver.belief_states().len(), 40);
        assert_eq!(policy.vectors().len(), 20);
        assert_eq!(solver.stats().expansions, 3);
        assert_eq!(solver.stats().sweeps, 15);
        assert_eq!(&solver.belief_states()[..5], solver.initial_beliefs());
    }

    #[test]
    fn test_default_config_expands_once() {
        let model = tiger_pomdp(Horizon::infinite(0.95));
        let mut solver = PbviSolver::new(PbviConfig::default().with_seed(3));
        solver.add_initial_belief(BeliefState::uniform(2));
        solver.add_initial_belief(BeliefState::point(2, TIGER_LEFT));

        let policy = solver.solve(&model).unwrap();

        assert_eq!(solver.stats().expansions, 1);
        assert_eq!(solver.belief_states().len(), 4);
        assert_eq!(policy.vectors().len(), 2);
    }

    #[test]
    fn test_seeded_solves_are_reproducible() {
        let model = tiger_pomdp(Horizon::infinite(0.95));
        let config = PbviConfig::new()
            .with_expansion_rule(ExpansionRule::StochasticSimulationGreedyAction)
            .with_expansion_iterations(3)
            .with_update_iterations(5)
            .with_seed(99);

        let a = solver_with(config.clone()).solve(&model).unwrap();
        let b = solver_with(config).solve(&model).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_update_iteration_formula() {
        let mut model = TabularPomdp::new(1, 1, 1, Horizon::infinite(0.95));
        model.set_transition(0, 0, 0, 1.0).unwrap();
        model.set_observation(0, 0, 0, 1.0).unwrap();
        model.set_reward(RewardKey::any(), -100.0);
        model.set_reward(RewardKey::any().with_observation(0), 100.0);

        // floor((ln 1 - ln 200) / ln 0.95) = 103
        assert_eq!(compute_update_iterations(&model, 1.0).unwrap(), 103);

        let mut solver = PbviSolver::new(PbviConfig::default());
        assert_eq!(solver.compute_update_iterations(&model, 1.0).unwrap(), 103);
        assert_eq!(solver.update_iterations(), 103);

        assert_eq!(
            compute_update_iterations(&model, 0.0),
            Err(ConfigError::InvalidEpsilon(0.0))
        );
        // A loose threshold still runs one sweep.
        assert_eq!(compute_update_iterations(&model, 1e6).unwrap(), 1);

        model.set_horizon(Horizon::finite(3));
        assert_eq!(
            compute_update_iterations(&model, 1.0),
            Err(ConfigError::InvalidDiscount(1.0))
        );
    }

    #[test]
    fn test_no_initial_beliefs() {
        let model = tiger_pomdp(Horizon::finite(2));
        let mut solver = PbviSolver::new(PbviConfig::default());
        assert_eq!(
            solver.solve(&model),
            Err(SolveError::Config(ConfigError::NoInitialBeliefs))
        );
    }

    #[test]
    fn test_failed_expansion_rolls_back_pool() {
        // T(0, 0, .) is all zero, so simulating from state 0 reaches a
        // successor the belief update cannot explain.
        let mut model = TabularPomdp::new(2, 1, 1, Horizon::infinite(0.9));
        model.set_transition(1, 0, 1, 1.0).unwrap();
        model.set_observation(0, 0, 0, 1.0).unwrap();
        model.set_observation(0, 1, 0, 1.0).unwrap();
        model.set_reward(RewardKey::any(), 1.0);

        let config = PbviConfig::new()
            .with_expansion_rule(ExpansionRule::StochasticSimulationRandomAction)
            .with_expansion_iterations(2)
            .with_seed(1);
        let mut solver = PbviSolver::new(config);
        solver.add_initial_belief(BeliefState::point(2, 0));

        let err = solver.solve(&model).unwrap_err();
        assert!(matches!(
            err,
            SolveError::Belief(BeliefError::ZeroProbabilityObservation { .. })
        ));
        assert_eq!(solver.belief_states(), solver.initial_beliefs());
    }

    #[test]
    fn test_cancellation_between_sweeps() {
        let model = tiger_pomdp(Horizon::infinite(0.95));
        let config = PbviConfig::new()
            .with_expansion_rule(ExpansionRule::None)
            .with_update_iterations(50);
        let mut solver = solver_with(config);

        let flag = Arc::new(AtomicBool::new(false));
        solver.set_cancel_flag(flag.clone());

        let raise = flag.clone();
        let result = solver.solve_with_callback(&model, |stats| {
            if stats.sweeps == 2 {
                raise.store(true, Ordering::Relaxed);
            }
        });

        assert_eq!(result, Err(SolveError::Cancelled));
        assert_eq!(solver.stats().sweeps, 2);
        assert_eq!(solver.belief_states().len(), 5);
    }

    #[test]
    fn test_belief_dimension_checked() {
        let model = tiger_pomdp(Horizon::finite(1));
        let mut solver = PbviSolver::new(PbviConfig::default());
        solver.add_initial_belief(BeliefState::uniform(3));
        assert!(matches!(
            solver.solve(&model),
            Err(SolveError::Belief(BeliefError::DimensionMismatch { .. }))
        ));
    }

    #[test]
    fn test_reset_clears_everything() {
        let model = tiger_pomdp(Horizon::finite(1));
        let mut solver = solver_with(PbviConfig::default());
        solver.solve(&model).unwrap();
        assert!(!solver.belief_states().is_empty());

        solver.reset();
        assert!(solver.initial_beliefs().is_empty());
        assert!(solver.belief_states().is_empty());
        assert_eq!(solver.stats().sweeps, 0);
    }

    #[test]
    fn test_setters_clamp_zero() {
        let mut solver = PbviSolver::new(PbviConfig::default());
        solver.set_update_iterations(0);
        solver.set_expansion_iterations(0);
        solver.set_expansion_rule(ExpansionRule::GreedyErrorReduction);
        assert_eq!(solver.update_iterations(), 1);
        assert_eq!(solver.expansion_iterations(), 1);
        assert_eq!(solver.expansion_rule(), ExpansionRule::GreedyErrorReduction);
    }
}
