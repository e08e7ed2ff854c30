//! Exact value iteration over alpha vectors.
//!
//! Each iteration replaces Γ by the union over actions of the exact backup
//! Γ_a. Without pruning the set grows as `|A| · |Γ|^|Z|` per iteration, so
//! this is only practical for small models and short horizons; it serves as a
//! reference for the point-based solver.

use std::time::Instant;

use tracing::{debug, info};

use crate::pomdp::alpha::AlphaVector;
use crate::pomdp::backup::{full_backup, prune_dominated, BackupCache, Projections};
use crate::pomdp::error::SolveError;
use crate::pomdp::model::{check_shape, Horizon, Pomdp};
use crate::pomdp::policy::PolicyAlphaVectors;

/// Exact value iteration solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueIteration {
    /// Iterations for infinite horizons. Finite horizons run one per stage.
    pub iterations: usize,

    /// Remove duplicate and pointwise-dominated vectors after every iteration.
    pub prune: bool,
}

impl Default for ValueIteration {
    fn default() -> Self {
        Self {
            iterations: 1,
            prune: true,
        }
    }
}

impl ValueIteration {
    /// Create a solver running `iterations` rounds on infinite horizons.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations: iterations.max(1),
            ..Default::default()
        }
    }

    /// Builder method: enable or disable pruning.
    pub fn with_prune(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    /// Solve the model.
    ///
    /// Finite horizons store every stage; infinite horizons store the final
    /// gamma set.
    pub fn solve<M: Pomdp + ?Sized>(&self, model: &M) -> Result<PolicyAlphaVectors, SolveError> {
        check_shape(model)?;
        let cache = BackupCache::build(model)?;
        let start_time = Instant::now();
        let horizon = model.horizon();

        let iterations = horizon.length().unwrap_or(self.iterations.max(1));
        let mut gamma = vec![AlphaVector::zeros(cache.num_states())];
        let mut stages = Vec::new();

        for iteration in 0..iterations {
            gamma = self.iterate(&cache, &gamma);
            debug!(iteration, vectors = gamma.len(), "value iteration step");

            if horizon.is_finite() {
                stages.push(gamma.clone());
            }
        }

        info!(
            iterations,
            vectors = gamma.len(),
            elapsed = start_time.elapsed().as_secs_f64(),
            "value iteration finished"
        );

        Ok(match horizon {
            Horizon::Finite { .. } => PolicyAlphaVectors::finite(horizon, stages),
            Horizon::Infinite { .. } => PolicyAlphaVectors::infinite(horizon, gamma),
        })
    }

    fn iterate(&self, cache: &BackupCache, gamma: &[AlphaVector]) -> Vec<AlphaVector> {
        let projections = Projections::compute(cache, gamma);
        let next: Vec<AlphaVector> = (0..cache.num_actions())
            .flat_map(|action| full_backup(cache, &projections, action))
            .collect();

        if self.prune {
            prune_dominated(next)
        } else {
            next
        }
    }
}
