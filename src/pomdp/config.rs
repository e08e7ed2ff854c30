//! Configuration options for the PBVI solver.
//!
//! This module provides the configuration struct that controls how the
//! belief set grows and how many backup sweeps run, plus the statistics the
//! solver reports while it works.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pomdp::expansion::ExpansionRule;

/// Configuration for the PBVI solver.
///
/// # Example
/// ```
/// use pbvi_solver::pomdp::{ExpansionRule, PbviConfig};
///
/// let config = PbviConfig::default();
/// assert_eq!(config.expansion_rule, ExpansionRule::RandomBeliefSelection);
/// assert_eq!(config.update_iterations, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PbviConfig {
    /// Heuristic used to grow the belief set between rounds.
    ///
    /// Only used for infinite horizons. Finite-horizon solves back up the
    /// initial beliefs exactly once per stage.
    pub expansion_rule: ExpansionRule,

    /// Number of synchronous backup sweeps per expansion round.
    ///
    /// Zero is treated as one.
    pub update_iterations: usize,

    /// Number of expansion rounds (infinite horizon only).
    ///
    /// Zero is treated as one.
    pub expansion_iterations: usize,

    /// Number of threads for the per-belief backups.
    ///
    /// Set to 0 or 1 for single-threaded execution.
    /// Set to `None` to use the global rayon pool.
    pub num_threads: Option<usize>,

    /// Random seed for reproducibility.
    ///
    /// If set, belief expansion is reproducible. If `None`, the generator is
    /// seeded from entropy.
    pub seed: Option<u64>,
}

impl Default for PbviConfig {
    fn default() -> Self {
        Self {
            expansion_rule: ExpansionRule::RandomBeliefSelection,
            update_iterations: 1,
            expansion_iterations: 1,
            num_threads: None,
            seed: None,
        }
    }
}

impl PbviConfig {
    /// Create a new PbviConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// A quick configuration for small models and tests: a few rounds of
    /// random belief selection, single-threaded and seeded.
    pub fn fast() -> Self {
        Self {
            update_iterations: 10,
            expansion_iterations: 3,
            num_threads: Some(1),
            seed: Some(0),
            ..Default::default()
        }
    }

    /// Builder method: set the expansion rule.
    pub fn with_expansion_rule(mut self, rule: ExpansionRule) -> Self {
        self.expansion_rule = rule;
        self
    }

    /// Builder method: set the sweeps per round. Zero is clamped to one.
    pub fn with_update_iterations(mut self, iterations: usize) -> Self {
        self.update_iterations = iterations.max(1);
        self
    }

    /// Builder method: set the number of expansion rounds. Zero is clamped to one.
    pub fn with_expansion_iterations(mut self, iterations: usize) -> Self {
        self.expansion_iterations = iterations.max(1);
        self
    }

    /// Builder method: set number of threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sweeps per round as actually run.
    pub fn effective_update_iterations(&self) -> usize {
        self.update_iterations.max(1)
    }

    /// Expansion rounds as actually run.
    pub fn effective_expansion_iterations(&self) -> usize {
        self.expansion_iterations.max(1)
    }

    /// Whether backups run on the calling thread only.
    pub fn is_sequential(&self) -> bool {
        matches!(self.num_threads, Some(0) | Some(1))
    }

    /// Validate the configuration and return any errors.
    ///
    /// Iteration counts of zero are accepted and treated as one; this only
    /// rejects counts too large to be meaningful.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sweeps = self
            .effective_update_iterations()
            .checked_mul(self.effective_expansion_iterations());
        if sweeps.is_none() {
            return Err(ConfigError::InvalidIterations(format!(
                "{} updates x {} expansions overflows",
                self.update_iterations, self.expansion_iterations
            )));
        }
        Ok(())
    }

    /// Parse a configuration from a JSON string and validate it.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }
}

/// Errors from an unusable solver configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Convergence threshold must be positive.
    #[error("epsilon {0} must be positive")]
    InvalidEpsilon(f64),

    /// The discount factor does not allow an update count to be derived.
    #[error("discount {0} must lie strictly between 0 and 1")]
    InvalidDiscount(f64),

    /// Iteration counts that cannot be run.
    #[error("invalid iteration counts: {0}")]
    InvalidIterations(String),

    /// An expansion rule name that is not recognised.
    #[error("unknown expansion rule '{0}'")]
    UnknownExpansionRule(String),

    /// `solve` was called without any initial belief.
    #[error("no initial beliefs: add at least one before solving")]
    NoInitialBeliefs,

    /// The dedicated thread pool could not be built.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),

    /// A configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(String),

    /// A configuration file is not valid JSON for this struct.
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

/// Statistics tracked while solving.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PbviStats {
    /// Total number of backup sweeps completed.
    pub sweeps: u64,

    /// Number of expansion rounds that grew the belief set.
    pub expansions: u64,

    /// Current number of beliefs in the pool.
    pub belief_points: usize,

    /// Size of the most recent gamma set.
    pub gamma_size: usize,

    /// Stage the last sweep produced (finite horizon only).
    pub stage: Option<usize>,

    /// Total time spent solving (in seconds).
    pub elapsed_seconds: f64,

    /// Sweeps per second.
    pub sweeps_per_second: f64,
}

impl PbviStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update sweeps per second based on elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.sweeps_per_second = self.sweeps as f64 / self.elapsed_seconds;
        }
    }
}
