//! Top-level error type for a solve.

use thiserror::Error;

use crate::pomdp::belief::BeliefError;
use crate::pomdp::config::ConfigError;
use crate::pomdp::model::ModelError;

/// Any error that aborts a solve.
///
/// A failed solve returns no policy and leaves the solver's belief pool as it
/// was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// The model is malformed or missing a table entry.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// A belief could not be built or updated.
    #[error("belief error: {0}")]
    Belief(#[from] BeliefError),

    /// The solver configuration is unusable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The cancel flag was raised between sweeps.
    #[error("solve was cancelled")]
    Cancelled,
}
