//! POMDP value-function solvers.
//!
//! This module provides a point-based value iteration (PBVI) solver and an
//! exact value iteration solver for finite POMDPs, both producing policies as
//! sets of alpha vectors.
//!
//! # Overview
//!
//! A POMDP agent does not see the state; it tracks a belief, a probability
//! distribution over states. The optimal value function over beliefs is
//! piecewise-linear and convex, so it can be represented as the upper surface
//! of a set of alpha vectors:
//!
//! 1. Seed a set of belief points
//! 2. Back up the value function at each point (one alpha vector per belief)
//! 3. Optionally grow the belief set with an expansion heuristic and repeat
//!
//! # Usage
//!
//! 1. Implement the `Pomdp` trait for your model, or build a `TabularPomdp`
//! 2. Create a `PbviSolver` with a `PbviConfig`
//! 3. Add initial beliefs and call `solve()`
//! 4. Query the returned `PolicyAlphaVectors` for actions
//!
//! # Example
//!
//! ```
//! use pbvi_solver::models::tiger::{tiger_pomdp, LISTEN};
//! use pbvi_solver::pomdp::{BeliefState, Horizon, PbviConfig, PbviSolver};
//!
//! let model = tiger_pomdp(Horizon::finite(3));
//!
//! let mut solver = PbviSolver::new(PbviConfig::default());
//! solver.add_initial_belief(BeliefState::uniform(2));
//! solver.add_initial_belief(BeliefState::point(2, 0));
//! solver.add_initial_belief(BeliefState::point(2, 1));
//!
//! let policy = solver.solve(&model).unwrap();
//! println!("{} vectors over {} stages", policy.num_vectors(), policy.num_stages());
//! assert_eq!(policy.action_for_time_step(&BeliefState::uniform(2), 0), Some(LISTEN));
//! ```
//!
//! # Theory
//!
//! **Belief update** after action `a` and observation `z`:
//! ```text
//! b'(s') ∝ O(a, s', z) · Σ_s T(s, a, s') · b(s)
//! ```
//!
//! **Point-based backup** at belief `b`:
//! ```text
//! backup(b) = argmax_a b · (Γ_{a,*} + Σ_z argmax_{g ∈ Γ_{a,z}} b · g)
//! ```
//!
//! # References
//!
//! - Pineau, J., Gordon, G., Thrun, S. "Point-based value iteration: An anytime
//!   algorithm for POMDPs" (2003)
//! - Kaelbling, L., Littman, M., Cassandra, A. "Planning and acting in partially
//!   observable stochastic domains" (1998)

pub mod alpha;
pub mod backup;
pub mod belief;
pub mod config;
pub mod error;
pub mod expansion;
pub mod model;
pub mod policy;
pub mod solver;
pub mod value_iteration;

// Re-export main types for convenient access
pub use alpha::{best_alpha, AlphaVector};
pub use backup::{BackupCache, Projections};
pub use belief::{belief_update, observation_probability, BeliefError, BeliefState};
pub use config::{ConfigError, PbviConfig, PbviStats};
pub use error::SolveError;
pub use expansion::ExpansionRule;
pub use model::{check_shape, Horizon, ModelError, Pomdp};
pub use policy::PolicyAlphaVectors;
pub use solver::{compute_update_iterations, PbviSolver};
pub use value_iteration::ValueIteration;
