//! # PBVI Solver
//!
//! Point-based value iteration for finite partially observable Markov
//! decision processes (POMDPs), with exact value iteration as a reference.
//!
//! ## Features
//!
//! - **Generic Solvers**: Work with any model implementing the `Pomdp` trait
//! - **Belief Expansion**: Random, simulated and error-reduction heuristics
//! - **Finite and Infinite Horizons**: Per-stage or stationary policies
//! - **Parallel Backups**: Per-belief backups run on rayon
//! - **JSON I/O**: Load models and configurations, save policies
//!
//! ## Quick Start
//!
//! ```
//! use pbvi_solver::models::tiger::{tiger_pomdp, LISTEN};
//! use pbvi_solver::{BeliefState, Horizon, PbviConfig, PbviSolver};
//!
//! // 1. Build or load a model
//! let model = tiger_pomdp(Horizon::finite(2));
//!
//! // 2. Create a solver and seed it with beliefs
//! let mut solver = PbviSolver::new(PbviConfig::default());
//! solver.add_initial_belief(BeliefState::uniform(2));
//!
//! // 3. Solve
//! let policy = solver.solve(&model).unwrap();
//!
//! // 4. Query actions
//! assert_eq!(policy.action_for_time_step(&BeliefState::uniform(2), 0), Some(LISTEN));
//! ```
//!
//! ## Modules
//!
//! - [`pomdp`]: Beliefs, alpha vectors, backups and the solvers
//! - [`models`]: Tabular models and the tiger problem
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     PBVI Solver (Generic)                       │
//! │  - Point-based backups     - Belief expansion                   │
//! │  - Parallel sweeps         - Finite / infinite horizons         │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               │ implements Pomdp trait
//!                               ▼
//!                ┌──────────────┴──────────────┐
//!                │                             │
//!                ▼                             ▼
//!         ┌─────────────┐              ┌─────────────┐
//!         │  Tabular    │              │   Tiger     │
//!         │  (JSON)     │              │  problem    │
//!         └─────────────┘              └─────────────┘
//! ```

#![warn(missing_docs)]

/// POMDP solver module.
///
/// This is the core module containing beliefs, alpha vectors and the solvers.
pub mod pomdp;

/// Model implementations module.
///
/// Contains the tabular model and the tiger problem for testing and validation.
pub mod models;

// Re-export commonly used types at crate root for convenience
pub use pomdp::{
    AlphaVector, BeliefState, ExpansionRule, Horizon, PbviConfig, PbviSolver, PbviStats,
    PolicyAlphaVectors, Pomdp, SolveError, ValueIteration,
};
