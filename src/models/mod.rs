//! Model implementations for the POMDP solvers.
//!
//! This module contains concrete models that implement the `Pomdp` trait.
//! These serve as:
//!
//! 1. **Input format**: [`tabular`] stores any finite POMDP as dense tables
//!    and loads it from JSON.
//!
//! 2. **Validation**: The [`tiger`] problem has a known optimal behaviour that
//!    verifies the solvers.
//!
//! 3. **Benchmarks**: Provide standard models for performance testing.
//!
//! ## Adding New Models
//!
//! Either build a [`tabular::TabularPomdp`] or implement the `Pomdp` trait
//! directly for a model with structure worth exploiting.

pub mod entity;
pub mod tabular;
pub mod tiger;

pub use entity::EntityLabel;
pub use tabular::{LoadError, RewardKey, RewardTable, Slot, TabularPomdp};
