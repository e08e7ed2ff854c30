//! Alpha vectors: the linear pieces of a PWLC value function.
//!
//! An alpha vector assigns a value to every state and carries the action to
//! take when it is the maximizing vector at a belief:
//!
//! ```text
//! V(b) = max_α Σ_s b(s) · α(s)
//! ```

use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::pomdp::belief::BeliefState;

/// A linear functional over states tagged with an action.
///
/// Unset entries are zero. Setting an entry past the current dimension grows
/// the vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlphaVector {
    values: Vec<f64>,
    action: Option<usize>,
}

impl AlphaVector {
    /// The zero vector over `num_states` states with no action.
    pub fn zeros(num_states: usize) -> Self {
        Self {
            values: vec![0.0; num_states],
            action: None,
        }
    }

    /// Create an alpha vector from explicit values.
    pub fn from_values(values: Vec<f64>, action: Option<usize>) -> Self {
        Self { values, action }
    }

    /// Set the value of a state.
    pub fn set(&mut self, state: usize, value: f64) {
        if state >= self.values.len() {
            self.values.resize(state + 1, 0.0);
        }
        self.values[state] = value;
    }

    /// Value of a state. Unset states are 0.
    pub fn get(&self, state: usize) -> f64 {
        self.values.get(state).copied().unwrap_or(0.0)
    }

    /// The action to take when this vector is maximal.
    pub fn action(&self) -> Option<usize> {
        self.action
    }

    /// Set the action tag.
    pub fn set_action(&mut self, action: usize) {
        self.action = Some(action);
    }

    /// Builder form of [`set_action`](Self::set_action).
    pub fn with_action(mut self, action: usize) -> Self {
        self.action = Some(action);
        self
    }

    /// Number of stored entries.
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// The stored values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Dot product with a belief: `Σ_s b(s) · α(s)`.
    pub fn compute_value(&self, belief: &BeliefState) -> f64 {
        belief
            .probs()
            .iter()
            .zip(self.values.iter())
            .map(|(&p, &v)| p * v)
            .sum()
    }

    /// Whether this vector is at least as large as `other` in every state.
    pub fn dominates(&self, other: &AlphaVector) -> bool {
        let n = self.values.len().max(other.values.len());
        (0..n).all(|s| self.get(s) >= other.get(s))
    }

    /// Cross-sum (Minkowski sum) of two sets of alpha vectors.
    ///
    /// Returns `|a| · |b|` vectors in row-major order: element `i * |b| + j`
    /// is `a[i] + b[j]`. Results carry no action; the caller tags them.
    pub fn cross_sum(a: &[AlphaVector], b: &[AlphaVector]) -> Vec<AlphaVector> {
        let mut result = Vec::with_capacity(a.len() * b.len());
        for left in a {
            for right in b {
                let mut sum = left + right;
                sum.action = None;
                result.push(sum);
            }
        }
        result
    }

    fn zip_with(&self, other: &AlphaVector, op: impl Fn(f64, f64) -> f64) -> Vec<f64> {
        let n = self.values.len().max(other.values.len());
        (0..n).map(|s| op(self.get(s), other.get(s))).collect()
    }
}

/// Index and value of the first alpha vector that is maximal at `belief`.
///
/// Ties go to the earliest vector. Returns `None` for an empty set.
pub fn best_alpha(gamma: &[AlphaVector], belief: &BeliefState) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, alpha) in gamma.iter().enumerate() {
        let value = alpha.compute_value(belief);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((i, value)),
        }
    }
    best
}

/// The result keeps the left operand's action.
impl Add<&AlphaVector> for &AlphaVector {
    type Output = AlphaVector;

    fn add(self, other: &AlphaVector) -> AlphaVector {
        AlphaVector {
            values: self.zip_with(other, |x, y| x + y),
            action: self.action,
        }
    }
}

/// The result keeps the left operand's action.
impl Sub<&AlphaVector> for &AlphaVector {
    type Output = AlphaVector;

    fn sub(self, other: &AlphaVector) -> AlphaVector {
        AlphaVector {
            values: self.zip_with(other, |x, y| x - y),
            action: self.action,
        }
    }
}

impl AddAssign<&AlphaVector> for AlphaVector {
    fn add_assign(&mut self, other: &AlphaVector) {
        if other.values.len() > self.values.len() {
            self.values.resize(other.values.len(), 0.0);
        }
        for (v, &o) in self.values.iter_mut().zip(other.values.iter()) {
            *v += o;
        }
    }
}

impl SubAssign<&AlphaVector> for AlphaVector {
    fn sub_assign(&mut self, other: &AlphaVector) {
        if other.values.len() > self.values.len() {
            self.values.resize(other.values.len(), 0.0);
        }
        for (v, &o) in self.values.iter_mut().zip(other.values.iter()) {
            *v -= o;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha(values: &[f64]) -> AlphaVector {
        AlphaVector::from_values(values.to_vec(), None)
    }

    #[test]
    fn test_set_get_defaults_to_zero() {
        let mut a = AlphaVector::default();
        assert_eq!(a.get(3), 0.0);
        a.set(2, 5.0);
        assert_eq!(a.dimension(), 3);
        assert_eq!(a.get(0), 0.0);
        assert_eq!(a.get(2), 5.0);
    }

    #[test]
    fn test_compute_value_with_unset_entries() {
        let b = BeliefState::from_probs(vec![0.2, 0.3, 0.5]).unwrap();
        let mut a = AlphaVector::default();
        a.set(0, 10.0);
        // States 1 and 2 unset, so only 0.2 * 10 contributes.
        assert!((a.compute_value(&b) - 2.0).abs() < 1e-12);

        a.set(2, -4.0);
        assert!((a.compute_value(&b) - (2.0 - 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_add_sub_mixed_dimensions() {
        let a = alpha(&[1.0, 2.0]).with_action(1);
        let b = alpha(&[0.5, 0.5, 3.0]);

        let sum = &a + &b;
        assert_eq!(sum.values(), &[1.5, 2.5, 3.0]);
        assert_eq!(sum.action(), Some(1));

        let diff = &a - &b;
        assert_eq!(diff.values(), &[0.5, 1.5, -3.0]);

        let mut acc = a.clone();
        acc += &b;
        assert_eq!(acc, sum);
        acc -= &b;
        assert_eq!(acc.values(), &[1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_cross_sum_cardinality_and_values() {
        let a = vec![alpha(&[1.0, 0.0]).with_action(0), alpha(&[0.0, 1.0]).with_action(1)];
        let b = vec![alpha(&[10.0, 10.0]), alpha(&[20.0, 0.0]), alpha(&[0.0, 30.0])];

        let result = AlphaVector::cross_sum(&a, &b);
        assert_eq!(result.len(), a.len() * b.len());

        for (i, left) in a.iter().enumerate() {
            for (j, right) in b.iter().enumerate() {
                let v = &result[i * b.len() + j];
                for s in 0..2 {
                    assert_eq!(v.get(s), left.get(s) + right.get(s));
                }
                assert_eq!(v.action(), None);
            }
        }
    }

    #[test]
    fn test_cross_sum_with_empty_set() {
        let a = vec![alpha(&[1.0])];
        assert!(AlphaVector::cross_sum(&a, &[]).is_empty());
        assert!(AlphaVector::cross_sum(&[], &a).is_empty());
    }

    #[test]
    fn test_best_alpha_first_seen_tie_break() {
        let b = BeliefState::uniform(2);
        let gamma = vec![alpha(&[1.0, 1.0]), alpha(&[2.0, 0.0]), alpha(&[0.0, 0.0])];
        // Both of the first two score 1.0; the earlier one wins.
        assert_eq!(best_alpha(&gamma, &b), Some((0, 1.0)));
        assert_eq!(best_alpha(&[], &b), None);
    }

    #[test]
    fn test_dominates() {
        let a = alpha(&[1.0, 2.0]);
        let b = alpha(&[1.0, 1.0]);
        assert!(a.dominates(&b));
        assert!(!b.dominates(&a));
        assert!(a.dominates(&a));
    }
}
