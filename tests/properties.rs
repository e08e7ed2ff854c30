//! Property-based tests for beliefs, alpha vectors and backups.
//!
//! Uses proptest to verify the invariants hold across many random inputs.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use pbvi_solver::models::tiger::tiger_pomdp;
use pbvi_solver::pomdp::backup::{best_backup, full_backup, BackupCache, Projections};
use pbvi_solver::pomdp::expansion::{expand, random_belief};
use pbvi_solver::pomdp::{
    belief_update, observation_probability, AlphaVector, BeliefState, ExpansionRule, Horizon,
};

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-9;

fn assert_distribution(belief: &BeliefState) -> Result<(), TestCaseError> {
    let sum: f64 = belief.probs().iter().sum();
    prop_assert!((sum - 1.0).abs() < TOL, "belief {:?} sums to {}", belief, sum);
    for &p in belief.probs() {
        prop_assert!(p >= 0.0, "negative entry in {:?}", belief);
    }
    Ok(())
}

fn belief_strategy() -> impl Strategy<Value = BeliefState> {
    (0.0..=1.0f64).prop_map(|p| BeliefState::from_probs(vec![p, 1.0 - p]).unwrap())
}

fn alpha_strategy(dim: usize) -> impl Strategy<Value = AlphaVector> {
    prop::collection::vec(-100.0..100.0f64, dim).prop_map(|v| AlphaVector::from_values(v, None))
}

// ============================================================================
// Belief properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Random simplex points are valid distributions.
    #[test]
    fn random_belief_is_distribution(n in 1usize..8, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let belief = random_belief(n, &mut rng);
        prop_assert_eq!(belief.num_states(), n);
        assert_distribution(&belief)?;
    }
}

proptest! {
    /// Every possible update of a valid belief is a valid belief.
    #[test]
    fn belief_update_preserves_distribution(
        belief in belief_strategy(),
        action in 0usize..3,
        observation in 0usize..2,
    ) {
        let model = tiger_pomdp(Horizon::infinite(0.95));
        let p = observation_probability(&model, &belief, action, observation).unwrap();
        prop_assume!(p > 1e-12);

        let next = belief_update(&model, &belief, action, observation).unwrap();
        assert_distribution(&next)?;
    }

    /// Observation probabilities of one action sum to one.
    #[test]
    fn observation_probabilities_sum_to_one(belief in belief_strategy(), action in 0usize..3) {
        let model = tiger_pomdp(Horizon::infinite(0.95));
        let total: f64 = (0..2)
            .map(|z| observation_probability(&model, &belief, action, z).unwrap())
            .sum();
        prop_assert!((total - 1.0).abs() < TOL);
    }

    /// Every expansion rule produces valid beliefs, one per pool member.
    #[test]
    fn expansion_preserves_distribution(
        pool in prop::collection::vec(belief_strategy(), 1..6),
        seed in any::<u64>(),
    ) {
        let model = tiger_pomdp(Horizon::infinite(0.95));
        let gamma = vec![
            AlphaVector::from_values(vec![-1.0, -1.0], Some(0)),
            AlphaVector::from_values(vec![-100.0, 10.0], Some(1)),
            AlphaVector::from_values(vec![10.0, -100.0], Some(2)),
        ];

        for rule in ExpansionRule::ALL {
            let mut rng = StdRng::seed_from_u64(seed);
            let added = expand(rule, &model, &pool, &gamma, &mut rng).unwrap();
            if rule != ExpansionRule::None {
                prop_assert_eq!(added.len(), pool.len());
            }
            for belief in &added {
                assert_distribution(belief)?;
            }
        }
    }
}

// ============================================================================
// Alpha vector properties
// ============================================================================

proptest! {
    /// Cross-sum has |A|·|B| members with (i, j) = A[i] + B[j].
    #[test]
    fn cross_sum_cardinality_and_values(
        a in prop::collection::vec(alpha_strategy(3), 0..5),
        b in prop::collection::vec(alpha_strategy(3), 0..5),
    ) {
        let sum = AlphaVector::cross_sum(&a, &b);
        prop_assert_eq!(sum.len(), a.len() * b.len());
        for (i, left) in a.iter().enumerate() {
            for (j, right) in b.iter().enumerate() {
                for s in 0..3 {
                    prop_assert_eq!(sum[i * b.len() + j].get(s), left.get(s) + right.get(s));
                }
            }
        }
    }

    /// The dot product is linear in the vector.
    #[test]
    fn compute_value_is_linear(
        belief in belief_strategy(),
        a in alpha_strategy(2),
        b in alpha_strategy(2),
    ) {
        let sum = &a + &b;
        let expected = a.compute_value(&belief) + b.compute_value(&belief);
        prop_assert!((sum.compute_value(&belief) - expected).abs() < 1e-6);
    }
}

// ============================================================================
// Backup properties
// ============================================================================

proptest! {
    /// The point-based backup is the best member of the exact backup at its belief.
    #[test]
    fn point_backup_is_best_exact_vector(
        belief in belief_strategy(),
        gamma in prop::collection::vec(alpha_strategy(2), 1..4),
    ) {
        let model = tiger_pomdp(Horizon::infinite(0.9));
        let cache = BackupCache::build(&model).unwrap();
        let projections = Projections::compute(&cache, &gamma);

        let point = best_backup(&cache, &projections, &belief);
        let best_exact = (0..3)
            .flat_map(|a| full_backup(&cache, &projections, a))
            .map(|alpha| alpha.compute_value(&belief))
            .fold(f64::NEG_INFINITY, f64::max);

        prop_assert!((point.compute_value(&belief) - best_exact).abs() < 1e-6);
    }

    /// Backing up the same belief against the same set is deterministic.
    #[test]
    fn backup_is_idempotent(
        belief in belief_strategy(),
        gamma in prop::collection::vec(alpha_strategy(2), 1..4),
    ) {
        let model = tiger_pomdp(Horizon::infinite(0.9));
        let cache = BackupCache::build(&model).unwrap();
        let projections = Projections::compute(&cache, &gamma);

        let first = best_backup(&cache, &projections, &belief);
        let second = best_backup(&cache, &projections, &belief);
        prop_assert_eq!(first, second);
    }
}
