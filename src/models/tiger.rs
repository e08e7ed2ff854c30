//! The tiger problem, used to validate the solvers.
//!
//! The tiger problem is the classic small POMDP with a known optimal
//! behaviour, which makes it a good check for any solver.
//!
//! ## Problem
//!
//! - 2 states: the tiger is behind the left door (0) or the right door (1)
//! - 3 actions: listen (0), open left (1), open right (2)
//! - 2 observations: hear the tiger on the left (0) or on the right (1)
//! - Listening costs 1 and reports the correct side with probability 0.85
//! - Opening the tiger's door costs 100, opening the other door pays 10
//! - Opening either door resets the problem: the tiger is placed uniformly
//!   at random and the observation is uninformative
//!
//! ## Known Behaviour
//!
//! - At the uniform belief the agent listens
//! - Once confident about the tiger's side it opens the other door

use crate::models::entity::EntityLabel;
use crate::models::tabular::{RewardKey, RewardTable, TabularPomdp};
use crate::pomdp::model::Horizon;

/// State: tiger behind the left door.
pub const TIGER_LEFT: usize = 0;
/// State: tiger behind the right door.
pub const TIGER_RIGHT: usize = 1;

/// Action: listen for the tiger.
pub const LISTEN: usize = 0;
/// Action: open the left door.
pub const OPEN_LEFT: usize = 1;
/// Action: open the right door.
pub const OPEN_RIGHT: usize = 2;

/// Observation: the tiger was heard on the left.
pub const HEAR_LEFT: usize = 0;
/// Observation: the tiger was heard on the right.
pub const HEAR_RIGHT: usize = 1;

/// Probability that listening reports the correct side.
pub const LISTEN_ACCURACY: f64 = 0.85;

/// Build the tiger problem with the given horizon.
pub fn tiger_pomdp(horizon: Horizon) -> TabularPomdp {
    let reset = vec![0.5, 0.5];
    let uninformative = vec![0.5, 0.5];

    // transitions[s][a][s']
    let transitions = vec![
        vec![vec![1.0, 0.0], reset.clone(), reset.clone()],
        vec![vec![0.0, 1.0], reset.clone(), reset],
    ];

    // observations[a][s'][z]
    let hear_left = vec![LISTEN_ACCURACY, 1.0 - LISTEN_ACCURACY];
    let hear_right = vec![1.0 - LISTEN_ACCURACY, LISTEN_ACCURACY];
    let observations = vec![
        vec![hear_left, hear_right],
        vec![uninformative.clone(), uninformative.clone()],
        vec![uninformative.clone(), uninformative],
    ];

    let mut rewards = RewardTable::new();
    rewards.set(RewardKey::any().with_action(LISTEN), -1.0);
    rewards.set(RewardKey::any().with_state(TIGER_LEFT).with_action(OPEN_LEFT), -100.0);
    rewards.set(RewardKey::any().with_state(TIGER_RIGHT).with_action(OPEN_LEFT), 10.0);
    rewards.set(RewardKey::any().with_state(TIGER_LEFT).with_action(OPEN_RIGHT), 10.0);
    rewards.set(RewardKey::any().with_state(TIGER_RIGHT).with_action(OPEN_RIGHT), -100.0);

    let mut model = TabularPomdp::from_tables(horizon, transitions, observations, rewards);
    model.label_all(
        ["tiger-left", "tiger-right"].map(EntityLabel::named).to_vec(),
        ["listen", "open-left", "open-right"].map(EntityLabel::named).to_vec(),
        ["hear-left", "hear-right"].map(EntityLabel::named).to_vec(),
    );
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pomdp::Pomdp;

    #[test]
    fn test_tiger_is_valid() {
        let model = tiger_pomdp(Horizon::infinite(0.95));
        model.validate().unwrap();

        assert_eq!(model.num_states(), 2);
        assert_eq!(model.num_actions(), 3);
        assert_eq!(model.num_observations(), 2);
        assert_eq!(model.reward_min(), -100.0);
        assert_eq!(model.reward_max(), 10.0);
    }

    #[test]
    fn test_tiger_rewards() {
        let model = tiger_pomdp(Horizon::finite(1));
        for s in 0..2 {
            for sp in 0..2 {
                for z in 0..2 {
                    assert_eq!(model.reward(s, LISTEN, sp, z), Some(-1.0));
                }
            }
        }
        assert_eq!(model.reward(TIGER_LEFT, OPEN_LEFT, TIGER_RIGHT, HEAR_LEFT), Some(-100.0));
        assert_eq!(model.reward(TIGER_LEFT, OPEN_RIGHT, TIGER_LEFT, HEAR_RIGHT), Some(10.0));
    }

    #[test]
    fn test_tiger_labels() {
        let model = tiger_pomdp(Horizon::finite(1));
        assert_eq!(model.action_name(LISTEN), "listen");
        assert_eq!(model.state_name(TIGER_RIGHT), "tiger-right");
        assert_eq!(model.observation_name(HEAR_LEFT), "hear-left");
    }
}
