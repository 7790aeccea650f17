mod property_bellman_tests;
mod value_iteration_tests;

use crate::{ActionId, Outcome, PlanningModel, StateKey};

/// A row of states where state 0 is an absorbing goal.
///
/// Action 0 steps toward the goal and action 1 steps away from it; `slip` is
/// the chance of moving the other way instead.
pub(super) struct ChainModel {
    discount: f64,
    rewards: Vec<f64>,
    actions: Vec<Vec<Vec<Outcome>>>,
}

impl ChainModel {
    pub(super) fn new(len: usize, goal: f64, living_cost: f64, discount: f64, slip: f64) -> Self {
        let mut rewards = Vec::with_capacity(len);
        let mut actions = Vec::with_capacity(len);

        for idx in 0..len {
            if idx == 0 {
                rewards.push(goal);
                actions.push(vec![vec![Outcome::new(0.0, StateKey::from(0))]]);
                continue;
            }

            let toward = StateKey::from(idx - 1);
            let away = StateKey::from((idx + 1).min(len - 1));
            rewards.push(living_cost);
            actions.push(vec![
                vec![Outcome::new(1.0 - slip, toward), Outcome::new(slip, away)],
                vec![Outcome::new(1.0 - slip, away), Outcome::new(slip, toward)],
            ]);
        }

        ChainModel {
            discount,
            rewards,
            actions,
        }
    }
}

impl PlanningModel for ChainModel {
    fn state_count(&self) -> usize {
        self.rewards.len()
    }

    fn discount(&self) -> f64 {
        self.discount
    }

    fn reward(&self, state: StateKey) -> f64 {
        self.rewards[state.index()]
    }

    fn num_actions(&self, state: StateKey) -> usize {
        self.actions.get(state.index()).map_or(0, Vec::len)
    }

    fn outcomes(&self, state: StateKey, action: ActionId) -> &[Outcome] {
        self.actions
            .get(state.index())
            .and_then(|actions| actions.get(action.index()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

pub(super) fn policy_of(actions: &[usize]) -> crate::PolicyMap {
    crate::PolicyMap::from(actions.iter().copied().map(ActionId::from).collect::<Vec<_>>())
}
