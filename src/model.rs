use fxhash::{FxBuildHasher, FxHashMap};
use indexmap::IndexMap;

use crate::policy::StateAction;

/// Composite key of the reward model.
#[derive(Hash, Debug, Clone, Copy, PartialEq, Eq, Ord, PartialOrd)]
pub struct TransitionKey {
    pub state: usize,
    pub action: usize,
    pub next_state: usize,
}

impl TransitionKey {
    pub fn new(state: usize, action: usize, next_state: usize) -> Self {
        Self {
            state,
            action,
            next_state,
        }
    }
}

/// Next-state occurrence counts, kept in the order they were first observed.
pub type NextStateCounts = IndexMap<usize, u64, FxBuildHasher>;

/// Empirical model of the environment built from observed transitions.
///
/// Rewards keep the last observed value of each `(state, action, next_state)`
/// triple. Transition counts accumulate and give the empirical distribution
/// over next states for every `(state, action)` pair.
#[derive(Debug, Clone, Default)]
pub struct EmpiricalModel {
    rewards: FxHashMap<TransitionKey, f64>,
    transitions: FxHashMap<StateAction, NextStateCounts>,
}

impl EmpiricalModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_info(&mut self, state: usize, action: usize, reward: f64, next_state: usize) {
        self.rewards
            .insert(TransitionKey::new(state, action, next_state), reward);
        *self
            .transitions
            .entry(StateAction::new(state, action))
            .or_default()
            .entry(next_state)
            .or_insert(0) += 1;
    }

    pub fn reward(&self, state: usize, action: usize, next_state: usize) -> f64 {
        self.rewards
            .get(&TransitionKey::new(state, action, next_state))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn count(&self, state: usize, action: usize, next_state: usize) -> u64 {
        self.transitions
            .get(&StateAction::new(state, action))
            .and_then(|counts| counts.get(&next_state).copied())
            .unwrap_or(0)
    }

    pub fn total(&self, state: usize, action: usize) -> u64 {
        self.transitions
            .get(&StateAction::new(state, action))
            .map(|counts| counts.values().sum())
            .unwrap_or(0)
    }

    /// Empirical next-state distribution of `(state, action)`, empty when the
    /// pair was never observed.
    pub fn transitions(&self, state: usize, action: usize) -> Vec<(usize, f64)> {
        match self.transitions.get(&StateAction::new(state, action)) {
            Some(counts) => {
                let total: u64 = counts.values().sum();
                counts
                    .iter()
                    .map(|(next_state, count)| (*next_state, *count as f64 / total as f64))
                    .collect()
            }
            None => vec![],
        }
    }
}
