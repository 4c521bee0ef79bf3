use fxhash::FxHashMap;

use crate::utils::argmax;

/// Composite key of the action-value table.
#[derive(Hash, Debug, Clone, Copy, PartialEq, Eq, Ord, PartialOrd)]
pub struct StateAction {
    pub state: usize,
    pub action: usize,
}

impl StateAction {
    pub fn new(state: usize, action: usize) -> Self {
        Self { state, action }
    }
}

/// Action-value table grown lazily: entries that were never written read as
/// the default value, and keys are never removed.
#[derive(Debug, Clone)]
pub struct TabularPolicy {
    default: f64,
    values: FxHashMap<StateAction, f64>,
}

impl Default for TabularPolicy {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl TabularPolicy {
    pub fn new(default_value: f64) -> Self {
        Self {
            default: default_value,
            values: FxHashMap::default(),
        }
    }

    pub fn get(&self, state: usize, action: usize) -> f64 {
        self.values
            .get(&StateAction::new(state, action))
            .copied()
            .unwrap_or(self.default)
    }

    pub fn set(&mut self, state: usize, action: usize, value: f64) {
        self.values.insert(StateAction::new(state, action), value);
    }

    /// Best value over `0..n_actions` in `state` with the action that reaches
    /// it; the lowest action wins on ties.
    pub fn best(&self, state: usize, n_actions: usize) -> (f64, usize) {
        match argmax((0..n_actions).map(|a| self.get(state, a))) {
            Some((action, value)) => (value, action),
            None => (self.default, 0),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
