mod q_learning;
mod value_iteration;

pub use q_learning::QLearningAgent;
pub use value_iteration::ValueIterationAgent;

use crate::env::{Env, EnvError};

/// A tabular agent driven by the training loop.
pub trait Agent {
    /// One learning phase: gather experience from the agent's own
    /// environment and improve the value estimates.
    fn learn(&mut self) -> Result<(), EnvError>;

    /// Action chosen by the greedy policy in `state`.
    fn greedy(&self, state: usize) -> usize;

    /// Plays one full episode on `env` following the greedy policy and
    /// returns the cumulative reward.
    fn evaluate(&mut self, env: &mut dyn Env) -> Result<f64, EnvError>;

    fn name(&self) -> &str;
}
