mod frozen_lake;
mod space;

use thiserror::Error;

pub use frozen_lake::FrozenLakeEnv;
pub use space::Discrete;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("environment is not ready to receive actions, call reset first")]
    NotReady,

    #[error("invalid action {action}, the action space has {n} actions")]
    InvalidAction { action: usize, n: usize },

    #[error("invalid map: {0}")]
    InvalidMap(String),
}

/// Extra information returned alongside every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInfo {
    /// Probability of the realised outcome under the environment dynamics.
    pub prob: f64,
    /// The episode ended because the step limit was reached.
    pub truncated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub next_state: usize,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

/// A fully discrete environment: states and actions are indices.
pub trait Env {
    fn reset(&mut self) -> usize;

    fn step(&mut self, action: usize) -> Result<Step, EnvError>;

    fn action_space(&self) -> Discrete;

    fn observation_space(&self) -> Discrete;

    /// Draws a uniformly random action from the action space.
    fn sample_action(&mut self) -> usize;

    fn render(&self) -> String;

    fn action_label(&self, action: usize) -> String {
        action.to_string()
    }
}
