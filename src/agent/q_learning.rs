use log::trace;

use crate::agent::Agent;
use crate::config::QLearningConfig;
use crate::env::{Env, EnvError};
use crate::policy::TabularPolicy;

/// Tabular Q-learning driven by uniformly random behaviour.
///
/// Each learning phase takes a single random step in the agent's own
/// environment and applies the temporal-difference update
/// `Q[s,a] = (1-α)·Q[s,a] + α·(r + γ·max_a' Q[s',a'])`.
pub struct QLearningAgent<E: Env> {
    env: E,
    state: usize,
    policy: TabularPolicy,
    learning_rate: f64,
    discount_factor: f64,
    n_actions: usize,
}

impl<E: Env> QLearningAgent<E> {
    pub fn new(mut env: E, config: QLearningConfig) -> Self {
        let state = env.reset();
        let n_actions = env.action_space().n;
        Self {
            env,
            state,
            policy: TabularPolicy::new(0.0),
            learning_rate: config.learning_rate,
            discount_factor: config.discount_factor,
            n_actions,
        }
    }

    /// Takes one random action from the current state and returns
    /// `(state, action, reward, next_state)`. The environment is reset when
    /// the episode ends.
    pub fn sample_transition(&mut self) -> Result<(usize, usize, f64, usize), EnvError> {
        let action = self.env.sample_action();
        let state = self.state;
        let step = self.env.step(action)?;
        self.state = if step.done {
            self.env.reset()
        } else {
            step.next_state
        };
        Ok((state, action, step.reward, step.next_state))
    }

    /// Blends the one-step target into `Q[state, action]` and returns the
    /// new value.
    pub fn update(&mut self, state: usize, action: usize, reward: f64, next_state: usize) -> f64 {
        let (best_next_value, _) = self.greedy_action(next_state);
        let value = (1.0 - self.learning_rate) * self.policy.get(state, action)
            + self.learning_rate * (reward + self.discount_factor * best_next_value);
        self.policy.set(state, action, value);
        trace!("Q[{}, {}] = {:.5}", state, action, value);
        value
    }

    /// `(best_value, best_action)` in `state`, the lowest action wins on ties.
    pub fn greedy_action(&self, state: usize) -> (f64, usize) {
        self.policy.best(state, self.n_actions)
    }

    pub fn value(&self, state: usize, action: usize) -> f64 {
        self.policy.get(state, action)
    }

    pub fn policy(&self) -> &TabularPolicy {
        &self.policy
    }

    /// Current position of the training environment.
    pub fn state(&self) -> usize {
        self.state
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    /// Plays one episode with the greedy policy. Nothing is learned here.
    pub fn play_episode(&self, env: &mut dyn Env) -> Result<f64, EnvError> {
        let mut state: usize = env.reset();
        let mut total_reward: f64 = 0.0;
        loop {
            let (_, action) = self.greedy_action(state);
            let step = env.step(action)?;
            total_reward += step.reward;
            if step.done {
                break;
            }
            state = step.next_state;
        }
        Ok(total_reward)
    }
}

impl<E: Env> Agent for QLearningAgent<E> {
    fn learn(&mut self) -> Result<(), EnvError> {
        let (state, action, reward, next_state) = self.sample_transition()?;
        self.update(state, action, reward, next_state);
        Ok(())
    }

    fn greedy(&self, state: usize) -> usize {
        self.greedy_action(state).1
    }

    fn evaluate(&mut self, env: &mut dyn Env) -> Result<f64, EnvError> {
        self.play_episode(env)
    }

    fn name(&self) -> &str {
        "q-learning"
    }
}
