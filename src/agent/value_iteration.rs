use log::{debug, trace};
use ndarray::Array1;

use crate::agent::Agent;
use crate::config::ValueIterationConfig;
use crate::env::{Env, EnvError};
use crate::model::EmpiricalModel;
use crate::utils::argmax;

/// Value iteration over an empirical model of the environment.
///
/// Random steps fill the reward and transition-count tables, then one
/// synchronous Bellman sweep recomputes the value of every state. The model
/// keeps growing across iterations, so the values converge as the outer
/// loop goes on.
pub struct ValueIterationAgent<E: Env> {
    env: E,
    state: usize,
    model: EmpiricalModel,
    values: Array1<f64>,
    discount_factor: f64,
    samples_per_iteration: usize,
    learn_during_evaluation: bool,
    n_actions: usize,
}

impl<E: Env> ValueIterationAgent<E> {
    pub fn new(mut env: E, config: ValueIterationConfig) -> Self {
        let state = env.reset();
        let n_actions = env.action_space().n;
        let n_states = env.observation_space().n;
        Self {
            env,
            state,
            model: EmpiricalModel::new(),
            values: Array1::zeros(n_states),
            discount_factor: config.discount_factor,
            samples_per_iteration: config.samples_per_iteration,
            learn_during_evaluation: config.learn_during_evaluation,
            n_actions,
        }
    }

    /// Takes `n` random steps and records every transition in the model.
    pub fn collect_samples(&mut self, n: usize) -> Result<(), EnvError> {
        for _ in 0..n {
            let action = self.env.sample_action();
            let step = self.env.step(action)?;
            self.model
                .add_info(self.state, action, step.reward, step.next_state);
            trace!(
                "sampled {} --{}--> {} (reward {})",
                self.state,
                action,
                step.next_state,
                step.reward
            );
            self.state = if step.done {
                self.env.reset()
            } else {
                step.next_state
            };
        }
        Ok(())
    }

    /// Value of a state, zero outside the observation space.
    pub fn state_value(&self, state: usize) -> f64 {
        self.values.get(state).copied().unwrap_or(0.0)
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Expected return of `action` in `state` under the empirical model:
    /// `Σ p(s') · (r(s, a, s') + γ·V[s'])`, zero for unobserved pairs.
    pub fn action_value(&self, state: usize, action: usize) -> f64 {
        self.model
            .transitions(state, action)
            .iter()
            .map(|(next_state, prob)| {
                prob * (self.model.reward(state, action, *next_state)
                    + self.discount_factor * self.state_value(*next_state))
            })
            .sum()
    }

    /// One synchronous Bellman sweep over the whole observation space.
    /// Returns the largest change of any state value.
    pub fn value_iteration_sweep(&mut self) -> f64 {
        let new_values: Array1<f64> = Array1::from_shape_fn(self.values.len(), |state| {
            argmax((0..self.n_actions).map(|a| self.action_value(state, a)))
                .map(|(_, value)| value)
                .unwrap_or(0.0)
        });
        let delta = new_values
            .iter()
            .zip(self.values.iter())
            .fold(0.0_f64, |acc, (new, old)| acc.max((new - old).abs()));
        self.values = new_values;
        debug!("value iteration sweep, max change {:.6}", delta);
        delta
    }

    /// Action with the highest `action_value`, the lowest action wins on ties.
    pub fn greedy_action(&self, state: usize) -> usize {
        argmax((0..self.n_actions).map(|a| self.action_value(state, a)))
            .map(|(action, _)| action)
            .unwrap_or(0)
    }

    pub fn model(&self) -> &EmpiricalModel {
        &self.model
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    /// Plays one episode with the greedy policy. Unless disabled in the
    /// config, every played transition also goes into the model.
    pub fn play_episode(&mut self, env: &mut dyn Env) -> Result<f64, EnvError> {
        let mut state: usize = env.reset();
        let mut total_reward: f64 = 0.0;
        loop {
            let action = self.greedy_action(state);
            let step = env.step(action)?;
            if self.learn_during_evaluation {
                self.model
                    .add_info(state, action, step.reward, step.next_state);
            }
            total_reward += step.reward;
            if step.done {
                break;
            }
            state = step.next_state;
        }
        Ok(total_reward)
    }
}

impl<E: Env> Agent for ValueIterationAgent<E> {
    fn learn(&mut self) -> Result<(), EnvError> {
        self.collect_samples(self.samples_per_iteration)?;
        self.value_iteration_sweep();
        Ok(())
    }

    fn greedy(&self, state: usize) -> usize {
        self.greedy_action(state)
    }

    fn evaluate(&mut self, env: &mut dyn Env) -> Result<f64, EnvError> {
        self.play_episode(env)
    }

    fn name(&self) -> &str {
        "value-iteration"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::FrozenLakeEnv;

    fn agent(slippery: bool, learn_during_evaluation: bool) -> ValueIterationAgent<FrozenLakeEnv> {
        let env = FrozenLakeEnv::new(&FrozenLakeEnv::MAP_4X4, slippery, 100, Some(21)).unwrap();
        ValueIterationAgent::new(
            env,
            ValueIterationConfig {
                learn_during_evaluation,
                ..Default::default()
            },
        )
    }

    #[test]
    fn unobserved_pairs_have_zero_value() {
        let agent = agent(true, true);
        assert_eq!(agent.values().len(), 16);
        for s in 0..16 {
            for a in 0..4 {
                assert_eq!(agent.action_value(s, a), 0.0);
            }
            assert_eq!(agent.greedy_action(s), 0);
        }
    }

    #[test]
    fn action_value_is_frequency_weighted() {
        let mut agent = agent(true, true);
        agent.collect_samples(2000).unwrap();
        agent.value_iteration_sweep();
        for s in 0..16 {
            for a in 0..4 {
                let dist = agent.model().transitions(s, a);
                if dist.is_empty() {
                    continue;
                }
                let total: f64 = dist.iter().map(|(_, p)| p).sum();
                assert!((total - 1.0).abs() < 1e-9);
                let expected: f64 = dist
                    .iter()
                    .map(|(n, p)| {
                        p * (agent.model().reward(s, a, *n) + 0.9 * agent.state_value(*n))
                    })
                    .sum();
                assert!((agent.action_value(s, a) - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn sweeps_without_new_samples_converge() {
        let mut agent = agent(true, true);
        agent.collect_samples(5000).unwrap();
        let mut previous = agent.value_iteration_sweep();
        for _ in 0..200 {
            let delta = agent.value_iteration_sweep();
            // the Bellman operator is a γ-contraction
            assert!(delta <= 0.9 * previous + 1e-12);
            previous = delta;
        }
        assert!(previous < 1e-6);
    }

    #[test]
    fn deterministic_lake_is_solved() {
        let mut agent = agent(false, true);
        for _ in 0..200 {
            agent.learn().unwrap();
        }
        // the square next to the goal goes right
        assert_eq!(agent.greedy_action(14), 2);
        assert!((agent.state_value(14) - 1.0).abs() < 1e-12);
        let mut test_env =
            FrozenLakeEnv::new(&FrozenLakeEnv::MAP_4X4, false, 100, Some(4)).unwrap();
        assert_eq!(agent.evaluate(&mut test_env).unwrap(), 1.0);
    }

    #[test]
    fn evaluation_updates_the_model_only_when_enabled() {
        let mut test_env = FrozenLakeEnv::new(&FrozenLakeEnv::MAP_4X4, false, 10, Some(4)).unwrap();

        let mut learning = agent(false, true);
        learning.evaluate(&mut test_env).unwrap();
        // greedy is LEFT everywhere: bumps into the wall until truncation
        assert_eq!(learning.model().count(0, 0, 0), 10);

        let mut frozen = agent(false, false);
        frozen.evaluate(&mut test_env).unwrap();
        assert_eq!(frozen.model().total(0, 0), 0);
    }
}
