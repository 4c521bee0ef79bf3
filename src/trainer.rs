use kdam::{tqdm, BarExt};
use log::{debug, info};

use crate::agent::Agent;
use crate::config::TrainerConfig;
use crate::env::Env;
use crate::error::Result;
use crate::metrics::MetricsSink;

/// Decides from `(iteration, mean_reward)` whether training is over.
pub type StopCondition = Box<dyn FnMut(usize, f64) -> bool>;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    pub iterations: usize,
    pub best_reward: f64,
    pub final_reward: f64,
    /// Mean evaluation reward of every iteration.
    pub history: Vec<f64>,
}

/// Alternates learning and greedy evaluation until the stop condition holds.
pub struct Trainer {
    config: TrainerConfig,
    stop: StopCondition,
}

impl Trainer {
    /// Stops as soon as the mean reward is above `config.reward_threshold`.
    pub fn new(config: TrainerConfig) -> Self {
        let threshold = config.reward_threshold;
        Self {
            config,
            stop: Box::new(move |_, reward| reward > threshold),
        }
    }

    pub fn with_stop_condition(mut self, stop: impl FnMut(usize, f64) -> bool + 'static) -> Self {
        self.stop = Box::new(stop);
        self
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Mean reward of the greedy policy over `config.test_episodes` episodes.
    pub fn evaluate(&self, agent: &mut dyn Agent, env: &mut dyn Env) -> Result<f64> {
        let mut reward: f64 = 0.0;
        for _ in 0..self.config.test_episodes {
            reward += agent.evaluate(env)?;
        }
        Ok(reward / self.config.test_episodes as f64)
    }

    pub fn run(
        &mut self,
        agent: &mut dyn Agent,
        test_env: &mut dyn Env,
        sink: &mut dyn MetricsSink,
    ) -> Result<TrainReport> {
        self.config.validate()?;

        let mut pb = if self.config.show_progress {
            let mut pb = tqdm!(total = 0);
            pb.set_description(agent.name().to_string());
            Some(pb)
        } else {
            None
        };

        let mut iteration: usize = 0;
        let mut best_reward: f64 = 0.0;
        let mut history: Vec<f64> = vec![];

        loop {
            iteration += 1;
            agent.learn()?;
            let reward = self.evaluate(agent, test_env)?;
            history.push(reward);
            sink.add_scalar("reward", reward, iteration);
            debug!("iteration {}: mean reward {:.3}", iteration, reward);

            if reward > best_reward {
                best_reward = reward;
                info!("Best reward in iteration {}: {:.3}", iteration, best_reward);
            }

            if let Some(pb) = pb.as_mut() {
                pb.set_postfix(format!("reward={:.3}, best={:.3}", reward, best_reward));
                if !pb.update(1) {
                    debug!("progress bar not redrawn at iteration {}", iteration);
                }
            }

            if (self.stop)(iteration, reward) {
                if reward > self.config.reward_threshold {
                    info!("Solved!");
                } else {
                    info!("Stopped after {} iterations", iteration);
                }
                break;
            }
        }

        sink.close()?;

        Ok(TrainReport {
            iterations: iteration,
            best_reward,
            final_reward: history.last().copied().unwrap_or(0.0),
            history,
        })
    }
}

/// Plays one greedy episode and logs every rendered frame.
pub fn example(agent: &dyn Agent, env: &mut dyn Env) -> Result<f64> {
    let mut state = env.reset();
    let mut total_reward: f64 = 0.0;
    let mut steps: usize = 0;
    info!("\n{}", env.render());
    loop {
        steps += 1;
        let action = agent.greedy(state);
        let step = env.step(action)?;
        total_reward += step.reward;
        info!(
            "({}) step reward {}\n{}",
            env.action_label(action),
            step.reward,
            env.render()
        );
        if step.done {
            break;
        }
        state = step.next_state;
    }
    info!("episode reward {} after {} steps", total_reward, steps);
    Ok(total_reward)
}
