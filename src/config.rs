//! Hyperparameters of the agents and of the training loop.

use crate::error::{Error, Result};

pub const GAMMA: f64 = 0.9;
pub const ALPHA: f64 = 0.2;
pub const TEST_EPISODES: usize = 20;
pub const REWARD_THRESHOLD: f64 = 0.8;
pub const SAMPLES_PER_ITERATION: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QLearningConfig {
    /// Step size α.
    pub learning_rate: f64,
    /// Discount factor γ.
    pub discount_factor: f64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: ALPHA,
            discount_factor: GAMMA,
        }
    }
}

impl QLearningConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be in (0, 1), got {}",
                self.learning_rate
            )));
        }
        check_discount(self.discount_factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueIterationConfig {
    pub discount_factor: f64,
    /// Random steps taken before every sweep.
    pub samples_per_iteration: usize,
    /// Also record the transitions played while evaluating the greedy policy.
    pub learn_during_evaluation: bool,
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self {
            discount_factor: GAMMA,
            samples_per_iteration: SAMPLES_PER_ITERATION,
            learn_during_evaluation: true,
        }
    }
}

impl ValueIterationConfig {
    pub fn validate(&self) -> Result<()> {
        check_discount(self.discount_factor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    pub test_episodes: usize,
    /// Training stops once the mean evaluation reward is strictly above it.
    pub reward_threshold: f64,
    pub show_progress: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            test_episodes: TEST_EPISODES,
            reward_threshold: REWARD_THRESHOLD,
            show_progress: false,
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.test_episodes == 0 {
            return Err(Error::InvalidConfig(
                "at least one test episode is required".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_discount(discount_factor: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&discount_factor) {
        return Err(Error::InvalidConfig(format!(
            "discount factor must be in [0, 1], got {}",
            discount_factor
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_frozen_lake_scripts() {
        let q = QLearningConfig::default();
        assert_eq!(q.learning_rate, 0.2);
        assert_eq!(q.discount_factor, 0.9);
        let v = ValueIterationConfig::default();
        assert_eq!(v.samples_per_iteration, 100);
        assert!(v.learn_during_evaluation);
        let t = TrainerConfig::default();
        assert_eq!(t.test_episodes, 20);
        assert_eq!(t.reward_threshold, 0.8);
        assert!(q.validate().is_ok() && v.validate().is_ok() && t.validate().is_ok());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let q = QLearningConfig {
            learning_rate: 1.5,
            ..Default::default()
        };
        assert!(matches!(q.validate(), Err(Error::InvalidConfig(_))));
        let v = ValueIterationConfig {
            discount_factor: -0.1,
            ..Default::default()
        };
        assert!(v.validate().is_err());
        let t = TrainerConfig {
            test_episodes: 0,
            ..Default::default()
        };
        assert!(t.validate().is_err());
    }
}
