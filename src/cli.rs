//! Command line options shared by the FrozenLake binaries.

use std::path::PathBuf;

use log::info;
use structopt::StructOpt;

use crate::agent::Agent;
use crate::config::TrainerConfig;
use crate::env::FrozenLakeEnv;
use crate::error::{Error, Result};
use crate::metrics::{InMemorySink, MetricsSink, TensorboardSink};
use crate::trainer::{example, TrainReport};
use crate::utils::plot_rewards;

#[derive(StructOpt, Debug, Clone)]
pub struct CommonArgs {
    /// Change the env's map: 4x4 or 8x8
    #[structopt(long = "map", default_value = "4x4")]
    pub map: String,

    /// Disable the slippery ice
    #[structopt(long = "deterministic")]
    pub deterministic: bool,

    /// Maximum number of steps per episode
    #[structopt(long = "max_steps", default_value = "100")]
    pub max_steps: u128,

    /// Seed of the environments, random when missing
    #[structopt(long = "seed")]
    pub seed: Option<u64>,

    /// Number of greedy episodes played after every learning phase
    #[structopt(long = "test_episodes", default_value = "20")]
    pub test_episodes: usize,

    /// Training stops when the mean test reward is above this value
    #[structopt(long = "reward_threshold", default_value = "0.8")]
    pub reward_threshold: f64,

    /// Directory of the TensorBoard event files, runs/<date>_<comment> by default
    #[structopt(long = "logdir", parse(from_os_str))]
    pub logdir: Option<PathBuf>,

    /// Keep the rewards in memory instead of writing TensorBoard events
    #[structopt(long = "no_tensorboard")]
    pub no_tensorboard: bool,

    /// Save a plot of the mean test reward per iteration to this PNG file
    #[structopt(long = "plot", parse(from_os_str))]
    pub plot: Option<PathBuf>,

    /// Moving average window used on the reward plot
    #[structopt(long = "moving_average_window", default_value = "10")]
    pub moving_average_window: usize,

    /// Show example of episode once solved
    #[structopt(long = "show_example")]
    pub show_example: bool,

    /// Show a progress bar
    #[structopt(long = "progress")]
    pub progress: bool,
}

impl CommonArgs {
    /// Builds a FrozenLake environment. Environments built with different
    /// `stream` values draw from different random streams.
    pub fn make_env(&self, stream: u64) -> Result<FrozenLakeEnv> {
        let map = FrozenLakeEnv::named_map(&self.map).ok_or_else(|| {
            Error::InvalidConfig(format!("unknown map '{}', expected 4x4 or 8x8", self.map))
        })?;
        let seed = self.seed.map(|s| s.wrapping_add(stream.wrapping_mul(1_000_003)));
        Ok(FrozenLakeEnv::new(
            map,
            !self.deterministic,
            self.max_steps,
            seed,
        )?)
    }

    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig {
            test_episodes: self.test_episodes,
            reward_threshold: self.reward_threshold,
            show_progress: self.progress,
        }
    }

    pub fn make_sink(&self, comment: &str) -> Box<dyn MetricsSink> {
        if self.no_tensorboard {
            return Box::new(InMemorySink::new());
        }
        let logdir = self
            .logdir
            .clone()
            .unwrap_or_else(|| TensorboardSink::default_logdir(comment));
        info!("TensorBoard logs in {}", logdir.display());
        Box::new(TensorboardSink::new(logdir))
    }

    /// Plot and example episode requested on the command line.
    pub fn finish(&self, report: &TrainReport, agent: &dyn Agent, title: &str) -> Result<()> {
        info!(
            "{} finished after {} iterations, best mean reward {:.3}",
            agent.name(),
            report.iterations,
            report.best_reward
        );
        if let Some(path) = &self.plot {
            plot_rewards(path, title, &report.history, self.moving_average_window)?;
            info!("reward plot saved to {}", path.display());
        }
        if self.show_example {
            let mut env = self.make_env(2)?;
            example(agent, &mut env)?;
        }
        Ok(())
    }
}

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Env;

    fn args(extra: &[&str]) -> CommonArgs {
        let mut argv = vec!["frozen_lake"];
        argv.extend_from_slice(extra);
        CommonArgs::from_iter(argv)
    }

    #[test]
    fn defaults_describe_frozen_lake_v0() {
        let args = args(&[]);
        assert_eq!(args.map, "4x4");
        assert!(!args.deterministic);
        assert_eq!(args.max_steps, 100);
        let config = args.trainer_config();
        assert_eq!(config.test_episodes, 20);
        assert_eq!(config.reward_threshold, 0.8);
        let env = args.make_env(0).unwrap();
        assert_eq!(env.observation_space().n, 16);
    }

    #[test]
    fn unknown_map_is_rejected() {
        let args = args(&["--map", "3x3"]);
        assert!(matches!(args.make_env(0), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn seeded_streams_differ() {
        let args = args(&["--seed", "42", "--map", "8x8"]);
        let mut a = args.make_env(0).unwrap();
        let mut b = args.make_env(1).unwrap();
        let xs: Vec<usize> = (0..32).map(|_| a.sample_action()).collect();
        let ys: Vec<usize> = (0..32).map(|_| b.sample_action()).collect();
        assert_ne!(xs, ys);
        let mut c = args.make_env(0).unwrap();
        let zs: Vec<usize> = (0..32).map(|_| c.sample_action()).collect();
        assert_eq!(xs, zs);
    }
}
