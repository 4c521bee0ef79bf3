pub mod agent;
pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod metrics;
pub mod model;
pub mod policy;
pub mod trainer;
pub mod utils;

pub use agent::{Agent, QLearningAgent, ValueIterationAgent};
pub use error::{Error, Result};
pub use trainer::{TrainReport, Trainer};
