use log::error;
use structopt::StructOpt;

use frozen_lake_tabular::cli::{init_logging, CommonArgs};
use frozen_lake_tabular::config::ValueIterationConfig;
use frozen_lake_tabular::{Result, Trainer, ValueIterationAgent};

/// Solve FrozenLake with value iteration over an empirical model
#[derive(StructOpt, Debug)]
#[structopt(name = "RLRust - FrozenLake - Value iteration")]
struct Cli {
    #[structopt(flatten)]
    common: CommonArgs,

    /// Discount factor of the Bellman update
    #[structopt(long = "discount_factor", default_value = "0.9")]
    discount_factor: f64,

    /// Random steps recorded before every value iteration sweep
    #[structopt(long = "samples", default_value = "100")]
    samples: usize,

    /// Do not record the transitions played while testing the greedy policy
    #[structopt(long = "no_test_learning")]
    no_test_learning: bool,
}

fn run(cli: Cli) -> Result<()> {
    let config = ValueIterationConfig {
        discount_factor: cli.discount_factor,
        samples_per_iteration: cli.samples,
        learn_during_evaluation: !cli.no_test_learning,
    };
    config.validate()?;

    let mut agent = ValueIterationAgent::new(cli.common.make_env(0)?, config);
    let mut test_env = cli.common.make_env(1)?;
    let mut sink = cli.common.make_sink("v-iteration");

    let mut trainer = Trainer::new(cli.common.trainer_config());
    let report = trainer.run(&mut agent, &mut test_env, sink.as_mut())?;

    cli.common.finish(&report, &agent, "FrozenLake - Value iteration")
}

fn main() {
    init_logging();
    let cli: Cli = Cli::from_args();
    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}
