use log::error;
use structopt::StructOpt;

use frozen_lake_tabular::cli::{init_logging, CommonArgs};
use frozen_lake_tabular::config::QLearningConfig;
use frozen_lake_tabular::{QLearningAgent, Result, Trainer};

/// Solve FrozenLake with tabular Q-learning on uniformly random transitions
#[derive(StructOpt, Debug)]
#[structopt(name = "RLRust - FrozenLake - Q-learning")]
struct Cli {
    #[structopt(flatten)]
    common: CommonArgs,

    /// Step size of the temporal difference update
    #[structopt(long = "learning_rate", default_value = "0.2")]
    learning_rate: f64,

    /// Discount factor used on the temporal difference target
    #[structopt(long = "discount_factor", default_value = "0.9")]
    discount_factor: f64,
}

fn run(cli: Cli) -> Result<()> {
    let config = QLearningConfig {
        learning_rate: cli.learning_rate,
        discount_factor: cli.discount_factor,
    };
    config.validate()?;

    let mut agent = QLearningAgent::new(cli.common.make_env(0)?, config);
    let mut test_env = cli.common.make_env(1)?;
    let mut sink = cli.common.make_sink("q-iteration");

    let mut trainer = Trainer::new(cli.common.trainer_config());
    let report = trainer.run(&mut agent, &mut test_env, sink.as_mut())?;

    cli.common.finish(&report, &agent, "FrozenLake - Q-learning")
}

fn main() {
    init_logging();
    let cli: Cli = Cli::from_args();
    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}
