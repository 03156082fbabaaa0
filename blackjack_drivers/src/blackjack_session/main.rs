mod simulation;

use anyhow::{bail, Context};
use blackjack_drivers::{parse_config_from_file, Config};
use clap::Parser;
use tracing::{info, warn, Level};

const DEFAULT_CONFIG_PATH: &str = "~/.blackjack.yml";

#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    /// Player strategy: user, optimal, expectimax, random or qlearning
    #[arg(short = 'a', long)]
    strategy: Option<String>,

    /// Number of reported hands
    #[arg(short = 'n', long)]
    hands: Option<u64>,

    /// Number of Q-learning training hands played before the reported ones
    #[arg(short, long)]
    training: Option<u64>,

    #[arg(short, long)]
    starting_money: Option<f64>,

    /// Seed for every random source, for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,

    /// Log every action and hand
    #[arg(short, long)]
    verbose: bool,
}

impl CommandLineArgs {
    fn apply_to(&self, config: &mut Config) {
        let session = &mut config.session;
        if let Some(strategy) = &self.strategy {
            session.strategy = strategy.clone();
        }
        if let Some(hands) = self.hands {
            session.testing_hands = hands;
        }
        if let Some(training) = self.training {
            session.training_hands = training;
        }
        if let Some(starting_money) = self.starting_money {
            session.starting_money = starting_money;
        }
        if self.seed.is_some() {
            session.seed = self.seed;
        }
    }
}

/// The default path may be absent, in which case the built-in defaults apply.
/// Any other path has to exist.
fn load_config(path: &str) -> anyhow::Result<Config> {
    if path != DEFAULT_CONFIG_PATH {
        return parse_config_from_file(path);
    }
    let Some(home_dir) = home::home_dir() else {
        warn!("cannot find home directory, using default config");
        return Ok(Config::default());
    };
    let config_file_path = home_dir.join(".blackjack.yml");
    if !config_file_path.exists() {
        return Ok(Config::default());
    }
    if config_file_path.is_dir() {
        bail!("This should be a path rather than a directory");
    }
    let config_file_path = config_file_path
        .to_str()
        .context("config path is not valid UTF-8")?;
    parse_config_from_file(config_file_path)
}

fn main() -> anyhow::Result<()> {
    let args = CommandLineArgs::parse();
    let max_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(false)
        .init();

    let mut config = load_config(&args.config)?;
    args.apply_to(&mut config);
    let config = config;
    info!(?config, "starting session");

    simulation::run_session(&config)?;
    Ok(())
}
