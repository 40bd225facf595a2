//! Skirmish batch simulator.
//!
//! Plays many AI-vs-AI duels from a master seed and prints who won how often.
//! Set `RUST_LOG=skirmish_core=debug` to trace individual actions.

use anyhow::{Context, Result};
use skirmish_core::CombatRules;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod cli;
mod report;
mod runner;

use report::Summary;
use runner::{BatchConfig, Matchup};

fn main() -> Result<()> {
    setup_logging();

    let args = cli::parse_args();
    let rules = match &args.rules {
        Some(path) => load_rules(path)?,
        None => CombatRules::default(),
    };
    let matchup = Matchup::resolve(args.left.as_deref(), args.right.as_deref())?;

    let config = BatchConfig {
        master_seed: args.seed,
        duels: args.duels,
        max_rounds: args.max_rounds,
        rules,
        matchup,
    };
    tracing::info!(seed = config.master_seed, duels = config.duels, "starting batch");

    let records = runner::run_batch(&config)?;
    let summary = Summary::from_records(&records);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }
    Ok(())
}

fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_rules(path: &std::path::Path) -> Result<CombatRules> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file {}", path.display()))?;
    let rules = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse rules file {}", path.display()))?;
    Ok(rules)
}
