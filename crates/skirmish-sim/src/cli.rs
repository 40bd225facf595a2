//! Command-line interface for the batch simulator.

use clap::Parser;
use std::path::PathBuf;

/// Plays AI-vs-AI duels in parallel and reports aggregate results
#[derive(Parser, Debug)]
#[command(name = "skirmish-sim")]
#[command(about = "Headless batch duel runner for Skirmish")]
#[command(version)]
pub struct Args {
    /// Master seed; every duel derives its own seed from it
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Number of duels to play
    #[arg(long, default_value = "1000")]
    pub duels: u64,

    /// Template for the left side (random per duel when omitted)
    #[arg(long, value_name = "NAME")]
    pub left: Option<String>,

    /// Template for the right side (random per duel when omitted)
    #[arg(long, value_name = "NAME")]
    pub right: Option<String>,

    /// Rounds after which a duel is declared a stalemate
    #[arg(long, default_value = "500")]
    pub max_rounds: u32,

    /// JSON file overriding the default combat rules
    #[arg(long, value_name = "RULES_FILE")]
    pub rules: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}
