//! Command-line interface for the headless scenario runner

use clap::Parser;
use std::path::PathBuf;

/// TCP ability scenario runner
#[derive(Parser, Debug)]
#[command(name = "tcp-abilities")]
#[command(about = "Run scripted TCP ability scenarios headless")]
#[command(version)]
pub struct Args {
    /// JSON scenario file to run
    #[arg(long, value_name = "SCENARIO_FILE")]
    pub scenario: PathBuf,

    /// RON prototypes file (default: assets/config/tcp_prototypes.ron if present)
    #[arg(long, value_name = "PROTOTYPES_FILE")]
    pub prototypes: Option<PathBuf>,

    /// Output path for the ability log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Simulated seconds to run, overriding the scenario
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// Print ability logging while running
    #[arg(long)]
    pub verbose: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}
