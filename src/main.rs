//! TCP Abilities - headless scenario runner
//!
//! Loads ability prototypes and a scenario, runs it on a simulated clock and
//! prints what every creature ended up with.

use std::path::Path;
use std::process::ExitCode;

use tcp_abilities::cli;
use tcp_abilities::headless::{run_scenario, RunOptions, ScenarioConfig};
use tcp_abilities::prototypes::{TcpPrototypes, DEFAULT_PROTOTYPES_PATH};

fn load_prototypes(path: Option<&Path>) -> Result<TcpPrototypes, String> {
    match path {
        Some(path) => TcpPrototypes::load(path),
        None if Path::new(DEFAULT_PROTOTYPES_PATH).exists() => {
            TcpPrototypes::load(Path::new(DEFAULT_PROTOTYPES_PATH))
        }
        None => Ok(TcpPrototypes::default()),
    }
}

fn run(args: cli::Args) -> Result<(), String> {
    let config = ScenarioConfig::load_from_file(&args.scenario)?;
    let prototypes = load_prototypes(args.prototypes.as_deref())?;

    println!("Starting headless scenario {}...", args.scenario.display());
    println!("  Creatures: {}", config.creatures.len());
    println!("  Script steps: {}", config.script.len());

    let options = RunOptions {
        verbose: args.verbose,
        max_duration: args.max_duration,
        output: args.output,
    };
    let result = run_scenario(&config, prototypes, &options)?;
    result.print_summary();
    Ok(())
}

fn main() -> ExitCode {
    let args = cli::parse_args();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Scenario failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
