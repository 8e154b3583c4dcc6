use std::str::FromStr;

use clap::Parser;
use log::{LevelFilter, debug, info};
use miette::Result;

use archdiagrams::cli::Cli;

/// Main entry point for the archdiagrams CLI tool
fn main() -> Result<()> {
    // Install miette's panic and error handler for beautiful error reporting
    miette::set_panic_hook();

    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting archdiagrams");
    debug!(cli:?; "Parsed arguments");

    archdiagrams::run(cli)
}
