//! Colorcore: the colored coins Open Asset client.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use colorcore::commands::Cli;
use colorcore::config::Config;
use colorcore::logging::{self, LoggerConfig};

fn main() -> ExitCode {
    logging::init(LoggerConfig::default());

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;
    cli.command.run(&config)
}
