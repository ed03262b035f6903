use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod config;
mod logging;
mod provenance;

use cli::{Cli, Commands};
use config::CliConfig;

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    logging::init_logging(level)?;

    tracing::debug!(command = ?cli.command, "novel-testbed v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Segment {
            input,
            output,
            title,
        } => commands::segment(&input, &output, title, &config),
        Commands::Parse {
            input,
            output,
            title,
        } => commands::parse_command(&input, &output, title, &config),
        Commands::Assess {
            contract,
            output,
            summary,
            fail_on,
        } => commands::assess_command(&contract, output.as_deref(), summary, fail_on, &config),
        Commands::Verify { contract, source } => commands::verify(&contract, &source),
    }
}
