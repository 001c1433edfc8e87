//! rungs - applies versioned SQL migrations to each configured target exactly once

use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::common::ExitCode;
use commands::{apply, check, status};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.global.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let result = match &cli.command {
        Commands::Apply(args) => apply::execute(args, &cli.global).await,
        Commands::Status(args) => status::execute(args, &cli.global).await,
        Commands::Check(args) => check::execute(args, &cli.global).await,
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ExitCode>() {
            Some(code) => std::process::ExitCode::from(code.0),
            None => {
                eprintln!("Error: {err:#}");
                std::process::ExitCode::FAILURE
            }
        },
    }
}
