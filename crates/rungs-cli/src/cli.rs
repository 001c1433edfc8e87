//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// rungs - apply versioned SQL migrations exactly once
#[derive(Parser, Debug)]
#[command(name = "rungs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output (per-statement logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: ~/.rungs/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Only process this target (falls back to RUNGS_TARGET)
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations to every selected target
    Apply(ApplyArgs),

    /// Show applied and pending migrations per target
    Status(StatusArgs),

    /// Parse and order migration files without connecting to a database
    Check(CheckArgs),
}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Continue with the next target after a target fails
    #[arg(long)]
    pub keep_going: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Only list pending migrations
    #[arg(long)]
    pub pending: bool,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Print the statements of each file as well
    #[arg(long)]
    pub statements: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
