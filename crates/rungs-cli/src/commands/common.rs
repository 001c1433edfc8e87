//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use rungs_core::{Config, TargetConfig};
use std::fmt;
use std::path::PathBuf;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Returned instead of calling `std::process::exit` so destructors run.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) u8);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; the failure has already been reported.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Config file to read: `--config` when given, else the default location
pub(crate) fn config_path(global: &GlobalArgs) -> PathBuf {
    match &global.config {
        Some(path) => rungs_core::config::expand_home(path),
        None => Config::default_path(),
    }
}

/// Load and validate the configuration
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    let path = config_path(global);
    log::debug!("Loading config from {}", path.display());
    Config::load(&path).context("Failed to load config")
}

/// Targets selected by `--target` / `RUNGS_TARGET`, or all of them in name order
pub(crate) fn selected_targets<'a>(
    config: &'a Config,
    global: &GlobalArgs,
) -> Result<Vec<(&'a str, &'a TargetConfig)>> {
    let selected = Config::resolve_target(global.target.as_deref());
    Ok(config.select_targets(selected.as_deref())?)
}
