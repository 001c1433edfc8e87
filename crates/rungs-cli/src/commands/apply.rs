//! Apply command implementation

use anyhow::{Context, Result};
use rungs_apply::{apply_target, LogObserver, RunSummary};
use rungs_core::{Config, TargetConfig};

use crate::cli::{ApplyArgs, GlobalArgs};
use crate::commands::common::{load_config, selected_targets, ExitCode};

/// Execute the apply command
pub async fn execute(args: &ApplyArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let targets = selected_targets(&config, global)?;

    let mut failed = Vec::new();
    for (name, target) in targets {
        match apply_one(&config, name, target).await {
            Ok(summary) => println!(
                "  ✓ {} ({} applied, {} already applied, {} statements)",
                name,
                summary.applied.len(),
                summary.skipped.len(),
                summary.statements_executed
            ),
            Err(err) => {
                println!("  ✗ {name}");
                eprintln!("Error: {err:#}");
                failed.push(name);
                if !args.keep_going {
                    break;
                }
            }
        }
    }

    if !failed.is_empty() {
        eprintln!("\nFailed targets: {}", failed.join(", "));
        return Err(ExitCode(1).into());
    }

    Ok(())
}

async fn apply_one(config: &Config, name: &str, target: &TargetConfig) -> Result<RunSummary> {
    let db = rungs_db::connect(target)
        .await
        .with_context(|| format!("Failed to connect to target '{name}'"))?;
    log::debug!("Connected to '{}' ({})", name, db.db_type());

    let summary = apply_target(
        name,
        &target.migrations_dir(),
        db.as_ref(),
        config.history_table_for(target),
        &LogObserver,
    )
    .await?;
    Ok(summary)
}
