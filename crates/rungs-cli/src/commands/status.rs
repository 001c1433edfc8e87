//! Status command implementation

use anyhow::{Context, Result};
use rungs_apply::{target_status, LogObserver, MigrationState};

use crate::cli::{GlobalArgs, StatusArgs};
use crate::commands::common::{load_config, selected_targets};

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;

    for (name, target) in selected_targets(&config, global)? {
        let db = rungs_db::connect(target)
            .await
            .with_context(|| format!("Failed to connect to target '{name}'"))?;
        let table = config.history_table_for(target);
        let dir = target.migrations_dir();
        let status = target_status(name, &dir, db.as_ref(), table, &LogObserver)
            .await
            .with_context(|| format!("Failed to read status of target '{name}'"))?;

        println!(
            "{} ({} pending of {})",
            name,
            status.pending_count(),
            status.migrations.len()
        );
        for planned in status.planned() {
            let marker = match planned.state {
                MigrationState::Applied if args.pending => continue,
                MigrationState::Applied => "✓",
                MigrationState::Pending => " ",
            };
            println!(
                "  [{}] {:<9} {:<8} {}",
                marker,
                planned.migration.kind.to_string(),
                planned.migration.version.to_string(),
                planned.migration.name
            );
        }
        for unknown in status.unknown() {
            println!("  [?] {unknown} (recorded in {table}, no file on disk)");
        }
        println!();
    }

    Ok(())
}
