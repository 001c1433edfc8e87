//! Check command implementation
//!
//! Parses and orders each target's migration directory without opening a
//! database connection.

use anyhow::Result;
use rungs_apply::{prepare_migrations, LogObserver};

use crate::cli::{CheckArgs, GlobalArgs};
use crate::commands::common::{load_config, selected_targets, ExitCode};

/// Execute the check command
pub async fn execute(args: &CheckArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;

    let mut failure_count = 0;
    for (name, target) in selected_targets(&config, global)? {
        let dir = target.migrations_dir();
        match prepare_migrations(name, &dir, &LogObserver) {
            Ok(migrations) => {
                println!(
                    "  ✓ {} ({} migrations in {})",
                    name,
                    migrations.len(),
                    dir.display()
                );
                for (position, migration) in migrations.iter().enumerate() {
                    println!(
                        "    {:>3}. {:<9} {:<8} {}",
                        position + 1,
                        migration.kind.to_string(),
                        migration.version.to_string(),
                        migration.name
                    );
                    if args.statements {
                        for sql in &migration.statements {
                            println!("           {sql}");
                        }
                    }
                }
            }
            Err(err) => {
                failure_count += 1;
                println!("  ✗ {name} - {err}");
            }
        }
    }

    if failure_count > 0 {
        return Err(ExitCode(1).into());
    }

    Ok(())
}
