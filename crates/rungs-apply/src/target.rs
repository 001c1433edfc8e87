//! Per-target driver: directory to ordered migrations to applied history

use crate::error::ApplyResult;
use crate::history::HistoryTracker;
use crate::observer::RunObserver;
use crate::runner::{plan, MigrationRunner, MigrationState, PlannedMigration, RunSummary};
use rungs_core::{duplicate_keys, load_migrations, ordered, Migration};
use rungs_db::Database;
use std::path::Path;

/// Scan, parse, and order the migrations in `dir`.
///
/// Any unreadable or badly named file fails the whole directory, so nothing
/// is returned for a target that cannot be applied in full.
pub fn prepare_migrations(
    target: &str,
    dir: &Path,
    observer: &dyn RunObserver,
) -> ApplyResult<Vec<Migration>> {
    let migrations = ordered(load_migrations(dir)?);

    for names in duplicate_keys(&migrations) {
        // Procedures carry no version, so they always share a key
        let is_procedures = migrations
            .iter()
            .find(|m| m.name == names[0])
            .is_some_and(Migration::is_procedure);
        if !is_procedures {
            observer.collision(target, &names);
        }
    }

    Ok(migrations)
}

/// Apply every pending migration in `dir` to `db`.
///
/// The directory is fully parsed and ordered before the store is touched.
pub async fn apply_target(
    target: &str,
    dir: &Path,
    db: &dyn Database,
    history_table: &str,
    observer: &dyn RunObserver,
) -> ApplyResult<RunSummary> {
    let migrations = prepare_migrations(target, dir, observer)?;

    let history = HistoryTracker::load(db, history_table).await?;
    if history.was_created() {
        observer.history_created(target, history_table);
    }

    let mut runner = MigrationRunner::new(target, db, history, observer);
    runner.run(&migrations).await
}

/// Migrations on disk alongside what the store has recorded
#[derive(Debug, Clone)]
pub struct TargetStatus {
    pub migrations: Vec<Migration>,
    pub history: HistoryTracker,
}

impl TargetStatus {
    /// Migrations in application order, each marked applied or pending
    pub fn planned(&self) -> Vec<PlannedMigration<'_>> {
        plan(&self.migrations, &self.history)
    }

    /// Number of migrations not yet applied
    pub fn pending_count(&self) -> usize {
        self.planned()
            .iter()
            .filter(|p| p.state == MigrationState::Pending)
            .count()
    }

    /// Recorded names with no matching file on disk, sorted
    pub fn unknown(&self) -> Vec<&str> {
        self.history
            .names()
            .into_iter()
            .filter(|name| !self.migrations.iter().any(|m| m.name == *name))
            .collect()
    }
}

/// Compare `dir` against the history in `db` without writing anything.
pub async fn target_status(
    target: &str,
    dir: &Path,
    db: &dyn Database,
    history_table: &str,
    observer: &dyn RunObserver,
) -> ApplyResult<TargetStatus> {
    let migrations = prepare_migrations(target, dir, observer)?;
    let history = HistoryTracker::read(db, history_table).await?;
    Ok(TargetStatus {
        migrations,
        history,
    })
}
