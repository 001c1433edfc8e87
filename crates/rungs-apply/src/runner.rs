//! The apply loop
//!
//! Walks an ordered migration list against one store. Each file is either
//! skipped (its name is in the history) or executed statement by statement
//! and then recorded. The first failure stops the run; files applied before
//! it stay applied and recorded.

use crate::error::{ApplyError, ApplyResult};
use crate::history::{HistoryTracker, HISTORY_NAME_MAX};
use crate::observer::RunObserver;
use rungs_core::Migration;
use rungs_db::Database;

/// Outcome of a completed run against one target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Target the run was for
    pub target: String,
    /// Names of files executed and recorded during this run, in order
    pub applied: Vec<String>,
    /// Names of files skipped because they were already recorded
    pub skipped: Vec<String>,
    /// Statements executed across all applied files
    pub statements_executed: usize,
}

impl RunSummary {
    /// Returns true if the run changed nothing
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Whether a migration has already been applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationState {
    Applied,
    Pending,
}

/// A migration paired with its state in a store's history
#[derive(Debug, Clone, Copy)]
pub struct PlannedMigration<'a> {
    pub migration: &'a Migration,
    pub state: MigrationState,
}

/// Pair each migration, in the given order, with its applied/pending state
pub fn plan<'a>(migrations: &'a [Migration], history: &HistoryTracker) -> Vec<PlannedMigration<'a>> {
    migrations
        .iter()
        .map(|migration| PlannedMigration {
            migration,
            state: if history.contains(&migration.name) {
                MigrationState::Applied
            } else {
                MigrationState::Pending
            },
        })
        .collect()
}

/// Applies migrations to one store, consulting and extending its history
pub struct MigrationRunner<'a> {
    target: &'a str,
    db: &'a dyn Database,
    history: HistoryTracker,
    observer: &'a dyn RunObserver,
}

impl<'a> MigrationRunner<'a> {
    /// Create a runner for `target` with an already-loaded history
    pub fn new(
        target: &'a str,
        db: &'a dyn Database,
        history: HistoryTracker,
        observer: &'a dyn RunObserver,
    ) -> Self {
        Self {
            target,
            db,
            history,
            observer,
        }
    }

    /// History as of the last recorded file
    pub fn history(&self) -> &HistoryTracker {
        &self.history
    }

    /// Consume the runner, returning its history
    pub fn into_history(self) -> HistoryTracker {
        self.history
    }

    /// Apply `migrations` in the order given.
    ///
    /// Stops at the first failure. Everything recorded before the failure
    /// remains recorded, in the store and in [`MigrationRunner::history`].
    pub async fn run(&mut self, migrations: &[Migration]) -> ApplyResult<RunSummary> {
        let mut summary = RunSummary {
            target: self.target.to_string(),
            ..RunSummary::default()
        };

        for migration in migrations {
            if self.history.contains(&migration.name) {
                self.observer.skipped(self.target, migration);
                summary.skipped.push(migration.name.clone());
                continue;
            }

            let executed = self.apply_one(migration).await?;
            summary.statements_executed += executed;
            summary.applied.push(migration.name.clone());
        }

        Ok(summary)
    }

    /// Execute every statement of one file, then record it
    async fn apply_one(&mut self, migration: &Migration) -> ApplyResult<usize> {
        // Checked up front so an unrecordable file never touches the schema.
        if migration.name.chars().count() > HISTORY_NAME_MAX {
            return Err(ApplyError::NameTooLong {
                file: migration.name.clone(),
                max: HISTORY_NAME_MAX,
            });
        }

        self.observer.applying(self.target, migration);

        for (index, sql) in migration.statements.iter().enumerate() {
            self.observer.statement(self.target, migration, index, sql);
            if let Err(source) = self.db.execute(sql).await {
                return Err(if migration.is_procedure() {
                    ApplyError::ProcedureFailed {
                        file: migration.name.clone(),
                        body: sql.clone(),
                        source,
                    }
                } else {
                    ApplyError::StatementFailed {
                        file: migration.name.clone(),
                        statement: sql.clone(),
                        source,
                    }
                });
            }
        }

        self.history.record(self.db, &migration.name).await?;
        self.observer
            .applied(self.target, migration, migration.statements.len());
        Ok(migration.statements.len())
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
