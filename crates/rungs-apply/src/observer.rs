//! Run observers: how the apply loop reports progress
//!
//! The runner never logs on its own; it reports events to the observer it
//! was given. [`LogObserver`] forwards them to the `log` facade.

use rungs_core::Migration;

/// Receives progress events from a run. Every method defaults to a no-op.
pub trait RunObserver: Send + Sync {
    /// The history table was missing and has been created
    fn history_created(&self, _target: &str, _table: &str) {}

    /// A migration was already in the history table
    fn skipped(&self, _target: &str, _migration: &Migration) {}

    /// A migration is about to run
    fn applying(&self, _target: &str, _migration: &Migration) {}

    /// One statement of a migration is about to run
    fn statement(&self, _target: &str, _migration: &Migration, _index: usize, _sql: &str) {}

    /// A migration ran and was recorded
    fn applied(&self, _target: &str, _migration: &Migration, _statements: usize) {}

    /// Several files share a version and kind, so their relative order is
    /// not defined
    fn collision(&self, _target: &str, _names: &[String]) {}
}

/// Observer that writes events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl RunObserver for LogObserver {
    fn history_created(&self, target: &str, table: &str) {
        log::info!("[{target}] Initialized migration history table {table}");
    }

    fn skipped(&self, target: &str, migration: &Migration) {
        log::info!("[{target}] Already processed \"{}\"", migration.name);
    }

    fn applying(&self, target: &str, migration: &Migration) {
        log::info!(
            "[{target}] Applying {} \"{}\" ({})",
            migration.kind,
            migration.name,
            migration.version
        );
    }

    fn statement(&self, target: &str, migration: &Migration, index: usize, sql: &str) {
        log::debug!("[{target}] {} #{}: {}", migration.name, index + 1, sql);
    }

    fn applied(&self, target: &str, migration: &Migration, statements: usize) {
        log::info!(
            "[{target}] Applied \"{}\" ({statements} statement(s))",
            migration.name
        );
    }

    fn collision(&self, target: &str, names: &[String]) {
        log::warn!(
            "[{target}] Migrations share a version and kind; their order is undefined: {}",
            names.join(", ")
        );
    }
}
