//! rungs-apply - Applies ordered migrations to a store exactly once
//!
//! The [`HistoryTracker`] knows which migration names a store has already
//! applied; the [`MigrationRunner`] walks an ordered migration list, skipping
//! applied files, executing the rest statement by statement, and recording
//! each file once all of its statements succeed. [`apply_target`] ties the
//! scan/parse/order steps from `rungs-core` to a single run.

pub mod error;
pub mod history;
pub mod observer;
pub mod runner;
pub mod target;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{ApplyError, ApplyResult, ErrorKind};
pub use history::HistoryTracker;
pub use observer::{LogObserver, RunObserver};
pub use runner::{plan, MigrationRunner, MigrationState, PlannedMigration, RunSummary};
pub use target::{apply_target, prepare_migrations, target_status, TargetStatus};
