//! Applied-migration history
//!
//! The history table has a single `name VARCHAR(100)` column with one row per
//! applied migration file. It is read once when a run starts; afterwards the
//! in-memory set is the source of truth and only grows.

use crate::error::{ApplyError, ApplyResult};
use rungs_core::{escape_sql_string, is_valid_table_name, CoreError};
use rungs_db::Database;
use std::collections::HashSet;

/// Longest name the history table's `name` column holds
pub const HISTORY_NAME_MAX: usize = 100;

/// `SELECT` reading every recorded name
pub fn select_sql(table: &str) -> String {
    format!("SELECT name FROM {table}")
}

/// `CREATE TABLE` for a missing history table
pub fn create_sql(table: &str) -> String {
    format!("CREATE TABLE {table} (name VARCHAR({HISTORY_NAME_MAX}))")
}

/// `INSERT` recording `name` as applied
pub fn insert_sql(table: &str, name: &str) -> String {
    format!(
        "INSERT INTO {table} (name) VALUES ('{}')",
        escape_sql_string(name)
    )
}

/// Set of migration names already applied to one store
#[derive(Debug, Clone)]
pub struct HistoryTracker {
    table: String,
    applied: HashSet<String>,
    created: bool,
}

impl HistoryTracker {
    /// Read the history table, creating it when it does not exist yet.
    ///
    /// A missing table means nothing has been applied; it is not an error.
    pub async fn load(db: &dyn Database, table: &str) -> ApplyResult<Self> {
        match Self::read_names(db, table).await? {
            Some(names) => Ok(Self::from_names(table, names)),
            None => {
                db.execute(&create_sql(table))
                    .await
                    .map_err(|source| ApplyError::HistoryCreate {
                        table: table.to_string(),
                        source,
                    })?;
                let mut tracker = Self::from_names(table, Vec::<String>::new());
                tracker.created = true;
                Ok(tracker)
            }
        }
    }

    /// Read the history table without creating it; a missing table reads as
    /// empty.
    pub async fn read(db: &dyn Database, table: &str) -> ApplyResult<Self> {
        let names = Self::read_names(db, table).await?.unwrap_or_default();
        Ok(Self::from_names(table, names))
    }

    /// `None` when the table does not exist
    async fn read_names(db: &dyn Database, table: &str) -> ApplyResult<Option<Vec<String>>> {
        validate_table(table)?;

        match db.query_strings(&select_sql(table)).await {
            Ok(names) => Ok(Some(names)),
            Err(e) if e.is_table_not_found() => Ok(None),
            Err(source) => Err(ApplyError::HistoryRead {
                table: table.to_string(),
                source,
            }),
        }
    }

    /// Build a tracker from names already known to be applied.
    ///
    /// The table name is not checked here; `record` checks it before use.
    pub(crate) fn from_names<I, S>(table: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.to_string(),
            applied: names.into_iter().map(Into::into).collect(),
            created: false,
        }
    }

    /// Whether `name` has been applied
    pub fn contains(&self, name: &str) -> bool {
        self.applied.contains(name)
    }

    /// Record `name` as applied, in the store first and then in memory.
    ///
    /// Must only be called once every statement of the file has succeeded.
    pub async fn record(&mut self, db: &dyn Database, name: &str) -> ApplyResult<()> {
        validate_table(&self.table)?;
        db.execute(&insert_sql(&self.table, name))
            .await
            .map_err(|source| ApplyError::HistoryInsert {
                file: name.to_string(),
                source,
            })?;
        self.applied.insert(name.to_string());
        Ok(())
    }

    /// Number of applied names
    pub fn len(&self) -> usize {
        self.applied.len()
    }

    /// Returns true if nothing has been applied
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    /// Applied names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.applied.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Name of the backing table
    pub fn table(&self) -> &str {
        &self.table
    }

    /// True when [`HistoryTracker::load`] had to create the table
    pub fn was_created(&self) -> bool {
        self.created
    }
}

fn validate_table(table: &str) -> ApplyResult<()> {
    if is_valid_table_name(table) {
        Ok(())
    } else {
        Err(CoreError::ConfigInvalid {
            message: format!("Invalid history table name '{table}'"),
        }
        .into())
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
