//! Test doubles for exercising the apply loop without a real database.

use crate::history::{create_sql, select_sql};
use crate::observer::RunObserver;
use async_trait::async_trait;
use rungs_core::Migration;
use rungs_db::{Database, DbError, DbResult};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory store that understands the history-table SQL and records every
/// other statement it is asked to execute.
pub struct FakeDatabase {
    table: String,
    state: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
    history: Option<Vec<String>>,
    executed: Vec<String>,
    fail_fragments: Vec<String>,
    fail_history_read: bool,
    fail_history_create: bool,
    fail_history_insert: bool,
}

impl Default for FakeDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDatabase {
    /// Store without a history table, using `migration_history`
    pub fn new() -> Self {
        Self::for_table("migration_history")
    }

    /// Store without a history table, using `table`
    pub fn for_table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            state: Mutex::new(FakeState::default()),
        }
    }

    /// Store whose history table already lists `names`
    pub fn with_history(names: &[&str]) -> Self {
        let db = Self::new();
        db.state().history = Some(names.iter().map(|n| n.to_string()).collect());
        db
    }

    /// Fail any statement containing `fragment`
    pub fn fail_on(self, fragment: &str) -> Self {
        self.state().fail_fragments.push(fragment.to_string());
        self
    }

    /// Fail history reads with something other than a missing table
    pub fn fail_history_read(self) -> Self {
        self.state().fail_history_read = true;
        self
    }

    /// Fail creation of the history table
    pub fn fail_history_create(self) -> Self {
        self.state().fail_history_create = true;
        self
    }

    /// Fail every history insert
    pub fn fail_history_insert(self) -> Self {
        self.state().fail_history_insert = true;
        self
    }

    /// Migration statements executed so far, in order
    pub fn executed(&self) -> Vec<String> {
        self.state().executed.clone()
    }

    /// Current history rows, `None` when the table does not exist
    pub fn history(&self) -> Option<Vec<String>> {
        self.state().history.clone()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert_prefix(&self) -> String {
        format!("INSERT INTO {} (name) VALUES ('", self.table)
    }
}

#[async_trait]
impl Database for FakeDatabase {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        let insert_prefix = self.insert_prefix();
        let mut state = self.state();

        if sql == create_sql(&self.table) {
            if state.fail_history_create {
                return Err(DbError::ExecutionError("permission denied".to_string()));
            }
            if state.history.is_some() {
                return Err(DbError::ExecutionError(format!(
                    "table {} already exists",
                    self.table
                )));
            }
            state.history = Some(Vec::new());
            return Ok(0);
        }

        if let Some(rest) = sql.strip_prefix(&insert_prefix) {
            if state.fail_history_insert {
                return Err(DbError::ExecutionError("disk full".to_string()));
            }
            let name = rest.strip_suffix("')").unwrap_or(rest).replace("''", "'");
            return match state.history.as_mut() {
                Some(history) => {
                    history.push(name);
                    Ok(1)
                }
                None => Err(DbError::TableNotFound(self.table.clone())),
            };
        }

        if state.fail_fragments.iter().any(|f| sql.contains(f.as_str())) {
            return Err(DbError::ExecutionError(format!("syntax error near \"{sql}\"")));
        }
        state.executed.push(sql.to_string());
        Ok(0)
    }

    async fn query_strings(&self, sql: &str) -> DbResult<Vec<String>> {
        let state = self.state();
        if sql != select_sql(&self.table) {
            return Err(DbError::ExecutionError(format!("unexpected query: {sql}")));
        }
        if state.fail_history_read {
            return Err(DbError::ExecutionError("connection reset".to_string()));
        }
        state
            .history
            .clone()
            .ok_or_else(|| DbError::TableNotFound(self.table.clone()))
    }

    fn db_type(&self) -> &'static str {
        "fake"
    }
}

/// Observer that keeps a readable trace of every event
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    /// Events seen so far
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }
}

impl RunObserver for RecordingObserver {
    fn history_created(&self, target: &str, table: &str) {
        self.push(format!("{target}: created {table}"));
    }

    fn skipped(&self, target: &str, migration: &Migration) {
        self.push(format!("{target}: skip {}", migration.name));
    }

    fn applying(&self, target: &str, migration: &Migration) {
        self.push(format!("{target}: apply {}", migration.name));
    }

    fn applied(&self, target: &str, migration: &Migration, statements: usize) {
        self.push(format!("{target}: done {} ({statements})", migration.name));
    }

    fn collision(&self, target: &str, names: &[String]) {
        self.push(format!("{target}: collision {}", names.join(",")));
    }
}
