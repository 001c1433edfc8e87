//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// The store capability migrations are applied through.
///
/// Statements are always sent one at a time and awaited before the next is
/// issued; implementations never see concurrent calls from rungs. No
/// parameter binding and no transactions are involved.
#[async_trait]
pub trait Database: Send + Sync {
    /// Prepare and execute a single statement, returning affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Run a query and return its first column as strings (NULLs skipped)
    async fn query_strings(&self, sql: &str) -> DbResult<Vec<String>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
