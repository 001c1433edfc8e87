//! rungs-db - Database abstraction layer for rungs
//!
//! This crate provides the `Database` trait (the store capability migrations
//! run against) and implementations for DuckDB and, behind the `postgres`
//! feature, PostgreSQL.

pub mod duckdb;
pub mod error;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod traits;

pub use self::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
#[cfg(feature = "postgres")]
pub use self::postgres::PostgresBackend;
pub use traits::Database;

use rungs_core::{DbType, TargetConfig};
use std::sync::Arc;

/// Open a connection to the store described by `target`
pub async fn connect(target: &TargetConfig) -> DbResult<Arc<dyn Database>> {
    match target.db_type {
        DbType::DuckDb => {
            let path = rungs_core::config::expand_home(target.db_path());
            let backend = DuckDbBackend::new(&path.to_string_lossy())?;
            Ok(Arc::new(backend))
        }
        DbType::Postgres => connect_postgres(target).await,
    }
}

#[cfg(feature = "postgres")]
async fn connect_postgres(target: &TargetConfig) -> DbResult<Arc<dyn Database>> {
    Ok(Arc::new(PostgresBackend::connect(target).await?))
}

#[cfg(not(feature = "postgres"))]
async fn connect_postgres(_target: &TargetConfig) -> DbResult<Arc<dyn Database>> {
    Err(DbError::NotImplemented {
        backend: "postgres".to_string(),
        feature: "connections (built without the `postgres` feature)".to_string(),
    })
}
