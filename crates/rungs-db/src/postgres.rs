//! PostgreSQL database backend using `tokio-postgres`

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use async_trait::async_trait;
use rungs_core::TargetConfig;
use tokio_postgres::{Client, NoTls};

/// PostgreSQL database backend.
///
/// Connects without TLS (the equivalent of `sslmode=disable`). The
/// connection future is driven by a task on the current tokio runtime.
pub struct PostgresBackend {
    client: Client,
}

impl PostgresBackend {
    /// Build the driver configuration for a target
    pub fn client_config(target: &TargetConfig) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        if let Some(host) = &target.host {
            config.host(host);
        }
        if let Some(port) = target.port {
            config.port(port);
        }
        if let Some(database) = &target.database {
            config.dbname(database);
        }
        if let Some(user) = &target.user {
            config.user(user);
        }
        if let Some(password) = &target.password {
            config.password(password);
        }
        config
    }

    /// Connect to the PostgreSQL server described by `target`
    pub async fn connect(target: &TargetConfig) -> DbResult<Self> {
        let (client, connection) = Self::client_config(target)
            .connect(NoTls)
            .await
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("PostgreSQL connection error: {e}");
            }
        });

        Ok(Self { client })
    }
}

#[async_trait]
impl Database for PostgresBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        let statement = self.client.prepare(sql).await?;
        let affected = self.client.execute(&statement, &[]).await?;
        Ok(affected as usize)
    }

    async fn query_strings(&self, sql: &str) -> DbResult<Vec<String>> {
        let statement = self.client.prepare(sql).await?;
        let rows = self.client.query(&statement, &[]).await?;

        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(value) = row.try_get::<_, Option<String>>(0)? {
                values.push(value);
            }
        }
        Ok(values)
    }

    fn db_type(&self) -> &'static str {
        "postgres"
    }
}
