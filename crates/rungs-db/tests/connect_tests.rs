//! Tests for the `connect` factory

use rungs_core::{DbType, TargetConfig};
use rungs_db::{connect, Database};
use tempfile::TempDir;

fn duckdb_target(path: Option<String>) -> TargetConfig {
    TargetConfig {
        db_type: DbType::DuckDb,
        path,
        host: None,
        port: None,
        user: None,
        password: None,
        database: None,
        migrations: "migrations".to_string(),
        history_table: None,
    }
}

#[tokio::test]
async fn test_connect_duckdb_in_memory_by_default() {
    let db = connect(&duckdb_target(None)).await.unwrap();

    assert_eq!(db.db_type(), "duckdb");
    db.execute("CREATE TABLE t (name VARCHAR)").await.unwrap();
    db.execute("INSERT INTO t VALUES ('a')").await.unwrap();
    assert_eq!(db.query_strings("SELECT name FROM t").await.unwrap(), vec!["a"]);
}

#[tokio::test]
async fn test_connect_duckdb_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.duckdb");

    {
        let db = connect(&duckdb_target(Some(path.display().to_string())))
            .await
            .unwrap();
        db.execute("CREATE TABLE t (name VARCHAR)").await.unwrap();
    }

    assert!(path.exists());
    let db = connect(&duckdb_target(Some(path.display().to_string())))
        .await
        .unwrap();
    assert!(db.query_strings("SELECT name FROM t").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_connect_duckdb_bad_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("store.duckdb");

    let err = match connect(&duckdb_target(Some(path.display().to_string()))).await {
        Ok(_) => panic!("opening a file in a missing directory should fail"),
        Err(err) => err,
    };
    assert!(err.to_string().contains("[D001]"));
}
