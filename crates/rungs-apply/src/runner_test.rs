use super::*;
use crate::error::ErrorKind;
use crate::observer::LogObserver;
use crate::testing::{FakeDatabase, RecordingObserver};

fn migration(name: &str, contents: &str) -> Migration {
    Migration::from_contents(name, name, contents).unwrap()
}

fn three_files() -> Vec<Migration> {
    vec![
        migration("v1.0_create.sql", "CREATE TABLE a (id INT); CREATE TABLE b (id INT);"),
        migration("v1.1_add.sql", "ALTER TABLE a ADD COLUMN x INT;"),
        migration("v1.2_index.sql", "CREATE INDEX a_x ON a (x);"),
    ]
}

async fn run_once(db: &FakeDatabase, migrations: &[Migration]) -> ApplyResult<RunSummary> {
    let history = HistoryTracker::load(db, "migration_history").await?;
    let mut runner = MigrationRunner::new("local", db, history, &LogObserver);
    runner.run(migrations).await
}

#[tokio::test]
async fn test_first_run_applies_and_records_everything() {
    let db = FakeDatabase::new();

    let summary = run_once(&db, &three_files()).await.unwrap();

    assert_eq!(summary.target, "local");
    assert_eq!(
        summary.applied,
        vec!["v1.0_create.sql", "v1.1_add.sql", "v1.2_index.sql"]
    );
    assert!(summary.skipped.is_empty());
    assert_eq!(summary.statements_executed, 4);
    assert_eq!(
        db.executed(),
        vec![
            "CREATE TABLE a (id INT)",
            "CREATE TABLE b (id INT)",
            "ALTER TABLE a ADD COLUMN x INT",
            "CREATE INDEX a_x ON a (x)",
        ]
    );
    assert_eq!(db.history().unwrap().len(), 3);
}

#[tokio::test]
async fn test_second_run_skips_everything() {
    let db = FakeDatabase::new();
    let migrations = three_files();
    run_once(&db, &migrations).await.unwrap();
    let executed_before = db.executed().len();

    let observer = RecordingObserver::default();
    let history = HistoryTracker::load(&db, "migration_history").await.unwrap();
    let mut runner = MigrationRunner::new("local", &db, history, &observer);
    let summary = runner.run(&migrations).await.unwrap();

    assert!(summary.is_noop());
    assert_eq!(summary.statements_executed, 0);
    assert_eq!(summary.skipped.len(), 3);
    assert_eq!(db.executed().len(), executed_before);
    assert_eq!(
        observer.events(),
        vec![
            "local: skip v1.0_create.sql",
            "local: skip v1.1_add.sql",
            "local: skip v1.2_index.sql",
        ]
    );
}

#[tokio::test]
async fn test_failure_in_second_file_stops_the_run() {
    let db = FakeDatabase::new().fail_on("ALTER TABLE");
    let migrations = three_files();

    let history = HistoryTracker::load(&db, "migration_history").await.unwrap();
    let mut runner = MigrationRunner::new("local", &db, history, &LogObserver);
    let err = runner.run(&migrations).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Query);
    assert_eq!(err.file(), Some("v1.1_add.sql"));
    assert_eq!(err.statement(), Some("ALTER TABLE a ADD COLUMN x INT"));
    assert!(!err.is_procedure());
    assert_eq!(db.history(), Some(vec!["v1.0_create.sql".to_string()]));
    assert!(runner.history().contains("v1.0_create.sql"));
    assert!(!runner.history().contains("v1.1_add.sql"));
    assert!(!db.executed().iter().any(|s| s.starts_with("CREATE INDEX")));
}

#[tokio::test]
async fn test_failure_midway_through_a_file_keeps_earlier_statements() {
    let db = FakeDatabase::new().fail_on("TABLE b");
    let migrations = vec![migration(
        "v1.0_create.sql",
        "CREATE TABLE a (id INT); CREATE TABLE b (id INT); CREATE TABLE c (id INT);",
    )];

    let err = run_once(&db, &migrations).await.unwrap_err();

    assert_eq!(err.statement(), Some("CREATE TABLE b (id INT)"));
    assert_eq!(db.executed(), vec!["CREATE TABLE a (id INT)"]);
    assert_eq!(db.history(), Some(vec![]));
}

#[tokio::test]
async fn test_procedure_failure_is_flagged() {
    let body = "CREATE FUNCTION f() RETURNS INT AS $$ SELECT 1; $$ LANGUAGE sql;";
    let db = FakeDatabase::new().fail_on("CREATE FUNCTION");
    let migrations = vec![migration("p_f.sql", body)];

    let err = run_once(&db, &migrations).await.unwrap_err();

    assert!(err.is_procedure());
    assert_eq!(err.file(), Some("p_f.sql"));
    assert_eq!(err.statement(), Some(body));
    assert!(err.to_string().contains("[A002]"));
}

#[tokio::test]
async fn test_procedure_runs_as_one_statement() {
    let body = "CREATE FUNCTION f() RETURNS INT AS $$ SELECT 1; SELECT 2; $$ LANGUAGE sql;";
    let db = FakeDatabase::new();

    let summary = run_once(&db, &[migration("p_f.sql", body)]).await.unwrap();

    assert_eq!(summary.statements_executed, 1);
    assert_eq!(db.executed(), vec![body]);
}

#[tokio::test]
async fn test_file_without_statements_is_still_recorded() {
    let db = FakeDatabase::new();
    let migrations = vec![migration("v1.0_placeholder.sql", "-- nothing yet\n")];

    let summary = run_once(&db, &migrations).await.unwrap();

    assert_eq!(summary.applied, vec!["v1.0_placeholder.sql"]);
    assert_eq!(summary.statements_executed, 0);
    assert!(db.executed().is_empty());
    assert_eq!(db.history(), Some(vec!["v1.0_placeholder.sql".to_string()]));
}

#[tokio::test]
async fn test_history_insert_failure_reports_file() {
    let db = FakeDatabase::with_history(&[]).fail_history_insert();

    let err = run_once(&db, &three_files()).await.unwrap_err();

    assert!(matches!(err, ApplyError::HistoryInsert { .. }));
    assert_eq!(err.kind(), ErrorKind::History);
    assert_eq!(err.file(), Some("v1.0_create.sql"));
    // The schema change took effect before the insert failed.
    assert_eq!(db.executed().len(), 2);
}

#[tokio::test]
async fn test_overlong_name_rejected_before_execution() {
    let name = format!("v1.0_{}.sql", "x".repeat(100));
    let db = FakeDatabase::new();

    let err = run_once(&db, &[migration(&name, "CREATE TABLE a (id INT);")])
        .await
        .unwrap_err();

    assert!(matches!(err, ApplyError::NameTooLong { max: 100, .. }));
    assert!(db.executed().is_empty());
}

#[tokio::test]
async fn test_observer_sees_apply_events() {
    let db = FakeDatabase::with_history(&["v1.0_create.sql"]);
    let observer = RecordingObserver::default();
    let history = HistoryTracker::load(&db, "migration_history").await.unwrap();
    let mut runner = MigrationRunner::new("local", &db, history, &observer);

    runner.run(&three_files()[..2]).await.unwrap();

    assert_eq!(
        observer.events(),
        vec![
            "local: skip v1.0_create.sql",
            "local: apply v1.1_add.sql",
            "local: done v1.1_add.sql (1)",
        ]
    );
    assert_eq!(runner.into_history().len(), 2);
}

#[test]
fn test_plan_marks_applied_and_pending() {
    let migrations = three_files();
    let history = HistoryTracker::from_names("migration_history", ["v1.1_add.sql"]);

    let states: Vec<_> = plan(&migrations, &history)
        .iter()
        .map(|p| (p.migration.name.as_str(), p.state))
        .collect();

    assert_eq!(
        states,
        vec![
            ("v1.0_create.sql", MigrationState::Pending),
            ("v1.1_add.sql", MigrationState::Applied),
            ("v1.2_index.sql", MigrationState::Pending),
        ]
    );
}
