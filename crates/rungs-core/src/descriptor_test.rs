use super::*;
use tempfile::TempDir;

#[test]
fn test_parse_create_without_fix() {
    let (kind, version) = parse_file_name("v1.0_x.sql").unwrap();
    assert_eq!(kind, ActionKind::Create);
    assert_eq!(version, Version::new(1, 0, 0));
}

#[test]
fn test_parse_create_with_fix() {
    let (kind, version) = parse_file_name("v1.0.1_add_col.sql").unwrap();
    assert_eq!(kind, ActionKind::Create);
    assert_eq!(version, Version::new(1, 0, 1));
}

#[test]
fn test_parse_undo() {
    let (kind, version) = parse_file_name("u2.13_drop_users.sql").unwrap();
    assert_eq!(kind, ActionKind::Undo);
    assert_eq!(version, Version::new(2, 13, 0));
}

#[test]
fn test_parse_dot_after_prefix() {
    let (kind, version) = parse_file_name("v.3.4.5_legacy_layout.sql").unwrap();
    assert_eq!(kind, ActionKind::Create);
    assert_eq!(version, Version::new(3, 4, 5));
}

#[test]
fn test_parse_extra_component_is_dropped() {
    let (_, version) = parse_file_name("v1.2.3.9_hotfix.sql").unwrap();
    assert_eq!(version, Version::new(1, 2, 3));
}

#[test]
fn test_parse_procedure_forces_zero_version() {
    let (kind, version) = parse_file_name("p_refresh_view.sql").unwrap();
    assert_eq!(kind, ActionKind::Procedure);
    assert_eq!(version, Version::default());

    // Anything after the `p` is ignored, including digits
    let (kind, version) = parse_file_name("p9.9_other.sql").unwrap();
    assert_eq!(kind, ActionKind::Procedure);
    assert_eq!(version, Version::new(0, 0, 0));
}

#[test]
fn test_parse_without_underscore_names_file() {
    let err = parse_file_name("noversion.sql").unwrap_err();
    match err {
        CoreError::InvalidFileName { name, .. } => assert_eq!(name, "noversion.sql"),
        other => panic!("expected InvalidFileName, got {other:?}"),
    }
}

#[test]
fn test_parse_unknown_prefix() {
    let err = parse_file_name("x1.0_create.sql").unwrap_err();
    assert!(err.to_string().contains("x1.0_create.sql"));
    assert!(err.to_string().contains("unknown prefix"));
}

#[test]
fn test_parse_missing_minor() {
    assert!(parse_file_name("v1_create.sql").is_err());
    assert!(parse_file_name("v_create.sql").is_err());
}

#[test]
fn test_parse_too_many_components() {
    assert!(parse_file_name("v1.2.3.4.5_create.sql").is_err());
}

#[test]
fn test_parse_non_numeric_component() {
    let err = parse_file_name("v1.a_create.sql").unwrap_err();
    assert!(err.to_string().contains("minor"));

    assert!(parse_file_name("v1.0.x_create.sql").is_err());
    assert!(parse_file_name("v1.-1_create.sql").is_err());
    assert!(parse_file_name("v+1.0_create.sql").is_err());
    assert!(parse_file_name("v1..0_create.sql").is_err());
}

#[test]
fn test_action_kind_ordinals() {
    assert!(ActionKind::Procedure.ordinal() < ActionKind::Undo.ordinal());
    assert!(ActionKind::Undo.ordinal() < ActionKind::Create.ordinal());
    for kind in [ActionKind::Procedure, ActionKind::Undo, ActionKind::Create] {
        assert_eq!(ActionKind::from_prefix(kind.prefix()), Some(kind));
    }
    assert_eq!(ActionKind::from_prefix('m'), None);
}

#[test]
fn test_version_display() {
    assert_eq!(Version::new(1, 2, 3).to_string(), "1.2.3");
}

#[test]
fn test_from_contents_splits_create() {
    let m = Migration::from_contents(
        "v1.0_create.sql",
        "/tmp/v1.0_create.sql",
        "SELECT 1; -- note\nSELECT 2;\n",
    )
    .unwrap();
    assert_eq!(m.statements, vec!["SELECT 1", "SELECT 2"]);
    assert!(!m.is_procedure());
}

#[test]
fn test_from_contents_keeps_procedure_verbatim() {
    let body = "CREATE OR REPLACE FUNCTION f() RETURNS int AS $$\n-- doc\nBEGIN RETURN 1; END;\n$$ LANGUAGE plpgsql;\n";
    let m = Migration::from_contents("p_refresh_view.sql", "/tmp/p_refresh_view.sql", body).unwrap();
    assert!(m.is_procedure());
    assert_eq!(m.statements, vec![body.to_string()]);
}

#[test]
fn test_from_contents_may_yield_no_statements() {
    let m = Migration::from_contents("v1.0_empty.sql", "/tmp/x", "-- nothing here\n;\n").unwrap();
    assert!(m.statements.is_empty());
}

#[test]
fn test_load_reads_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("v0.1_init.sql");
    std::fs::write(&path, "CREATE TABLE a (id INT);\nCREATE TABLE b (id INT);").unwrap();

    let m = Migration::load(&path).unwrap();
    assert_eq!(m.name, "v0.1_init.sql");
    assert_eq!(m.location, path);
    assert_eq!(m.version, Version::new(0, 1, 0));
    assert_eq!(m.statements.len(), 2);
}

#[test]
fn test_load_bad_name_fails_before_reading() {
    let dir = TempDir::new().unwrap();
    // The file does not exist; the naming error must still win
    let err = Migration::load(&dir.path().join("broken.sql")).unwrap_err();
    assert!(matches!(err, CoreError::InvalidFileName { .. }));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Migration::load(&dir.path().join("v1.0_missing.sql")).unwrap_err();
    assert!(matches!(err, CoreError::IoWithPath { .. }));
}

#[test]
fn test_load_non_utf8_contents_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("v1.0_latin1.sql");
    std::fs::write(&path, b"INSERT INTO t VALUES ('caf\xe9');").unwrap();

    let err = Migration::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::IoWithPath { .. }));
    assert!(err.to_string().contains("v1.0_latin1.sql"));
}
