//! Commands fed from files on disk.

use std::io::Write;

use oxide_sql_cli::{Options, OutputFormat, parse, read_input, tables, tokens};
use oxide_sql_core::{DbType, Feature, Features};
use tempfile::NamedTempFile;

fn sql_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn options(db_type: DbType, format: OutputFormat) -> Options {
    Options {
        db_type,
        features: Features::empty(),
        format,
    }
}

// ============================================================================
// Input
// ============================================================================

#[test]
fn test_read_from_file() {
    let file = sql_file("SELECT 1;\n");
    let sql = read_input(None, Some(file.path())).unwrap();
    assert_eq!(sql, "SELECT 1;\n");
}

#[test]
fn test_missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.sql");
    let err = read_input(None, Some(&path)).unwrap_err();
    assert!(err.to_string().contains("missing.sql"));
}

// ============================================================================
// Commands
// ============================================================================

#[test]
fn test_tables_from_hive_file() {
    let file = sql_file(
        "SELECT a FROM db.events LATERAL VIEW explode(xs) v AS a;\n\
         SELECT * FROM users u JOIN db.events e ON u.id = e.uid;\n",
    );
    let sql = read_input(None, Some(file.path())).unwrap();
    let out = tables(&sql, &options(DbType::Hive, OutputFormat::Json)).unwrap();
    let names: Vec<String> = serde_json::from_str(&out).unwrap();
    assert_eq!(names, vec!["db.events", "users"]);
}

#[test]
fn test_parse_error_location_from_file() {
    let file = sql_file("SELECT *\nFORM a");
    let sql = read_input(None, Some(file.path())).unwrap();
    let err = parse(&sql, &options(DbType::MySql, OutputFormat::Text)).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("line 2"), "{message}");
    assert!(message.contains("column 1"), "{message}");
}

#[test]
fn test_comments_never_become_tokens() {
    let sql = "-- note\nSELECT 1";
    let plain = tokens(sql, &options(DbType::Other, OutputFormat::Text)).unwrap();
    let mut with_comments = options(DbType::Other, OutputFormat::Text);
    with_comments.features = Features::from(Feature::KeepComments);
    let kept = tokens(sql, &with_comments).unwrap();
    assert_eq!(plain.lines().count(), kept.lines().count());
    assert!(plain.starts_with("2:1\tSELECT"));
}
