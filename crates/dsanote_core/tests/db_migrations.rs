use dsanote_core::db::migrations::latest_version;
use dsanote_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_schema_object(&conn, "table", "entries");
    assert_schema_object(&conn, "table", "print_groups");
    assert_schema_object(&conn, "index", "idx_entries_parent_order");
}

#[test]
fn reopening_file_database_keeps_rows_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dsanote.sqlite3");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO print_groups (id, name, print_order) VALUES ('g1', 'Graphs', 0);",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let groups: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM print_groups;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(groups, 1);
}

#[test]
fn schema_rejects_reserved_group_id_and_unknown_parent() {
    let conn = open_db_in_memory().unwrap();

    let reserved = conn.execute(
        "INSERT INTO print_groups (id, name) VALUES ('unorganized', 'Nope');",
        [],
    );
    assert!(reserved.is_err());

    let dangling = conn.execute(
        "INSERT INTO entries (id, title, parent_id) VALUES ('e1', 'Two Sum', 'missing');",
        [],
    );
    assert!(dangling.is_err(), "foreign keys should be enforced");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::NewerSchema { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn opening_file_in_missing_directory_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("dsanote.sqlite3");

    let err = open_db(&path).unwrap_err();
    assert!(err.to_string().contains("dsanote.sqlite3"));
    match err {
        DbError::Open { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn failed_upgrade_reports_the_schema_step_and_keeps_old_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("half.sqlite3");

    // Claims schema 1 without its tables, so the index step has nothing to index.
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 1;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::Migration { version, .. } => assert_eq!(version, 2),
        other => panic!("unexpected error: {other}"),
    }
    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn), 1);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_schema_object(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
