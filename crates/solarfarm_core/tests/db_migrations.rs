use solarfarm_core::db::migrations::latest_version;
use solarfarm_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "solar_panel");
}

#[test]
fn opening_same_database_twice_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("solarfarm.sqlite3");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO solar_panel (section, \"row\", \"column\", year_installed, material, is_tracking)
             VALUES ('Main', 1, 1, 2020, 'CIGS', 1);",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM solar_panel;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn tracking_flag_is_constrained_to_boolean() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO solar_panel (section, \"row\", \"column\", year_installed, material, is_tracking)
         VALUES ('Main', 1, 1, 2020, 'CIGS', 2);",
        [],
    );
    assert!(result.is_err());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn upgrading_from_first_schema_fills_section_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE solar_panel (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            section TEXT NOT NULL,
            \"row\" INTEGER NOT NULL,
            \"column\" INTEGER NOT NULL,
            year_installed INTEGER NOT NULL,
            material TEXT NOT NULL,
            is_tracking INTEGER NOT NULL DEFAULT 0 CHECK (is_tracking IN (0, 1))
        );
        INSERT INTO solar_panel (section, \"row\", \"column\", year_installed, material, is_tracking)
        VALUES ('Über Hill', 1, 1, 2020, 'CIGS', 1);
        PRAGMA user_version = 1;",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let key: String = conn
        .query_row("SELECT section_key FROM solar_panel WHERE id = 1;", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(key, "über hill");
}

#[test]
fn failed_step_names_its_version_and_keeps_old_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drifted.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE solar_panel (id INTEGER PRIMARY KEY, section TEXT, section_key TEXT);
        PRAGMA user_version = 1;",
    )
    .unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::Migration { version, .. } => assert_eq!(version, 2),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(schema_version(&Connection::open(&path).unwrap()), 1);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
