use ktech_core::db::migrations::latest_version;
use ktech_core::db::{open_db, open_db_in_memory, DbError};
use ktech_core::{KvRepository, SqliteKvRepository};
use rusqlite::{params, Connection};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ktech.sqlite3");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "kv_entries");
}

#[test]
fn open_db_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("profile").join("ktech.sqlite3");

    let conn = open_db(&path).unwrap();
    assert_table_exists(&conn, "kv_entries");
    assert!(path.exists());
}

#[test]
fn unusable_parent_directory_reports_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let err = open_db(blocker.join("ktech.sqlite3")).unwrap_err();
    match err {
        DbError::CreateDirectory { path, .. } => assert_eq!(path, blocker),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn kv_entries_stamps_updated_at_on_insert() {
    let conn = open_db_in_memory().unwrap();
    let before_ms = chrono::Utc::now().timestamp_millis() - 1_000;

    conn.execute(
        "INSERT INTO kv_entries (key, value) VALUES (?1, ?2);",
        params!["userSettings", "{}"],
    )
    .unwrap();

    let updated_at: i64 = conn
        .query_row(
            "SELECT updated_at FROM kv_entries WHERE key = 'userSettings';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(updated_at >= before_ms, "updated_at={updated_at}");
}

#[test]
fn kv_entries_enforces_one_row_per_key_and_non_null_values() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv_entries (key, value) VALUES ('currentUser', '{}');",
        [],
    )
    .unwrap();

    assert!(conn
        .execute(
            "INSERT INTO kv_entries (key, value) VALUES ('currentUser', '[]');",
            [],
        )
        .is_err());
    assert!(conn
        .execute(
            "INSERT INTO kv_entries (key, value) VALUES ('userTasks', NULL);",
            [],
        )
        .is_err());
}

#[test]
fn overwriting_a_key_refreshes_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    repo.put("userTasks", "[]").unwrap();
    conn.execute(
        "UPDATE kv_entries SET updated_at = 0 WHERE key = 'userTasks';",
        [],
    )
    .unwrap();

    repo.put("userTasks", "[1]").unwrap();

    let (count, updated_at): (i64, i64) = conn
        .query_row(
            "SELECT COUNT(*), MAX(updated_at) FROM kv_entries WHERE key = 'userTasks';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(count, 1);
    assert!(updated_at > 0);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
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
