use rusqlite::Connection;
use talent_core::db::migrations::{latest_version, schema_version};
use talent_core::db::{open_db, open_db_in_memory, DbError};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "documents");
    assert_index_exists(&conn, "idx_documents_github_username");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("talent.sqlite3");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first).unwrap(), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), latest_version());
    assert_table_exists(&conn_second, "documents");
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
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn documents_reject_non_json_fields() {
    let conn = open_db_in_memory().unwrap();

    let result = conn.execute(
        "INSERT INTO documents (collection, id, fields) VALUES ('candidates', 'a', 'not json');",
        [],
    );
    assert!(result.is_err());

    conn.execute(
        "INSERT INTO documents (collection, id, fields) VALUES ('candidates', 'a', '{}');",
        [],
    )
    .unwrap();
    let duplicate = conn.execute(
        "INSERT INTO documents (collection, id, fields) VALUES ('candidates', 'a', '{}');",
        [],
    );
    assert!(duplicate.is_err());
}

#[test]
fn version_one_database_gains_username_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v1.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE documents (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            fields TEXT NOT NULL CHECK (json_valid(fields)),
            created_at INTEGER NOT NULL DEFAULT 0,
            updated_at INTEGER NOT NULL DEFAULT 0,
            UNIQUE (collection, id)
        );
        INSERT INTO documents (collection, id, fields)
            VALUES ('candidates', 'c1', '{\"githubUsername\": \"ann\"}');
        PRAGMA user_version = 1;",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_index_exists(&conn, "idx_documents_github_username");
    let kept: i64 = conn
        .query_row("SELECT COUNT(*) FROM documents;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(kept, 1);
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert_schema_object(conn, "table", table_name);
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert_schema_object(conn, "index", index_name);
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
