use minicrm_core::db::migrations::latest_version;
use minicrm_core::db::{open_db, open_db_in_memory, DbError};
use minicrm_core::prefs::PrefError;
use minicrm_core::{
    LeadFilters, LeadStatus, MemoryPreferenceStore, PreferenceStore, Preferences,
    SqlitePreferenceStore,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "preferences");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.db");

    let first = open_db(&path).unwrap();
    assert_eq!(schema_version(&first), latest_version());
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    assert_table_exists(&second, "preferences");
}

#[test]
fn newer_schema_version_is_rejected() {
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

    let err = SqlitePreferenceStore::open(&path).err().unwrap();
    assert!(matches!(err, PrefError::Db(DbError::UnsupportedSchemaVersion { .. })));
}

#[test]
fn sqlite_store_upserts_and_removes() {
    let store = SqlitePreferenceStore::open_in_memory().unwrap();
    assert_eq!(store.get_raw("k").unwrap(), None);

    store.set_raw("k", "\"one\"").unwrap();
    store.set_raw("k", "\"two\"").unwrap();
    assert_eq!(store.get_raw("k").unwrap().as_deref(), Some("\"two\""));

    store.set_raw("other", "1").unwrap();
    store.remove("k").unwrap();
    assert_eq!(store.get_raw("k").unwrap(), None);
    assert_eq!(store.get_raw("other").unwrap().as_deref(), Some("1"));

    store.clear().unwrap();
    assert_eq!(store.get_raw("other").unwrap(), None);
}

#[test]
fn typed_preferences_round_trip_through_both_backends() {
    let filters = LeadFilters {
        status: Some(LeadStatus::Unqualified),
        source: None,
    };

    let memory = Preferences::new(MemoryPreferenceStore::new());
    assert!(memory.set("filters", &filters));
    assert_eq!(memory.get("filters", LeadFilters::default()), filters);

    let sqlite = Preferences::new(SqlitePreferenceStore::open_in_memory().unwrap());
    assert!(sqlite.set("filters", &filters));
    assert_eq!(sqlite.get("filters", LeadFilters::default()), filters);
    assert_eq!(
        sqlite.store().get_raw("filters").unwrap().as_deref(),
        Some(r#"{"status":"unqualified","source":null}"#)
    );
    assert!(sqlite.clear());
    assert_eq!(sqlite.get("filters", LeadFilters::default()), LeadFilters::default());
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

#[test]
fn statement_errors_name_the_preference_key() {
    let store = SqlitePreferenceStore::from_connection(Connection::open_in_memory().unwrap());

    let err = store.get_raw("mini-seller-filters").unwrap_err();
    match &err {
        PrefError::Db(DbError::Statement { key, .. }) => {
            assert_eq!(key.as_deref(), Some("mini-seller-filters"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("`mini-seller-filters`"));

    let err = store.clear().unwrap_err();
    assert!(matches!(
        err,
        PrefError::Db(DbError::Statement { key: None, .. })
    ));
}
