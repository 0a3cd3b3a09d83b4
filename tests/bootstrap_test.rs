//! End-to-end provisioning tests over a real data directory.
//!
//! These run the full cold and warm flows with the bundled engine and
//! the file-backed preference store, then inspect the database file and
//! the preference document directly.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

use sqgs_store::schema;
use sqgs_store::{
    BootstrapError, BundledEngine, DbBootstrap, FilePreferences, InitMode, Platform,
    PreferenceStore, DB_NAME_KEY, FIRST_SETUP_KEY, TABLE_COUNT,
};

fn bootstrap_in(dir: &Path) -> DbBootstrap<Arc<BundledEngine>, FilePreferences> {
    let engine = Arc::new(BundledEngine::new(dir));
    let prefs = FilePreferences::new(dir.join("preferences.json"));
    DbBootstrap::new(engine, prefs).with_platform(Platform::Desktop)
}

fn user_tables(db_path: &Path) -> Vec<String> {
    let conn = Connection::open(db_path).unwrap();
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )
        .unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    names
}

#[tokio::test]
async fn test_cold_then_warm_start_roundtrip() {
    let dir = tempdir().unwrap();

    // Cold start: first run against an empty directory
    let bootstrap = bootstrap_in(dir.path());
    let watch = bootstrap.subscribe();
    assert!(!watch.is_ready());

    let report = bootstrap.initialize().await.unwrap();
    assert_eq!(report.mode, InitMode::ColdSetup);
    assert_eq!(report.tables.len(), TABLE_COUNT);
    assert!(report.all_succeeded());
    assert!(watch.is_ready());

    bootstrap.close().await.unwrap();
    drop(bootstrap);

    // The database file holds the full schema
    let db_path = dir.path().join("sqgs.db");
    assert!(db_path.exists());
    assert_eq!(user_tables(&db_path).len(), TABLE_COUNT);

    // The preference document records the completed setup
    let prefs_doc = std::fs::read_to_string(dir.path().join("preferences.json")).unwrap();
    let prefs: serde_json::Value = serde_json::from_str(&prefs_doc).unwrap();
    assert_eq!(prefs[FIRST_SETUP_KEY], "1");
    assert_eq!(prefs[DB_NAME_KEY], "sqgs.db");

    // Warm start: fresh instances simulating the next process
    let bootstrap = bootstrap_in(dir.path());
    assert!(!bootstrap.is_ready());

    let report = bootstrap.initialize().await.unwrap();
    assert_eq!(report.mode, InitMode::WarmOpen);
    assert!(report.tables.is_empty());
    assert!(bootstrap.is_ready());
    assert_eq!(bootstrap.db_name(), "sqgs.db");
}

#[tokio::test]
async fn test_created_tables_match_the_manifest() {
    let dir = tempdir().unwrap();

    let bootstrap = bootstrap_in(dir.path());
    bootstrap.initialize().await.unwrap();
    bootstrap.close().await.unwrap();

    let created = user_tables(&dir.path().join("sqgs.db"));
    let mut expected: Vec<&str> = schema::table_names().collect();
    expected.sort_unstable();
    assert_eq!(created, expected);
}

#[tokio::test]
async fn test_warm_start_without_persisted_name_errors() {
    let dir = tempdir().unwrap();

    // A previous run left the flag but lost the name
    let prefs = FilePreferences::new(dir.path().join("preferences.json"));
    prefs.set(FIRST_SETUP_KEY, "1").await.unwrap();

    let bootstrap = bootstrap_in(dir.path());
    let err = bootstrap.initialize().await.unwrap_err();

    assert!(matches!(err, BootstrapError::MissingDbName));
    assert!(!bootstrap.is_ready());
    assert!(!dir.path().join("sqgs.db").exists());
}

#[tokio::test]
async fn test_warm_start_with_missing_file_errors() {
    let dir = tempdir().unwrap();

    let prefs = FilePreferences::new(dir.path().join("preferences.json"));
    prefs.set(FIRST_SETUP_KEY, "1").await.unwrap();
    prefs.set(DB_NAME_KEY, "ghost.db").await.unwrap();

    let bootstrap = bootstrap_in(dir.path());
    let err = bootstrap.initialize().await.unwrap_err();

    match err {
        BootstrapError::WarmOpen { database, .. } => assert_eq!(database, "ghost.db"),
        other => panic!("Expected WarmOpen, got {:?}", other),
    }
    assert!(!bootstrap.is_ready());
    // The warm path must never create an empty database
    assert!(!dir.path().join("ghost.db").exists());
}

#[tokio::test]
async fn test_custom_database_name_survives_restarts() {
    let dir = tempdir().unwrap();

    // Cold start with a non-default name
    let engine = Arc::new(BundledEngine::new(dir.path()));
    let prefs = FilePreferences::new(dir.path().join("preferences.json"));
    let bootstrap = DbBootstrap::with_db_name(engine, prefs, "line4.db")
        .with_platform(Platform::Desktop);

    bootstrap.initialize().await.unwrap();
    bootstrap.close().await.unwrap();
    drop(bootstrap);

    assert!(dir.path().join("line4.db").exists());

    // The next process uses the standard default, but the persisted
    // name wins on a warm start
    let bootstrap = bootstrap_in(dir.path());
    let report = bootstrap.initialize().await.unwrap();

    assert_eq!(report.mode, InitMode::WarmOpen);
    assert_eq!(bootstrap.db_name(), "line4.db");
}

#[tokio::test]
async fn test_provisioned_schema_accepts_reference_data() {
    let dir = tempdir().unwrap();

    let bootstrap = bootstrap_in(dir.path());
    bootstrap.initialize().await.unwrap();
    bootstrap.close().await.unwrap();

    let conn = Connection::open(dir.path().join("sqgs.db")).unwrap();
    conn.execute_batch(
        "INSERT INTO Plants (id, plant_name) VALUES (1, 'Toledo Assembly');
         INSERT INTO Roles (id, description) VALUES (1, 'Inspector');
         INSERT INTO Users (id, plants, user_code, name, roles, is_active, is_loggedin)
             VALUES (1, 1, 'OP-100', 'Dana', 1, 1, 0);",
    )
    .unwrap();

    let user: String = conn
        .query_row("SELECT name FROM Users WHERE user_code = 'OP-100'", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(user, "Dana");
}
