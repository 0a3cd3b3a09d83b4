//! Bundled SQLite engine
//!
//! Production implementation of [`SqliteEngine`] over the bundled
//! `rusqlite` backend. Databases live as files under a data directory
//! and connections are held in a named registry, so the provisioning
//! flow addresses them the way a mobile plugin would: by database name,
//! not by path.

use super::{EngineError, SqliteEngine};
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Pragmas applied to every connection the engine opens
const CONNECTION_PRAGMAS: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous = NORMAL;
    PRAGMA foreign_keys = ON;
";

/// File-backed engine over bundled SQLite
pub struct BundledEngine {
    data_dir: PathBuf,
    connections: Mutex<HashMap<String, Connection>>,
}

impl BundledEngine {
    /// Create an engine that stores database files under `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Create an engine rooted at the platform data directory
    pub fn with_default_dir() -> Result<Self> {
        Ok(Self::new(super::get_data_dir()?))
    }

    /// Directory the engine stores database files in
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of the file backing a named database
    pub fn database_path(&self, database: &str) -> PathBuf {
        self.data_dir.join(database)
    }

    fn open_file(&self, database: &str, create: bool) -> Result<Connection, EngineError> {
        let path = self.database_path(database);
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
        if create {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        } else if !path.exists() {
            return Err(EngineError::MissingDatabase(path));
        }

        let conn = Connection::open_with_flags(&path, flags).map_err(|source| {
            EngineError::Sqlite {
                database: database.to_string(),
                source,
            }
        })?;
        conn.execute_batch(CONNECTION_PRAGMAS)
            .map_err(|source| EngineError::Sqlite {
                database: database.to_string(),
                source,
            })?;

        debug!("Opened database file {}", path.display());
        Ok(conn)
    }
}

#[async_trait]
impl SqliteEngine for BundledEngine {
    async fn request_permissions(&self) -> Result<(), EngineError> {
        // Desktop analog of the mobile storage permission: the data
        // directory must exist and accept writes.
        std::fs::create_dir_all(&self.data_dir).map_err(|source| EngineError::Unwritable {
            path: self.data_dir.clone(),
            source,
        })?;

        let probe = self.data_dir.join(".write-probe");
        std::fs::write(&probe, b"ok").map_err(|source| EngineError::Unwritable {
            path: self.data_dir.clone(),
            source,
        })?;
        let _ = std::fs::remove_file(&probe);

        debug!("Storage probe succeeded at {}", self.data_dir.display());
        Ok(())
    }

    async fn init_web_store(&self) -> Result<(), EngineError> {
        Err(EngineError::WebStoreUnsupported)
    }

    async fn create_connection(&self, database: &str) -> Result<(), EngineError> {
        // Registering a connection never creates the file; a warm start
        // against a missing database must fail loudly.
        let conn = self.open_file(database, false)?;
        self.connections.lock().insert(database.to_string(), conn);
        info!("Registered connection for '{}'", database);
        Ok(())
    }

    async fn open(&self, database: &str) -> Result<(), EngineError> {
        let connections = self.connections.lock();
        let conn = connections
            .get(database)
            .ok_or_else(|| EngineError::NoConnection(database.to_string()))?;

        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|source| EngineError::Sqlite {
                database: database.to_string(),
                source,
            })?;

        debug!("Database '{}' is open and responding", database);
        Ok(())
    }

    async fn execute(&self, database: &str, statement: &str) -> Result<(), EngineError> {
        let mut connections = self.connections.lock();
        let conn = match connections.entry(database.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            // First statement on a cold start arrives before any
            // connection exists; create the file on demand.
            Entry::Vacant(entry) => entry.insert(self.open_file(database, true)?),
        };

        conn.execute_batch(statement)
            .map_err(|source| EngineError::Sqlite {
                database: database.to_string(),
                source,
            })
    }

    async fn close_connection(&self, database: &str) -> Result<(), EngineError> {
        match self.connections.lock().remove(database) {
            Some(_) => {
                info!("Closed connection for '{}'", database);
                Ok(())
            }
            None => Err(EngineError::NoConnection(database.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_execute_creates_database_file() {
        let dir = tempdir().unwrap();
        let engine = BundledEngine::new(dir.path());

        engine
            .execute("plant.db", "CREATE TABLE IF NOT EXISTS Widgets (id INT PRIMARY KEY)")
            .await
            .unwrap();

        assert!(engine.database_path("plant.db").exists());
    }

    #[tokio::test]
    async fn test_create_connection_requires_existing_file() {
        let dir = tempdir().unwrap();
        let engine = BundledEngine::new(dir.path());

        let err = engine.create_connection("missing.db").await.unwrap_err();
        assert!(matches!(err, EngineError::MissingDatabase(_)));
    }

    #[tokio::test]
    async fn test_open_requires_registered_connection() {
        let dir = tempdir().unwrap();
        let engine = BundledEngine::new(dir.path());

        let err = engine.open("plant.db").await.unwrap_err();
        assert!(matches!(err, EngineError::NoConnection(_)));
    }

    #[tokio::test]
    async fn test_warm_reopen_after_cold_create() {
        let dir = tempdir().unwrap();
        let engine = BundledEngine::new(dir.path());

        engine
            .execute("plant.db", "CREATE TABLE IF NOT EXISTS Widgets (id INT PRIMARY KEY)")
            .await
            .unwrap();
        engine.close_connection("plant.db").await.unwrap();

        // Fresh engine simulating the next process start
        let engine = BundledEngine::new(dir.path());
        engine.create_connection("plant.db").await.unwrap();
        engine.open("plant.db").await.unwrap();
    }

    #[tokio::test]
    async fn test_connections_enforce_foreign_keys() {
        let dir = tempdir().unwrap();
        let engine = BundledEngine::new(dir.path());

        engine
            .execute(
                "plant.db",
                "CREATE TABLE IF NOT EXISTS Parents (id INT PRIMARY KEY)",
            )
            .await
            .unwrap();
        engine
            .execute(
                "plant.db",
                "CREATE TABLE IF NOT EXISTS Children (
                    id INT PRIMARY KEY,
                    parent INT NOT NULL,
                    FOREIGN KEY(parent) REFERENCES Parents(id)
                )",
            )
            .await
            .unwrap();

        let orphan = engine
            .execute("plant.db", "INSERT INTO Children (id, parent) VALUES (1, 99)")
            .await;
        assert!(orphan.is_err(), "Orphan row must violate the foreign key");
    }

    #[tokio::test]
    async fn test_journal_mode_is_wal() {
        let dir = tempdir().unwrap();
        let engine = BundledEngine::new(dir.path());

        engine
            .execute("plant.db", "CREATE TABLE IF NOT EXISTS Widgets (id INT PRIMARY KEY)")
            .await
            .unwrap();
        engine.close_connection("plant.db").await.unwrap();

        // WAL persists in the file, so a direct connection sees it
        let conn = Connection::open(engine.database_path("plant.db")).unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_close_unknown_connection_errors() {
        let dir = tempdir().unwrap();
        let engine = BundledEngine::new(dir.path());

        let err = engine.close_connection("plant.db").await.unwrap_err();
        assert!(matches!(err, EngineError::NoConnection(_)));
    }

    #[tokio::test]
    async fn test_request_permissions_creates_data_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested").join("data");
        let engine = BundledEngine::new(&nested);

        engine.request_permissions().await.unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_web_store_is_unsupported() {
        let dir = tempdir().unwrap();
        let engine = BundledEngine::new(dir.path());

        let err = engine.init_web_store().await.unwrap_err();
        assert!(matches!(err, EngineError::WebStoreUnsupported));
    }
}
