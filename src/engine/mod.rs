//! Database Engine Boundary
//!
//! Abstracts the embedded SQLite engine behind an async trait so the
//! bootstrap flow can run against the bundled engine in production and
//! against scripted doubles in tests.

pub mod bundled;

pub use bundled::BundledEngine;

use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised at the engine boundary
#[derive(Debug, Error)]
pub enum EngineError {
    /// No connection has been registered under this database name
    #[error("No connection registered for database '{0}'")]
    NoConnection(String),
    /// Warm opens never create files; the database must already exist
    #[error("Database file does not exist: {}", .0.display())]
    MissingDatabase(PathBuf),
    /// The bundled engine has no browser-style persistent store
    #[error("Web store initialization is not supported by the bundled engine")]
    WebStoreUnsupported,
    /// The data directory could not be created or written to
    #[error("Storage location is not writable: {}", .path.display())]
    Unwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// An underlying SQLite call failed
    #[error("SQLite failure on '{database}'")]
    Sqlite {
        database: String,
        #[source]
        source: rusqlite::Error,
    },
}

/// Async boundary over the embedded database engine.
///
/// The operation set mirrors what the provisioning flow needs: platform
/// preparation (`request_permissions`, `init_web_store`), named-connection
/// lifecycle (`create_connection`, `open`, `close_connection`), and raw
/// statement execution (`execute`).
#[async_trait]
pub trait SqliteEngine: Send + Sync {
    /// Ask the platform for storage access. Callers may treat failure as
    /// non-fatal; the engine only reports it.
    async fn request_permissions(&self) -> Result<(), EngineError>;

    /// Initialize the browser persistent store backing the database.
    async fn init_web_store(&self) -> Result<(), EngineError>;

    /// Register a connection to an existing database file. Does not create
    /// the file; a missing database is an error.
    async fn create_connection(&self, database: &str) -> Result<(), EngineError>;

    /// Open a previously registered connection and verify it responds.
    async fn open(&self, database: &str) -> Result<(), EngineError>;

    /// Run a statement batch against the named database, creating the file
    /// and the connection on first use.
    async fn execute(&self, database: &str, statement: &str) -> Result<(), EngineError>;

    /// Close and drop the named connection.
    async fn close_connection(&self, database: &str) -> Result<(), EngineError>;
}

#[async_trait]
impl<E: SqliteEngine + ?Sized> SqliteEngine for Arc<E> {
    async fn request_permissions(&self) -> Result<(), EngineError> {
        (**self).request_permissions().await
    }

    async fn init_web_store(&self) -> Result<(), EngineError> {
        (**self).init_web_store().await
    }

    async fn create_connection(&self, database: &str) -> Result<(), EngineError> {
        (**self).create_connection(database).await
    }

    async fn open(&self, database: &str) -> Result<(), EngineError> {
        (**self).open(database).await
    }

    async fn execute(&self, database: &str, statement: &str) -> Result<(), EngineError> {
        (**self).execute(database, statement).await
    }

    async fn close_connection(&self, database: &str) -> Result<(), EngineError> {
        (**self).close_connection(database).await
    }
}

/// Get the application data directory
pub fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "sqgs", "sqgs-store")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

    let data_dir = proj_dirs.data_dir().to_path_buf();
    std::fs::create_dir_all(&data_dir)?;

    Ok(data_dir)
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "sqgs", "sqgs-store")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}
