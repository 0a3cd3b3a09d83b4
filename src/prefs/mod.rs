//! Persisted Preferences
//!
//! Small key-value store holding the provisioning state that must
//! survive restarts: the first-setup flag and the database name.

pub mod file;

pub use file::FilePreferences;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Key flagging that the schema has been provisioned once
pub const FIRST_SETUP_KEY: &str = "first_setup_key";

/// Key holding the resolved database file name
pub const DB_NAME_KEY: &str = "dbname";

/// Errors raised by a preference store
#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("Failed to read preferences from {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write preferences to {path}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Preference document is not valid JSON: {path}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Async boundary over the platform key-value store
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Read a value; `None` when the key was never set
    async fn get(&self, key: &str) -> Result<Option<String>, PrefsError>;

    /// Set or replace a value
    async fn set(&self, key: &str, value: &str) -> Result<(), PrefsError>;

    /// Delete a key; deleting an absent key is not an error
    async fn remove(&self, key: &str) -> Result<(), PrefsError>;
}

#[async_trait]
impl<P: PreferenceStore + ?Sized> PreferenceStore for Arc<P> {
    async fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), PrefsError> {
        (**self).remove(key).await
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferences {
    async fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        Ok(self.values.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PrefsError> {
        self.values.lock().remove(key);
        Ok(())
    }
}
