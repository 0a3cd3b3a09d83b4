//! File-backed preference store
//!
//! Persists the key-value map as a single pretty-printed JSON document.
//! Writes go through a temp file and rename so a crash mid-write never
//! leaves a truncated document behind.

use super::{PreferenceStore, PrefsError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON-document preference store
pub struct FilePreferences {
    path: PathBuf,
    // Guards read-modify-write cycles on the document
    lock: Mutex<()>,
}

impl FilePreferences {
    /// Store backed by the given JSON file; the file is created on first set
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn path_str(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<HashMap<String, String>, PrefsError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| PrefsError::Read {
            path: self.path_str(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| PrefsError::Malformed {
            path: self.path_str(),
            source,
        })
    }

    fn store(&self, values: &HashMap<String, String>) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| PrefsError::Write {
                path: self.path_str(),
                source,
            })?;
        }

        let content =
            serde_json::to_string_pretty(values).map_err(|source| PrefsError::Malformed {
                path: self.path_str(),
                source,
            })?;

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, content).map_err(|source| PrefsError::Write {
            path: self.path_str(),
            source,
        })?;
        std::fs::rename(&temp_path, &self.path).map_err(|source| PrefsError::Write {
            path: self.path_str(),
            source,
        })?;

        debug!("Persisted {} preference keys to {}", values.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for FilePreferences {
    async fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        let _guard = self.lock.lock();
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.store(&values)
    }

    async fn remove(&self, key: &str) -> Result<(), PrefsError> {
        let _guard = self.lock.lock();
        let mut values = self.load()?;
        if values.remove(key).is_some() {
            self.store(&values)?;
        }
        Ok(())
    }
}
