//! Key-value persistence for favorites and share records.
//!
//! Values are JSON strings. [`MemoryStore`] keeps everything in process;
//! [`FileStore`] keeps a single JSON object on disk and rewrites it on every
//! write.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::client::AiError;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AiError>;
    fn set(&self, key: &str, value: String) -> Result<(), AiError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AiError> {
        let entries = self.entries.lock().map_err(|e| AiError::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), AiError> {
        let mut entries = self.entries.lock().map_err(|e| AiError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// A JSON object file holding every key.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<Option<BTreeMap<String, String>>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<BTreeMap<String, String>, AiError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            tracing::error!("Failed to read store {}: {}", self.path.display(), e);
            AiError::Storage(e.to_string())
        })?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| {
            tracing::error!("Store {} is not valid JSON: {}", self.path.display(), e);
            AiError::Storage(e.to_string())
        })
    }

    fn write_file(&self, entries: &BTreeMap<String, String>) -> Result<(), AiError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| AiError::Storage(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(entries).map_err(|e| AiError::Storage(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, raw).map_err(|e| AiError::Storage(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            tracing::error!("Failed to write store {}: {}", self.path.display(), e);
            AiError::Storage(e.to_string())
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AiError> {
        let mut guard = self.entries.lock().map_err(|e| AiError::Storage(e.to_string()))?;
        if guard.is_none() {
            *guard = Some(self.read_file()?);
        }
        Ok(guard.as_ref().and_then(|entries| entries.get(key).cloned()))
    }

    fn set(&self, key: &str, value: String) -> Result<(), AiError> {
        let mut guard = self.entries.lock().map_err(|e| AiError::Storage(e.to_string()))?;
        let mut entries = match guard.as_ref() {
            Some(entries) => entries.clone(),
            None => self.read_file()?,
        };
        entries.insert(key.to_string(), value);
        // The cache only takes the new map once it is on disk
        self.write_file(&entries)?;
        *guard = Some(entries);
        Ok(())
    }
}
