use std::{collections::HashMap, fs, path::PathBuf, sync::Mutex};

use serde::{Deserialize, Serialize};

use marketplace_core::{errors::Error, settings::PreferenceStore, Result};

const CURRENT_VERSION: u32 = 1;

/// Preferences kept as a small JSON document on disk.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    lock: Mutex<()>,
}

#[derive(Serialize, Deserialize, Default)]
struct PreferenceFile {
    version: u32,
    preferences: HashMap<String, String>,
}

impl FilePreferenceStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn with_store<F>(&self, op: F) -> Result<()>
    where
        F: FnOnce(&mut HashMap<String, String>),
    {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::Preferences("Preference store lock poisoned".into()))?;
        let mut store = self.load_store_locked()?;
        op(&mut store);
        self.persist_store_locked(store)
    }

    fn read_store(&self) -> Result<HashMap<String, String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::Preferences("Preference store lock poisoned".into()))?;
        self.load_store_locked()
    }

    fn load_store_locked(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let raw = fs::read(&self.path)?;
        if raw.is_empty() {
            return Ok(HashMap::new());
        }

        let file: PreferenceFile = serde_json::from_slice(&raw)
            .map_err(|e| Error::Preferences(format!("{}: {}", self.path.display(), e)))?;
        Ok(file.preferences)
    }

    fn persist_store_locked(&self, preferences: HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = PreferenceFile {
            version: CURRENT_VERSION,
            preferences,
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| Error::Preferences(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get_preference(&self, key: &str) -> Result<Option<String>> {
        let store = self.read_store()?;
        Ok(store.get(key).cloned())
    }

    fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        self.with_store(|store| {
            store.insert(key.to_string(), value.to_string());
        })
    }
}
