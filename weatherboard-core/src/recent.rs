//! Most-recently-used list of looked-up cities, persisted in a key-value store.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io,
    path::PathBuf,
};

use thiserror::Error;
use tracing::{debug, warn};

/// Storage key holding the JSON-encoded list.
pub const RECENT_CITIES_KEY: &str = "cities";

/// Maximum number of cities kept.
pub const RECENT_CITIES_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode stored value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// In-memory store; nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Store backed by a single JSON object file. The file is rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io { path: self.path.clone(), source });
            }
        };

        match serde_json::from_str(&contents) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable store file");
                Ok(BTreeMap::new())
            }
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let mut all = self.read_all()?;
        all.insert(key.to_owned(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| StoreError::Io { path: parent.to_path_buf(), source })?;
        }

        let json = serde_json::to_string_pretty(&all)?;
        fs::write(&self.path, json)
            .map_err(|source| StoreError::Io { path: self.path.clone(), source })
    }
}

/// Bounded, duplicate-free, most-recent-first list of city names.
#[derive(Debug)]
pub struct RecentCitiesStore<S> {
    store: S,
}

impl<S: KeyValueStore> RecentCitiesStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current list, most recent first. Missing or malformed data reads as empty.
    pub fn cities(&self) -> Result<Vec<String>, StoreError> {
        let Some(raw) = self.store.get(RECENT_CITIES_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(list) => Ok(list),
            Err(e) => {
                warn!(error = %e, "Recent cities entry is malformed, starting over");
                Ok(Vec::new())
            }
        }
    }

    /// Put `city` at the front, dropping an older copy and anything past the limit.
    pub fn add(&mut self, city: &str) -> Result<(), StoreError> {
        let mut list = self.cities()?;
        list.retain(|c| c != city);
        list.insert(0, city.to_owned());
        list.truncate(RECENT_CITIES_LIMIT);

        debug!(city, size = list.len(), "Saving recent city");
        self.store
            .set(RECENT_CITIES_KEY, serde_json::to_string(&list)?)
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}
