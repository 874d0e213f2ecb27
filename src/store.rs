use crate::error::{Error, Result};
use crate::product::Product;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Store key holding the serialized selection
pub const SELECTION_KEY: &str = "selectedProducts";

/// Durable string key-value store
///
/// The selection is kept under a single key as a JSON document. Implementations
/// report failures; [`SelectionStore`] decides to swallow them.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Store that lives only as long as the process
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON file of string keys to string values
///
/// Every write replaces the whole file through a temporary sibling so a crash
/// never leaves a half-written store behind. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_contents(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&self.path).map(Some).map_err(|e| {
            Error::Persistence(format!("failed to read {}: {}", self.path.display(), e))
        })
    }

    fn parse_entries(&self, data: &str) -> Result<BTreeMap<String, String>> {
        if data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(data).map_err(|e| {
            Error::Persistence(format!("failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(|e| {
                    Error::Persistence(format!("failed to create {}: {}", dir.display(), e))
                })?;
            }
        }

        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| Error::Persistence(format!("failed to serialize store: {}", e)))?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, bytes).map_err(|e| {
            Error::Persistence(format!("failed to write {}: {}", tmp_path.display(), e))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            Error::Persistence(format!("failed to replace {}: {}", self.path.display(), e))
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.read_contents()? {
            Some(data) => Ok(self.parse_entries(&data)?.remove(key)),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // Corrupt contents are replaced; read failures are not.
        let mut entries = match self.read_contents()? {
            Some(data) => self.parse_entries(&data).unwrap_or_else(|e| {
                warn!("discarding corrupt store: {}", e);
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }
}

/// Best-effort persistence of the selection
///
/// Neither operation ever fails: a save that cannot be written is logged and
/// leaves the previous stored value in place, and a load that finds nothing
/// usable yields an empty selection.
///
/// # Example
///
/// ```rust
/// use routine_builder::{MemoryStore, Product, SelectionStore};
///
/// let mut store = SelectionStore::new(MemoryStore::new());
/// assert!(store.load().is_empty());
///
/// store.save(&[Product::new("Foam Wash", "X", "Cleanser")]);
/// assert_eq!(store.load()[0].name, "Foam Wash");
/// ```
#[derive(Debug)]
pub struct SelectionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SelectionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn save(&mut self, selection: &[Product]) {
        let serialized = match serde_json::to_string(selection) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!("could not serialize selected products: {}", e);
                return;
            }
        };

        match self.store.set(SELECTION_KEY, &serialized) {
            Ok(()) => debug!(count = selection.len(), "saved selected products"),
            Err(e) => warn!("could not save selected products: {}", e),
        }
    }

    pub fn load(&self) -> Vec<Product> {
        let raw = match self.store.get(SELECTION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("could not load selected products: {}", e);
                return Vec::new();
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("stored selection is not valid JSON: {}", e);
                return Vec::new();
            }
        };
        if !value.is_array() {
            warn!("stored selection is not a list, ignoring it");
            return Vec::new();
        }

        serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("stored selection has malformed entries: {}", e);
            Vec::new()
        })
    }

    pub fn inner(&self) -> &S {
        &self.store
    }
}
