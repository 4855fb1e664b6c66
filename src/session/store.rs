use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

/// Script-accessible client storage: string keys to string values, shared by
/// the credential entry and the serialized Principal. Absence of a value and
/// absence of the storage itself look identical to callers.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

pub type SharedStateStore = Arc<dyn StateStore>;

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }
    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }
    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

/// Write-through store backed by a JSON file, so the session survives process
/// restarts the way browser storage survives page loads. IO failures degrade
/// to in-memory behavior and are never surfaced to callers.
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<HashMap<String, String>>(&text) {
                Ok(map) => map,
                Err(e) => {
                    warn!(target: "session", "state file {} unreadable, starting empty: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, entries: RwLock::new(entries) }
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Some(dir) = self.path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        match serde_json::to_string_pretty(entries) {
            Ok(text) => {
                if let Err(e) = std::fs::write(&self.path, text) {
                    warn!(target: "session", "failed to persist state file {}: {}", self.path.display(), e);
                }
            }
            Err(e) => warn!(target: "session", "failed to serialize state entries: {}", e),
        }
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }
    fn set(&self, key: &str, value: &str) {
        let mut map = self.entries.write();
        map.insert(key.to_string(), value.to_string());
        self.persist(&map);
    }
    fn remove(&self, key: &str) {
        let mut map = self.entries.write();
        map.remove(key);
        self.persist(&map);
    }
}

/// Storage unavailable (non-browser execution context): every operation is a
/// no-op returning absent. Callers treat absent as "not authenticated".
pub struct NullStore;

impl StateStore for NullStore {
    fn get(&self, _key: &str) -> Option<String> { None }
    fn set(&self, _key: &str, _value: &str) {}
    fn remove(&self, _key: &str) {}
}
