use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

/// A string key-value store with the semantics of a browser's local storage.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Remove every key.
    fn clear(&self) -> Result<(), StorageError>;
    /// Number of stored keys.
    fn len(&self) -> Result<usize, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error on {0}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("Storage file {0} is not a JSON object: {1}")]
    Corrupt(PathBuf, serde_json::Error),
    #[error("Failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Storage lock poisoned")]
    Poisoned,
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.read().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|_| StorageError::Poisoned)?;
        items.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize, StorageError> {
        let items = self.items.read().map_err(|_| StorageError::Poisoned)?;
        Ok(items.len())
    }
}

/// Keeps all keys in one JSON object file. Every call goes to disk, so
/// separate processes see each other's writes.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write within this process.
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(StorageError::Io(self.path.clone(), e)),
        };
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StorageError::Corrupt(self.path.clone(), e))
    }

    fn write_all(&self, items: &HashMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(items)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Io(parent.to_path_buf(), e))?;
        }
        std::fs::write(&self.path, content).map_err(|e| StorageError::Io(self.path.clone(), e))
    }
}

impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        // A corrupt file is replaced rather than blocking every write.
        let mut items = match self.read_all() {
            Err(StorageError::Corrupt(path, e)) => {
                warn!(path = %path.display(), error = %e, "Replacing corrupt storage file");
                HashMap::new()
            }
            other => other?,
        };
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }

    fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        self.write_all(&HashMap::new())
    }

    fn len(&self) -> Result<usize, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.read_all()?.len())
    }
}

/// Change notification delivered to every tab other than the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// The changed key, `None` when the store was cleared.
    pub key: Option<String>,
    pub origin: Uuid,
}

/// A store shared by several open tabs. Writes go through a [`StorageTab`],
/// and a write that changes the stored value notifies all other tabs.
#[derive(Clone)]
pub struct SharedStorage {
    backend: Arc<dyn KeyValueStore>,
    events: broadcast::Sender<StorageEvent>,
}

impl std::fmt::Debug for SharedStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStorage")
            .field("listeners", &self.events.receiver_count())
            .finish()
    }
}

impl SharedStorage {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self { backend, events }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Open a new tab on this store.
    pub fn open_tab(&self) -> StorageTab {
        StorageTab {
            id: Uuid::new_v4(),
            shared: self.clone(),
        }
    }
}

/// One tab's handle on a [`SharedStorage`].
#[derive(Debug, Clone)]
pub struct StorageTab {
    id: Uuid,
    shared: SharedStorage,
}

impl StorageTab {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn subscribe(&self) -> StorageEvents {
        StorageEvents {
            tab: self.id,
            rx: self.shared.events.subscribe(),
        }
    }

    fn notify(&self, key: Option<&str>) {
        debug!(tab = %self.id, key = ?key, "Storage changed");
        // No receivers just means no other tab is open.
        let _ = self.shared.events.send(StorageEvent {
            key: key.map(str::to_string),
            origin: self.id,
        });
    }
}

impl KeyValueStore for StorageTab {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.shared.backend.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let previous = self.shared.backend.get_item(key).ok().flatten();
        self.shared.backend.set_item(key, value)?;
        if previous.as_deref() != Some(value) {
            self.notify(Some(key));
        }
        Ok(())
    }

    /// Clearing an already empty store is not a change and notifies no one.
    fn clear(&self) -> Result<(), StorageError> {
        let had_items = self.shared.backend.len().map(|n| n > 0).unwrap_or(true);
        self.shared.backend.clear()?;
        if had_items {
            self.notify(None);
        }
        Ok(())
    }

    fn len(&self) -> Result<usize, StorageError> {
        self.shared.backend.len()
    }
}

/// Storage-change notifications for one tab; the tab's own writes are skipped.
#[derive(Debug)]
pub struct StorageEvents {
    tab: Uuid,
    rx: broadcast::Receiver<StorageEvent>,
}

impl StorageEvents {
    /// Wait for the next change made by another tab. Returns `None` once the
    /// store is gone.
    pub async fn changed(&mut self) -> Option<StorageEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.origin == self.tab => continue,
                Ok(event) => return Some(event),
                // Missed some events; one reload covers all of them.
                Err(broadcast::error::RecvError::Lagged(_)) => {
                    return Some(StorageEvent {
                        key: None,
                        origin: Uuid::nil(),
                    })
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`changed`](Self::changed).
    pub fn try_changed(&mut self) -> Option<StorageEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) if event.origin == self.tab => continue,
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => {
                    return Some(StorageEvent {
                        key: None,
                        origin: Uuid::nil(),
                    })
                }
                Err(_) => return None,
            }
        }
    }
}
