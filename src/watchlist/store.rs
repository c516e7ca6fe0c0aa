use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::model::WatchlistEntry;
use super::storage::{KeyValueStore, StorageError};

/// Key the watchlist is stored under.
pub const WATCHLIST_KEY: &str = "moviesInWatchlist";

/// Result of reading the persisted watchlist. Reading never fails; bad data
/// is repaired and reported as `Recovered`.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(Vec<WatchlistEntry>),
    Recovered {
        entries: Vec<WatchlistEntry>,
        reason: Recovery,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    /// Nothing stored under the key.
    Missing,
    /// The stored text is not JSON.
    InvalidJson,
    /// Valid JSON, but not an array.
    NotAnArray,
    /// Some elements were missing fields and were removed.
    DroppedEntries(usize),
    /// The storage itself could not be read.
    Unreadable,
}

impl LoadOutcome {
    pub fn entries(&self) -> &[WatchlistEntry] {
        match self {
            LoadOutcome::Loaded(entries) | LoadOutcome::Recovered { entries, .. } => entries,
        }
    }

    pub fn into_entries(self) -> Vec<WatchlistEntry> {
        match self {
            LoadOutcome::Loaded(entries) | LoadOutcome::Recovered { entries, .. } => entries,
        }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, LoadOutcome::Recovered { .. })
    }
}

/// Validate persisted watchlist text. Returns the conforming entries and, if
/// anything had to be repaired, why.
pub fn validate(raw: Option<&str>) -> (Vec<WatchlistEntry>, Option<Recovery>) {
    let Some(raw) = raw else {
        return (Vec::new(), Some(Recovery::Missing));
    };
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => return (Vec::new(), Some(Recovery::InvalidJson)),
    };
    let Value::Array(items) = value else {
        return (Vec::new(), Some(Recovery::NotAnArray));
    };

    let total = items.len();
    let entries: Vec<WatchlistEntry> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    let dropped = total - entries.len();
    if dropped > 0 {
        (entries, Some(Recovery::DroppedEntries(dropped)))
    } else {
        (entries, None)
    }
}

/// The persisted watchlist, read and written as a whole.
#[derive(Clone)]
pub struct WatchlistStore {
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for WatchlistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchlistStore").finish_non_exhaustive()
    }
}

impl WatchlistStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Read the watchlist, repairing the stored value as a side effect:
    /// non-conforming elements are removed and written back, and a value
    /// that is not an array wipes the store.
    pub fn load(&self) -> LoadOutcome {
        let raw = match self.storage.get_item(WATCHLIST_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Watchlist storage unreadable, resetting");
                self.wipe();
                return LoadOutcome::Recovered {
                    entries: Vec::new(),
                    reason: Recovery::Unreadable,
                };
            }
        };

        let (entries, recovery) = validate(raw.as_deref());
        let Some(reason) = recovery else {
            debug!(count = entries.len(), "Loaded watchlist");
            return LoadOutcome::Loaded(entries);
        };

        match reason {
            Recovery::DroppedEntries(dropped) => {
                warn!(dropped, "Removed malformed watchlist entries");
                if let Err(e) = self.save(&entries) {
                    warn!(error = %e, "Failed to write back repaired watchlist");
                }
            }
            Recovery::Missing => self.wipe(),
            _ => {
                warn!(reason = ?reason, "Stored watchlist is malformed, resetting");
                self.wipe();
            }
        }

        LoadOutcome::Recovered { entries, reason }
    }

    /// Overwrite the persisted watchlist with `entries`.
    pub fn save(&self, entries: &[WatchlistEntry]) -> Result<(), StorageError> {
        let value = serde_json::to_string(entries)?;
        self.storage.set_item(WATCHLIST_KEY, &value)?;
        debug!(count = entries.len(), "Saved watchlist");
        Ok(())
    }

    fn wipe(&self) {
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "Failed to clear storage");
        }
    }
}
