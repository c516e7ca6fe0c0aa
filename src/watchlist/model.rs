use serde::{Deserialize, Serialize};

/// One movie on the watchlist, as persisted. Every field is required and
/// must be a string; anything else is dropped when the watchlist is read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchlistEntry {
    pub id: String,
    pub img: String,
    pub title: String,
    pub rating: String,
    pub runtime: String,
    pub category: String,
    pub description: String,
}

pub fn contains(entries: &[WatchlistEntry], id: &str) -> bool {
    entries.iter().any(|e| e.id == id)
}
