pub mod model;
pub mod storage;
pub mod store;

pub use model::WatchlistEntry;
pub use storage::{
    FileStorage, KeyValueStore, MemoryStorage, SharedStorage, StorageError, StorageEvent,
    StorageEvents, StorageTab,
};
pub use store::{LoadOutcome, Recovery, WatchlistStore, WATCHLIST_KEY};
