use std::sync::Arc;

use tracing::debug;

use super::api::MovieApi;
use super::search::SearchPage;
use super::watchlist::WatchlistPage;
use crate::watchlist::{KeyValueStore, SharedStorage, StorageEvents, WatchlistStore};

/// A page that reloads when another tab changes the store.
pub trait StorageListener {
    fn on_storage_change(&mut self);
}

impl<A: MovieApi> StorageListener for SearchPage<A> {
    fn on_storage_change(&mut self) {
        SearchPage::on_storage_change(self)
    }
}

impl StorageListener for WatchlistPage {
    fn on_storage_change(&mut self) {
        WatchlistPage::on_storage_change(self)
    }
}

/// Open pages sharing one watchlist store, like browser tabs on one origin.
#[derive(Debug, Clone)]
pub struct Session {
    storage: SharedStorage,
}

impl Session {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage: SharedStorage::new(backend),
        }
    }

    pub fn open_search<A: MovieApi>(&self, api: A) -> Tab<SearchPage<A>> {
        self.open(|store| SearchPage::new(api, store))
    }

    pub fn open_watchlist(&self) -> Tab<WatchlistPage> {
        self.open(WatchlistPage::new)
    }

    fn open<P>(&self, page: impl FnOnce(WatchlistStore) -> P) -> Tab<P> {
        let tab = self.storage.open_tab();
        // Subscribe before the page loads so no write from another tab is missed.
        let events = tab.subscribe();
        Tab {
            page: page(WatchlistStore::new(Arc::new(tab))),
            events,
        }
    }
}

/// One open page and the storage events addressed to it.
#[derive(Debug)]
pub struct Tab<P> {
    pub page: P,
    events: StorageEvents,
}

impl<P: StorageListener> Tab<P> {
    /// Apply whatever other tabs changed since the last call. Any number of
    /// pending events cause a single reload. Returns whether it reloaded.
    pub fn sync(&mut self) -> bool {
        let mut pending = 0;
        while self.events.try_changed().is_some() {
            pending += 1;
        }
        if pending == 0 {
            return false;
        }
        debug!(pending, "Reloading after storage change");
        self.page.on_storage_change();
        true
    }

    /// Wait for another tab to change the store, then reload. Returns
    /// `false` once the store is gone.
    pub async fn follow(&mut self) -> bool {
        let Some(event) = self.events.changed().await else {
            return false;
        };
        debug!(key = ?event.key, "Reloading after storage change");
        // Whatever else queued up meanwhile is covered by this reload.
        while self.events.try_changed().is_some() {}
        self.page.on_storage_change();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::omdb::{MovieDetails, MovieSummary, SearchResponse};
    use crate::pages::api::{ApiError, SearchQuery};
    use crate::pages::ClickTarget;
    use crate::watchlist::MemoryStorage;
    use async_trait::async_trait;

    /// Two movies, `tt1` and `tt2`, on one page.
    struct TwoMovies;

    #[async_trait]
    impl MovieApi for TwoMovies {
        async fn search(&self, _query: &SearchQuery) -> Result<SearchResponse, ApiError> {
            let search = ["tt1", "tt2"]
                .iter()
                .map(|id| MovieSummary {
                    title: format!("Movie {}", id),
                    year: "1999".to_string(),
                    imdb_id: id.to_string(),
                    movie_type: "movie".to_string(),
                    poster: "N/A".to_string(),
                })
                .collect();
            Ok(SearchResponse {
                search,
                total_results: Some("2".to_string()),
                response: Some("True".to_string()),
                error: None,
            })
        }

        async fn lookup(&self, id: &str) -> Result<MovieDetails, ApiError> {
            Ok(MovieDetails {
                imdb_id: id.to_string(),
                title: format!("Movie {}", id),
                poster: "N/A".to_string(),
                imdb_rating: "6.0".to_string(),
                runtime: "88 min".to_string(),
                genre: "Horror".to_string(),
                plot: "Short.".to_string(),
                response: Some("True".to_string()),
                error: None,
            })
        }
    }

    fn add(id: &str) -> ClickTarget {
        ClickTarget::new().with_class("modify-watchlist").with_data_id(id)
    }

    #[tokio::test]
    async fn test_remove_in_one_tab_reenables_add_in_other() {
        let session = Session::new(Arc::new(MemoryStorage::new()));
        let mut search = session.open_search(TwoMovies);
        let mut watchlist = session.open_watchlist();

        search.page.submit("anything").await;
        search.page.click(&add("tt1")).await;
        search.page.click(&add("tt2")).await;
        assert!(!search.sync());

        assert!(watchlist.sync());
        assert_eq!(watchlist.page.section().cards().len(), 2);

        watchlist.page.click(&add("tt1"));
        assert_eq!(watchlist.page.section().cards().len(), 1);
        assert!(!watchlist.sync());

        assert!(search.sync());
        assert!(!search.page.section().card("tt1").unwrap().button.disabled);
        assert!(search.page.section().card("tt2").unwrap().button.disabled);
        assert_eq!(search.page.watchlist().len(), 1);
    }

    #[tokio::test]
    async fn test_follow_reloads_once_for_queued_changes() {
        let session = Session::new(Arc::new(MemoryStorage::new()));
        let mut watchlist = session.open_watchlist();
        let mut search = session.open_search(TwoMovies);
        search.page.submit("anything").await;

        search.page.click(&add("tt1")).await;
        search.page.click(&add("tt2")).await;
        assert!(watchlist.follow().await);
        assert!(!watchlist.sync());

        let ids: Vec<_> = watchlist.page.watchlist().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["tt1", "tt2"]);
    }
}
