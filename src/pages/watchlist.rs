use tracing::{error, info};

use super::dom::{ButtonAction, DescriptionState, MovieCard, MoviesSection, WatchlistButton};
use super::interaction::{ClickTarget, Interaction, PageKind};
use crate::render::{section_html, ScrollToTop};
use crate::watchlist::{WatchlistEntry, WatchlistStore};

pub const EMPTY_WATCHLIST_HTML: &str = r#"<p>Your watchlist is looking a little empty...</p>
    <a class="home-link" href="/index.html">
        <i class="fa-solid fa-circle-plus"></i>
        <p>Let's add some movies!</p>
    </a>"#;

/// State of the watchlist page. Renders only from the store, never from
/// the network.
#[derive(Debug)]
pub struct WatchlistPage {
    store: WatchlistStore,
    watchlist: Vec<WatchlistEntry>,
    section: MoviesSection,
    scroll: ScrollToTop,
    scroll_request: Option<f64>,
}

impl WatchlistPage {
    pub fn new(store: WatchlistStore) -> Self {
        let mut page = Self {
            store,
            watchlist: Vec::new(),
            section: MoviesSection::Empty,
            scroll: ScrollToTop::new(),
            scroll_request: None,
        };
        page.reload();
        page
    }

    pub fn section(&self) -> &MoviesSection {
        &self.section
    }

    pub fn html(&self) -> String {
        section_html(&self.section)
    }

    pub fn watchlist(&self) -> &[WatchlistEntry] {
        &self.watchlist
    }

    pub fn scroll(&self) -> &ScrollToTop {
        &self.scroll
    }

    pub fn take_scroll_request(&mut self) -> Option<f64> {
        self.scroll_request.take()
    }

    /// The store changed in another tab.
    pub fn on_storage_change(&mut self) {
        self.reload();
    }

    pub fn remove(&mut self, id: &str) {
        info!(id = %id, "Removing from watchlist");
        self.watchlist.retain(|m| m.id != id);
        if let Err(e) = self.store.save(&self.watchlist) {
            error!(error = %e, "Failed to save watchlist");
        }
        self.render();
    }

    pub fn read_more(&mut self, id: &str) {
        let Some(full) = self.watchlist.iter().find(|m| m.id == id).map(|m| &m.description) else {
            return;
        };
        if let Some(card) = self.section.card_mut(id) {
            if card.description.state == DescriptionState::Collapsed {
                card.description.expand(full);
            }
        }
    }

    pub fn show_less(&mut self, id: &str) {
        if let Some(card) = self.section.card_mut(id) {
            if card.description.state == DescriptionState::Expanded {
                card.description.collapse();
            }
        }
    }

    pub fn on_scroll(&mut self, offset: f64) {
        self.scroll.on_scroll(offset);
    }

    pub fn on_animation_end(&mut self) {
        self.scroll.on_animation_end();
    }

    pub fn handle(&mut self, interaction: Interaction) {
        match interaction {
            Interaction::ReadMore(id) => self.read_more(&id),
            Interaction::ShowLess(id) => self.show_less(&id),
            Interaction::RemoveFromWatchlist(id) => self.remove(&id),
            Interaction::ScrollTop => self.scroll_request = Some(0.0),
            Interaction::AddToWatchlist(_) | Interaction::ShowMore => {}
        }
    }

    pub fn click(&mut self, target: &ClickTarget) {
        if let Some(interaction) = Interaction::resolve(target, PageKind::Watchlist) {
            self.handle(interaction);
        }
    }

    fn reload(&mut self) {
        self.watchlist = self.store.load().into_entries();
        self.render();
    }

    fn render(&mut self) {
        if self.watchlist.is_empty() {
            self.section = MoviesSection::Message(EMPTY_WATCHLIST_HTML.to_string());
            return;
        }

        let button = WatchlistButton {
            action: ButtonAction::Remove,
            disabled: false,
        };
        let cards = self
            .watchlist
            .iter()
            .map(|entry| MovieCard::from_entry(entry, button))
            .collect();
        self.section = MoviesSection::Movies {
            cards,
            show_more: false,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watchlist::{KeyValueStore, MemoryStorage, SharedStorage, WATCHLIST_KEY};
    use std::sync::Arc;

    fn entry(id: &str, description: &str) -> WatchlistEntry {
        WatchlistEntry {
            id: id.to_string(),
            img: "N/A".to_string(),
            title: format!("Title {}", id),
            rating: "6.9".to_string(),
            runtime: "95 min".to_string(),
            category: "Comedy".to_string(),
            description: description.to_string(),
        }
    }

    fn store() -> (Arc<MemoryStorage>, WatchlistStore) {
        let storage = Arc::new(MemoryStorage::new());
        (storage.clone(), WatchlistStore::new(storage))
    }

    #[test]
    fn test_empty_watchlist_message() {
        let (_, store) = store();
        let page = WatchlistPage::new(store);
        assert_eq!(page.section().message(), Some(EMPTY_WATCHLIST_HTML));
        assert!(page.html().contains("href=\"/index.html\""));
    }

    #[test]
    fn test_renders_entries_with_remove_buttons() {
        let (_, store) = store();
        store.save(&[entry("tt1", "one"), entry("tt2", "two")]).unwrap();

        let page = WatchlistPage::new(store);
        let cards = page.section().cards();
        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|c| c.button.action == ButtonAction::Remove));
        assert!(cards.iter().all(|c| !c.button.disabled));
        assert!(page.html().contains("fa-circle-minus"));
    }

    #[test]
    fn test_remove_to_empty() {
        let (storage, store) = store();
        store.save(&[entry("tt1", "one")]).unwrap();
        let mut page = WatchlistPage::new(store);

        page.click(
            &ClickTarget::new()
                .with_class("modify-watchlist")
                .with_data_id("tt1"),
        );
        assert!(page.watchlist().is_empty());
        assert_eq!(page.section().message(), Some(EMPTY_WATCHLIST_HTML));
        assert_eq!(storage.get_item(WATCHLIST_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_read_more_uses_persisted_description() {
        let long = "Long persisted plot. ".repeat(10);
        let (_, store) = store();
        store.save(&[entry("tt1", &long)]).unwrap();
        let mut page = WatchlistPage::new(store);
        let original = page.html();

        page.handle(Interaction::ReadMore("tt1".to_string()));
        assert_eq!(page.section().card("tt1").unwrap().description.text, long);

        page.handle(Interaction::ShowLess("tt1".to_string()));
        assert_eq!(page.html(), original);
    }

    #[test]
    fn test_storage_change_rerenders() {
        let shared = SharedStorage::in_memory();
        let tab_a = shared.open_tab();
        let tab_b = shared.open_tab();
        let mut b_events = tab_b.subscribe();

        let mut page_b = WatchlistPage::new(WatchlistStore::new(Arc::new(tab_b)));
        assert!(page_b.section().message().is_some());

        let store_a = WatchlistStore::new(Arc::new(tab_a));
        store_a.save(&[entry("tt7", "seven")]).unwrap();

        assert!(b_events.try_changed().is_some());
        page_b.on_storage_change();
        assert_eq!(page_b.section().cards().len(), 1);
    }
}
