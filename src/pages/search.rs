use std::collections::HashMap;

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use super::api::{MovieApi, SearchQuery};
use super::dom::{ButtonAction, DescriptionState, MovieCard, MoviesSection, WatchlistButton};
use super::interaction::{ClickTarget, Interaction, PageKind};
use crate::omdb::{MovieSummary, SearchResponse, MOVIE_NOT_FOUND};
use crate::render::{escape, section_html, ScrollToTop};
use crate::watchlist::{model, WatchlistEntry, WatchlistStore};

pub const NOT_FOUND_HTML: &str =
    "<p>Unable to find what you're looking for. Please try another search.</p>";
pub const NO_MOVIES_HTML: &str = "<p>Error: Can not get movies at the moment.</p>";
/// Shown when the proxy itself could not be reached or answered with an error status.
pub const COULD_NOT_GET_MOVIES: &str = "Could not get movies at the moment.";

/// State of the search page, owned by one page load.
pub struct SearchPage<A> {
    api: A,
    store: WatchlistStore,
    watchlist: Vec<WatchlistEntry>,
    /// The page "show more" will fetch, `None` before the first search.
    next_page: Option<SearchQuery>,
    max_pages: u32,
    /// Full plots of the cards on screen, by id. First writer wins.
    descriptions: HashMap<String, String>,
    /// Some lookup of the current pass failed.
    pass_failed: bool,
    section: MoviesSection,
    scroll: ScrollToTop,
    scroll_request: Option<f64>,
}

impl<A> std::fmt::Debug for SearchPage<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPage")
            .field("next_page", &self.next_page)
            .field("max_pages", &self.max_pages)
            .field("cards", &self.section.cards().len())
            .finish_non_exhaustive()
    }
}

impl<A: MovieApi> SearchPage<A> {
    pub fn new(api: A, store: WatchlistStore) -> Self {
        let watchlist = store.load().into_entries();
        Self {
            api,
            store,
            watchlist,
            next_page: None,
            max_pages: 1,
            descriptions: HashMap::new(),
            pass_failed: false,
            section: MoviesSection::Empty,
            scroll: ScrollToTop::new(),
            scroll_request: None,
        }
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

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    pub fn next_page(&self) -> Option<&SearchQuery> {
        self.next_page.as_ref()
    }

    pub fn scroll(&self) -> &ScrollToTop {
        &self.scroll
    }

    /// A pending "scroll to this offset" from the scroll-to-top button.
    pub fn take_scroll_request(&mut self) -> Option<f64> {
        self.scroll_request.take()
    }

    /// Search form submitted.
    pub async fn submit(&mut self, title: &str) {
        self.pass_failed = false;
        self.descriptions.clear();
        info!(title = %title, "Searching");

        let query = SearchQuery::new(title, 1);
        let response = self.search(&query).await;

        if let Some(error) = response.error.as_deref() {
            self.next_page = None;
            self.max_pages = 1;
            self.section = if error == MOVIE_NOT_FOUND {
                MoviesSection::Message(NOT_FOUND_HTML.to_string())
            } else {
                MoviesSection::Message(format!("<p>Error: {}</p>", escape(error)))
            };
            return;
        }

        self.max_pages = response.max_pages();
        self.next_page = Some(query);

        let cards = self.fetch_cards(&response.search).await;
        if cards.is_empty() {
            self.next_page = None;
            self.section = MoviesSection::Message(NO_MOVIES_HTML.to_string());
            return;
        }

        self.section = MoviesSection::Movies {
            cards,
            show_more: false,
        };
        self.finish_pass();
    }

    /// "Show more results" clicked. Fetches the remembered page and appends
    /// its cards.
    pub async fn show_more(&mut self) {
        if !self.section.has_show_more() {
            return;
        }
        self.section.set_show_more(false);

        let Some(query) = self.next_page.clone() else {
            return;
        };
        self.pass_failed = false;

        let response = self.search(&query).await;
        if let Some(error) = response.error.as_deref() {
            warn!(page = query.page, error = %error, "Next page failed");
            self.pass_failed = true;
        } else {
            let cards = self.fetch_cards(&response.search).await;
            if let MoviesSection::Movies { cards: shown, .. } = &mut self.section {
                shown.extend(cards);
            }
        }
        self.finish_pass();
    }

    /// Add the card's movie to the watchlist, using what the card shows.
    pub fn add_to_watchlist(&mut self, id: &str) {
        let Some(card) = self.section.card(id) else {
            return;
        };
        // A disabled button can't be clicked.
        if card.button.disabled {
            return;
        }
        let Some(description) = self.descriptions.get(id) else {
            return;
        };

        let entry = card.to_entry(description);
        info!(id = %id, title = %entry.title, "Adding to watchlist");
        self.watchlist.push(entry);
        if let Err(e) = self.store.save(&self.watchlist) {
            error!(error = %e, "Failed to save watchlist");
        }

        if let Some(card) = self.section.card_mut(id) {
            card.button.disabled = true;
        }
    }

    pub fn read_more(&mut self, id: &str) {
        let Some(full) = self.descriptions.get(id) else {
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

    /// Another tab changed the stored watchlist. Re-enable the add button of
    /// any movie that is no longer on it.
    pub fn on_storage_change(&mut self) {
        self.watchlist = self.store.load().into_entries();
        if let MoviesSection::Movies { cards, .. } = &mut self.section {
            for card in cards.iter_mut() {
                if card.button.disabled && !model::contains(&self.watchlist, &card.id) {
                    debug!(id = %card.id, "Re-enabling add button");
                    card.button.disabled = false;
                }
            }
        }
    }

    pub fn on_scroll(&mut self, offset: f64) {
        self.scroll.on_scroll(offset);
    }

    pub fn on_animation_end(&mut self) {
        self.scroll.on_animation_end();
    }

    pub async fn handle(&mut self, interaction: Interaction) {
        match interaction {
            Interaction::ReadMore(id) => self.read_more(&id),
            Interaction::ShowLess(id) => self.show_less(&id),
            Interaction::AddToWatchlist(id) => self.add_to_watchlist(&id),
            Interaction::ShowMore => self.show_more().await,
            Interaction::ScrollTop => self.scroll_request = Some(0.0),
            Interaction::RemoveFromWatchlist(_) => {}
        }
    }

    pub async fn click(&mut self, target: &ClickTarget) {
        if let Some(interaction) = Interaction::resolve(target, PageKind::Search) {
            self.handle(interaction).await;
        }
    }

    async fn search(&self, query: &SearchQuery) -> SearchResponse {
        match self.api.search(query).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, page = query.page, "Search request failed");
                SearchResponse::failed(COULD_NOT_GET_MOVIES)
            }
        }
    }

    /// Look up every result concurrently and build cards for the ones that
    /// are new to this search.
    async fn fetch_cards(&mut self, movies: &[MovieSummary]) -> Vec<MovieCard> {
        let lookups: Vec<_> = movies.iter().map(|m| self.api.lookup(&m.imdb_id)).collect();
        let results = join_all(lookups).await;

        let mut cards = Vec::new();
        for (movie, result) in movies.iter().zip(results) {
            let details = match result {
                Ok(details) => details,
                Err(e) => {
                    warn!(id = %movie.imdb_id, error = %e, "Lookup failed");
                    self.pass_failed = true;
                    continue;
                }
            };

            let id = details.imdb_id.clone();
            if self.descriptions.contains_key(&id) {
                continue;
            }
            self.descriptions.insert(id.clone(), details.plot.clone());

            let button = WatchlistButton {
                action: ButtonAction::Add,
                disabled: model::contains(&self.watchlist, &id),
            };
            cards.push(MovieCard::from_details(&details, button));
        }
        cards
    }

    /// Move the cursor past a clean page, or leave it for a retry, and offer
    /// "show more" if there is anything left to fetch.
    fn finish_pass(&mut self) {
        let Some(query) = self.next_page.as_mut() else {
            return;
        };
        if !self.pass_failed {
            query.page += 1;
        }
        let more = query.page <= self.max_pages;
        debug!(next = query.page, max = self.max_pages, failed = self.pass_failed, "Page pass done");
        self.section.set_show_more(more);
    }
}
