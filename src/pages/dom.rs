use crate::omdb::{MovieDetails, NOT_AVAILABLE};
use crate::render::truncate_description;
use crate::watchlist::WatchlistEntry;

/// How much of a card's plot is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionState {
    /// Short enough to show whole, no toggle.
    Plain,
    /// Truncated, with a "Read more" button.
    Collapsed,
    /// Full text, with a "Show less" button.
    Expanded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    /// Displayed text, without the trailing ellipsis.
    pub text: String,
    pub state: DescriptionState,
}

impl Description {
    pub fn new(full: &str) -> Self {
        match truncate_description(full) {
            Some(short) => Self {
                text: short.to_string(),
                state: DescriptionState::Collapsed,
            },
            None => Self {
                text: full.to_string(),
                state: DescriptionState::Plain,
            },
        }
    }

    pub fn expand(&mut self, full: &str) {
        self.text = full.to_string();
        self.state = DescriptionState::Expanded;
    }

    /// Cut the displayed text back down, as "Show less" does.
    pub fn collapse(&mut self) {
        if let Some(short) = truncate_description(&self.text) {
            self.text = short.to_string();
        }
        self.state = DescriptionState::Collapsed;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Add,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchlistButton {
    pub action: ButtonAction,
    pub disabled: bool,
}

/// A rendered movie card. Adding to the watchlist reads from here, not from
/// the API payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieCard {
    pub id: String,
    /// Poster URL, `None` renders the placeholder.
    pub img: Option<String>,
    pub title: String,
    pub rating: String,
    pub runtime: String,
    pub category: String,
    pub description: Description,
    pub button: WatchlistButton,
}

impl MovieCard {
    /// A search result card, from the lookup payload.
    pub fn from_details(details: &MovieDetails, button: WatchlistButton) -> Self {
        Self {
            id: details.imdb_id.clone(),
            img: poster_url(&details.poster),
            title: details.title.clone(),
            rating: details.imdb_rating.clone(),
            runtime: details.runtime.clone(),
            category: details.genre.clone(),
            description: Description::new(&details.plot),
            button,
        }
    }

    pub fn from_entry(entry: &WatchlistEntry, button: WatchlistButton) -> Self {
        Self {
            id: entry.id.clone(),
            img: poster_url(&entry.img),
            title: entry.title.clone(),
            rating: entry.rating.clone(),
            runtime: entry.runtime.clone(),
            category: entry.category.clone(),
            description: Description::new(&entry.description),
            button,
        }
    }

    /// Snapshot this card as a watchlist entry with the given full plot.
    pub fn to_entry(&self, description: &str) -> WatchlistEntry {
        WatchlistEntry {
            id: self.id.clone(),
            img: self.img.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            title: self.title.clone(),
            rating: self.rating.clone(),
            runtime: self.runtime.clone(),
            category: self.category.clone(),
            description: description.to_string(),
        }
    }
}

fn poster_url(poster: &str) -> Option<String> {
    (poster != NOT_AVAILABLE && !poster.is_empty()).then(|| poster.to_string())
}

/// Contents of the `#movies-section` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MoviesSection {
    /// Nothing rendered yet.
    #[default]
    Empty,
    /// A message box; the string is trusted inner markup.
    Message(String),
    Movies {
        cards: Vec<MovieCard>,
        show_more: bool,
    },
}

impl MoviesSection {
    pub fn cards(&self) -> &[MovieCard] {
        match self {
            MoviesSection::Movies { cards, .. } => cards,
            _ => &[],
        }
    }

    pub fn card(&self, id: &str) -> Option<&MovieCard> {
        self.cards().iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: &str) -> Option<&mut MovieCard> {
        match self {
            MoviesSection::Movies { cards, .. } => cards.iter_mut().find(|c| c.id == id),
            _ => None,
        }
    }

    pub fn has_show_more(&self) -> bool {
        matches!(self, MoviesSection::Movies { show_more: true, .. })
    }

    pub fn set_show_more(&mut self, value: bool) {
        if let MoviesSection::Movies { show_more, .. } = self {
            *show_more = value;
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            MoviesSection::Message(html) => Some(html),
            _ => None,
        }
    }
}
