//! The two pages of the app: search and watchlist. Each page is one
//! controller struct owning its state, fed with clicks, form submissions,
//! scroll and storage-change events.

pub mod api;
pub mod dom;
pub mod interaction;
pub mod search;
pub mod session;
pub mod watchlist;

pub use api::{ApiError, MovieApi, ProxyClient, SearchQuery};
pub use dom::{MovieCard, MoviesSection};
pub use interaction::{ClickTarget, Interaction, PageKind};
pub use search::SearchPage;
pub use session::{Session, StorageListener, Tab};
pub use watchlist::WatchlistPage;
