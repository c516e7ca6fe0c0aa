//! Drive the pages from the command line, against the proxy and the
//! file-backed watchlist store.

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::pages::interaction::SHOW_MORE_BUTTON_ID;
use crate::pages::{ApiError, ClickTarget, MovieApi, ProxyClient, Session};
use crate::watchlist::FileStorage;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Proxy client error: {0}")]
    Api(#[from] ApiError),
}

pub fn open_session(config: &Config) -> Session {
    info!("Watchlist stored in {}", config.storage.path);
    Session::new(Arc::new(FileStorage::new(&config.storage.path)))
}

/// Search for `title`, click "show more" until `pages` pages are shown,
/// then add each of `add` to the watchlist. Returns the rendered section.
pub async fn search(config: &Config, title: &str, pages: u32, add: &[String]) -> Result<String, CommandError> {
    let api = ProxyClient::new(config.proxy.url.clone())?;
    Ok(search_with(api, &open_session(config), title, pages, add).await)
}

pub async fn search_with<A: MovieApi>(
    api: A,
    session: &Session,
    title: &str,
    pages: u32,
    add: &[String],
) -> String {
    let mut tab = session.open_search(api);
    let page = &mut tab.page;
    page.submit(title).await;

    let show_more = ClickTarget::new().with_id(SHOW_MORE_BUTTON_ID);
    let mut clicks = 1;
    while clicks < pages && page.section().has_show_more() {
        page.click(&show_more).await;
        clicks += 1;
    }

    for id in add {
        page.click(&ClickTarget::new().with_class("modify-watchlist").with_data_id(id))
            .await;
    }

    page.html()
}

/// Render the watchlist page after removing each of `remove`.
pub fn watchlist(config: &Config, remove: &[String]) -> String {
    watchlist_with(&open_session(config), remove)
}

pub fn watchlist_with(session: &Session, remove: &[String]) -> String {
    let mut tab = session.open_watchlist();
    let page = &mut tab.page;
    for id in remove {
        page.click(&ClickTarget::new().with_class("modify-watchlist").with_data_id(id));
    }
    page.html()
}
