/// The element a click landed on, with just enough of the DOM to decide
/// what the click means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickTarget {
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// The `data-id` attribute.
    pub data_id: Option<String>,
    pub parent: Option<Box<ClickTarget>>,
}

impl ClickTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_data_id(mut self, data_id: &str) -> Self {
        self.data_id = Some(data_id.to_string());
        self
    }

    pub fn within(mut self, parent: ClickTarget) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }
}

/// Which page the click happened on. The watchlist button adds on one and
/// removes on the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Search,
    Watchlist,
}

pub const SHOW_MORE_BUTTON_ID: &str = "show-more-movies-btn";
pub const SCROLL_TO_TOP_BUTTON_ID: &str = "scroll-to-top-btn";

/// Everything a click can do on either page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    ReadMore(String),
    ShowLess(String),
    AddToWatchlist(String),
    RemoveFromWatchlist(String),
    ShowMore,
    ScrollTop,
}

impl Interaction {
    /// Resolve a click. Returns `None` for clicks that do nothing.
    pub fn resolve(target: &ClickTarget, page: PageKind) -> Option<Interaction> {
        let parent = target.parent.as_deref();

        if target.has_class("read-more") {
            return target.data_id.clone().map(Interaction::ReadMore);
        }
        if target.has_class("show-less") {
            return target.data_id.clone().map(Interaction::ShowLess);
        }

        // The watchlist button, or its icon or label.
        let button = if target.has_class("modify-watchlist") {
            Some(target)
        } else {
            parent.filter(|p| p.has_class("modify-watchlist"))
        };
        if let Some(button) = button {
            let id = button.data_id.clone()?;
            return Some(match page {
                PageKind::Search => Interaction::AddToWatchlist(id),
                PageKind::Watchlist => Interaction::RemoveFromWatchlist(id),
            });
        }

        if page == PageKind::Search && target.has_id(SHOW_MORE_BUTTON_ID) {
            return Some(Interaction::ShowMore);
        }

        if target.has_id(SCROLL_TO_TOP_BUTTON_ID)
            || parent.is_some_and(|p| p.has_id(SCROLL_TO_TOP_BUTTON_ID))
        {
            return Some(Interaction::ScrollTop);
        }

        None
    }
}
