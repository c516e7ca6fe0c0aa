/// Visibility of the scroll-to-top button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollButtonState {
    #[default]
    Hidden,
    Visible,
    /// Fade-out animation running; hides when it ends at the top.
    FadingOut,
}

/// The scroll-to-top affordance, driven by the page's vertical offset.
#[derive(Debug, Clone, Default)]
pub struct ScrollToTop {
    state: ScrollButtonState,
    offset: f64,
}

impl ScrollToTop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScrollButtonState {
        self.state
    }

    pub fn is_shown(&self) -> bool {
        self.state != ScrollButtonState::Hidden
    }

    /// Handle a scroll event at `offset`.
    pub fn on_scroll(&mut self, offset: f64) {
        self.offset = offset;
        let scrolled = offset > 0.0;
        self.state = match (self.state, scrolled) {
            (ScrollButtonState::Hidden, true) => ScrollButtonState::Visible,
            (ScrollButtonState::FadingOut, true) => ScrollButtonState::Visible,
            (ScrollButtonState::Visible, false) => ScrollButtonState::FadingOut,
            (state, _) => state,
        };
    }

    /// The fade-out animation finished. Only hides if still at the top.
    pub fn on_animation_end(&mut self) {
        if self.state == ScrollButtonState::FadingOut && self.offset <= 0.0 {
            self.state = ScrollButtonState::Hidden;
        }
    }

    /// Classes on the button element for the current state.
    pub fn class(&self) -> &'static str {
        match self.state {
            ScrollButtonState::Hidden => "scroll-to-top-btn hidden",
            ScrollButtonState::Visible => "scroll-to-top-btn",
            ScrollButtonState::FadingOut => "scroll-to-top-btn animation-fade-out",
        }
    }
}
