pub mod html;
pub mod scroll;

pub use html::{
    escape, message_html, movie_html, section_html, show_more_button_html, truncate_description,
    DESCRIPTION_LIMIT,
};
pub use scroll::{ScrollButtonState, ScrollToTop};
