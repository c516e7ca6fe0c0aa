use crate::pages::dom::{ButtonAction, DescriptionState, MovieCard, MoviesSection};

/// Plots longer than this many characters are cut, with a "Read more" toggle.
pub const DESCRIPTION_LIMIT: usize = 132;

/// The first [`DESCRIPTION_LIMIT`] characters of `text`, or `None` if it
/// is short enough to show whole.
pub fn truncate_description(text: &str) -> Option<&str> {
    let (cut, _) = text.char_indices().nth(DESCRIPTION_LIMIT)?;
    Some(&text[..cut])
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap trusted inner markup in the message box.
pub fn message_html(inner: &str) -> String {
    format!(
        r#"<div class="container no-movies-container">
    {}
</div>"#,
        inner
    )
}

pub fn show_more_button_html() -> &'static str {
    r#"<button class="show-more-btn" id="show-more-movies-btn">Show more results</button>"#
}

fn description_html(id: &str, text: &str, state: DescriptionState) -> String {
    let id = escape(id);
    let text = escape(text);
    match state {
        DescriptionState::Plain => text,
        DescriptionState::Collapsed => format!(
            r#"{}... <button class="modify-txt-btn read-more" data-id="{}">Read more</button>"#,
            text, id
        ),
        DescriptionState::Expanded => format!(
            r#"{} <button class="modify-txt-btn show-less" data-id="{}">Show less</button>"#,
            text, id
        ),
    }
}

fn watchlist_button_html(id: &str, action: ButtonAction, disabled: bool) -> String {
    let icon = match action {
        ButtonAction::Add => "fa-circle-plus",
        ButtonAction::Remove => "fa-circle-minus",
    };
    format!(
        r#"<button class="modify-watchlist" data-id="{}"{}>
        <i class="fa-solid {}"></i>
        <p>Watchlist</p>
    </button>"#,
        escape(id),
        if disabled { " disabled" } else { "" },
        icon
    )
}

pub fn movie_html(card: &MovieCard) -> String {
    let img = match &card.img {
        Some(src) => format!(r#"<img class="movie-img" src="{}">"#, escape(src)),
        None => r#"<div class="movie-img"></div>"#.to_string(),
    };

    format!(
        r#"<article class="movie-article" data-id="{id}">
    {img}
    <div class="movie-title-container">
        <h2 class="movie-title">{title}</h2>
        <div class="movie-rating">
            <i class="fa-solid fa-star"></i>
            <p>{rating}</p>
        </div>
    </div>
    <p class="movie-runtime">{runtime}</p>
    <p class="movie-category">{category}</p>
    {button}
    <p class="movie-description">
        {description}
    </p>
</article>

<hr>
"#,
        id = escape(&card.id),
        img = img,
        title = escape(&card.title),
        rating = escape(&card.rating),
        runtime = escape(&card.runtime),
        category = escape(&card.category),
        button = watchlist_button_html(&card.id, card.button.action, card.button.disabled),
        description = description_html(&card.id, &card.description.text, card.description.state),
    )
}

/// Markup for the whole movies section.
pub fn section_html(section: &MoviesSection) -> String {
    match section {
        MoviesSection::Empty => String::new(),
        MoviesSection::Message(inner) => message_html(inner),
        MoviesSection::Movies { cards, show_more } => {
            let mut html = String::from(r#"<div class="container movies-container">"#);
            html.push('\n');
            for card in cards {
                html.push_str(&movie_html(card));
            }
            if *show_more {
                html.push_str(show_more_button_html());
                html.push('\n');
            }
            html.push_str("</div>");
            html
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::dom::{Description, WatchlistButton};
    use crate::watchlist::WatchlistEntry;

    fn card(plot: &str) -> MovieCard {
        let entry = WatchlistEntry {
            id: "tt0372784".to_string(),
            img: "https://example.com/p.jpg".to_string(),
            title: "Batman Begins".to_string(),
            rating: "8.2".to_string(),
            runtime: "140 min".to_string(),
            category: "Action, Crime, Drama".to_string(),
            description: plot.to_string(),
        };
        MovieCard::from_entry(
            &entry,
            WatchlistButton {
                action: ButtonAction::Add,
                disabled: false,
            },
        )
    }

    #[test]
    fn test_truncate_description() {
        let exact = "x".repeat(DESCRIPTION_LIMIT);
        assert_eq!(truncate_description(&exact), None);

        let long = "y".repeat(DESCRIPTION_LIMIT + 1);
        assert_eq!(truncate_description(&long), Some(&long[..DESCRIPTION_LIMIT]));

        // Counts characters, not bytes.
        let accented = "é".repeat(DESCRIPTION_LIMIT + 5);
        let cut = truncate_description(&accented).unwrap();
        assert_eq!(cut.chars().count(), DESCRIPTION_LIMIT);
    }

    #[test]
    fn test_long_plot_has_read_more() {
        let plot = "z".repeat(200);
        let html = movie_html(&card(&plot));
        let expected = format!("{}... <button class=\"modify-txt-btn read-more\"", "z".repeat(132));
        assert!(html.contains(&expected));
        assert!(!html.contains(&"z".repeat(133)));
    }

    #[test]
    fn test_short_plot_has_no_toggle() {
        let html = movie_html(&card("A short plot."));
        assert!(html.contains("A short plot."));
        assert!(!html.contains("read-more"));
    }

    #[test]
    fn test_expanded_plot_has_show_less() {
        let plot = "w".repeat(140);
        let mut c = card(&plot);
        c.description.expand(&plot);
        let html = movie_html(&c);
        assert!(html.contains(&format!("{} <button class=\"modify-txt-btn show-less\"", plot)));
    }

    #[test]
    fn test_placeholder_and_disabled_button() {
        let mut c = card("p");
        c.img = None;
        c.button.disabled = true;
        let html = movie_html(&c);
        assert!(html.contains(r#"<div class="movie-img"></div>"#));
        assert!(html.contains(r#"data-id="tt0372784" disabled>"#));
        assert!(html.contains("fa-circle-plus"));
    }

    #[test]
    fn test_remove_button_icon() {
        let mut c = card("p");
        c.button.action = ButtonAction::Remove;
        assert!(movie_html(&c).contains("fa-circle-minus"));
    }

    #[test]
    fn test_escapes_text() {
        let mut c = card("<script>alert(1)</script>");
        c.title = "Tom & Jerry".to_string();
        c.description = Description::new("<script>alert(1)</script>");
        let html = movie_html(&c);
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_section_html() {
        assert_eq!(section_html(&MoviesSection::Empty), "");

        let msg = section_html(&MoviesSection::Message("<p>Nothing</p>".to_string()));
        assert!(msg.contains("no-movies-container"));
        assert!(msg.contains("<p>Nothing</p>"));

        let movies = MoviesSection::Movies {
            cards: vec![card("p")],
            show_more: true,
        };
        let html = section_html(&movies);
        assert!(html.starts_with(r#"<div class="container movies-container">"#));
        assert!(html.contains("show-more-movies-btn"));
    }
}
