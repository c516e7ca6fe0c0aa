use serde::{Deserialize, Serialize};

/// Error text the upstream returns when a title search has no hits.
pub const MOVIE_NOT_FOUND: &str = "Movie not found!";

/// Placeholder the upstream uses for missing fields, posters included.
pub const NOT_AVAILABLE: &str = "N/A";

/// Results per upstream search page.
pub const PAGE_SIZE: u32 = 10;

/// One hit of a title search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Type", default)]
    pub movie_type: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

/// Body of a search-by-title response. The upstream signals failure in-band
/// with `Response: "False"` and an `Error` string.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchResponse {
    #[serde(rename = "Search", default)]
    pub search: Vec<MovieSummary>,
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            response: Some("False".to_string()),
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Number of upstream pages for this search, at least 1.
    pub fn max_pages(&self) -> u32 {
        let total = self
            .total_results
            .as_deref()
            .and_then(|t| t.trim().parse::<u32>().ok())
            .unwrap_or(0);
        total.div_ceil(PAGE_SIZE).max(1)
    }
}

/// Body of a lookup-by-id response.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MovieDetails {
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String,
    #[serde(rename = "Runtime", default)]
    pub runtime: String,
    #[serde(rename = "Genre", default)]
    pub genre: String,
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl MovieDetails {
    pub fn upstream_error(&self) -> Option<&str> {
        if self.response.as_deref() == Some("False") || self.imdb_id.is_empty() {
            return Some(self.error.as_deref().unwrap_or("Incorrect IMDb ID."));
        }
        None
    }
}
