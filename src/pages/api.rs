use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::omdb::{MovieDetails, SearchResponse};

/// A title search at one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub title_searched: String,
    pub page: u32,
}

impl SearchQuery {
    pub fn new(title: impl Into<String>, page: u32) -> Self {
        Self {
            title_searched: title.into(),
            page,
        }
    }
}

/// What the pages need from the proxy endpoint.
#[async_trait]
pub trait MovieApi: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, ApiError>;
    async fn lookup(&self, id: &str) -> Result<MovieDetails, ApiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Proxy returned status {0}")]
    Status(u16),
    #[error("Upstream error: {0}")]
    Upstream(String),
}

/// Talks to the proxy endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: Client,
    url: String,
}

impl ProxyClient {
    pub fn new(url: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("movie-watchlist/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    fn endpoint(&self, query: &str) -> String {
        format!("{}/?{}", self.url.trim_end_matches('/'), query)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        debug!(url = %url, "Calling proxy");
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl MovieApi for ProxyClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, ApiError> {
        let url = self.endpoint(&format!(
            "s={}&page={}",
            urlencoding::encode(&query.title_searched),
            query.page
        ));
        self.get(&url).await
    }

    #[instrument(skip(self))]
    async fn lookup(&self, id: &str) -> Result<MovieDetails, ApiError> {
        let url = self.endpoint(&format!("i={}", urlencoding::encode(id)));
        let details: MovieDetails = self.get(&url).await?;
        if let Some(error) = details.upstream_error() {
            return Err(ApiError::Upstream(error.to_string()));
        }
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_encodes_title() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.netlify/functions/script/"))
            .and(query_param("s", "the dark knight & co"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"Search":[{"Title":"T","Year":"2008","imdbID":"tt0468569","Type":"movie","Poster":"N/A"}],"totalResults":"1","Response":"True"}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = ProxyClient::new(format!("{}/.netlify/functions/script", server.uri())).unwrap();
        let resp = client
            .search(&SearchQuery::new("the dark knight & co", 2))
            .await
            .unwrap();
        assert_eq!(resp.search[0].imdb_id, "tt0468569");
    }

    #[tokio::test]
    async fn test_lookup_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(422).set_body_string("Error: nope"))
            .mount(&server)
            .await;

        let client = ProxyClient::new(server.uri()).unwrap();
        let err = client.lookup("tt1").await.unwrap_err();
        assert!(matches!(err, ApiError::Status(422)));
    }

    #[tokio::test]
    async fn test_lookup_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("i", "bogus"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#),
            )
            .mount(&server)
            .await;

        let client = ProxyClient::new(server.uri()).unwrap();
        let err = client.lookup("bogus").await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(msg) if msg == "Incorrect IMDb ID."));
    }
}
