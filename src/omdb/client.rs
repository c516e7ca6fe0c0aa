use axum::body::Bytes;
use reqwest::Client;
use serde::de::IgnoredAny;
use tracing::{debug, instrument};

/// Server-side client for the upstream movie database. Holds the API key,
/// which is added to every request and never echoed back.
#[derive(Clone)]
pub struct OmdbClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for OmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmdbClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, OmdbError> {
        let http = Client::builder()
            .user_agent(concat!("movie-watchlist/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, base_url, api_key))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Title search, restricted to movies.
    #[instrument(skip(self))]
    pub async fn search(&self, title: &str, page: u32) -> Result<Bytes, OmdbError> {
        let page = page.to_string();
        self.get(&[("s", title), ("type", "movie"), ("page", page.as_str())])
            .await
    }

    /// Full details for one title.
    #[instrument(skip(self))]
    pub async fn lookup(&self, imdb_id: &str) -> Result<Bytes, OmdbError> {
        self.get(&[("i", imdb_id)]).await
    }

    /// Raw upstream body, checked to be JSON but otherwise untouched.
    async fn get(&self, params: &[(&str, &str)]) -> Result<Bytes, OmdbError> {
        debug!("Querying upstream movie database");
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        // The upstream reports its own errors in the JSON body, whatever the
        // status code, so the body is relayed as long as it parses.
        let status = response.status();
        let body = response.bytes().await?;
        serde_json::from_slice::<IgnoredAny>(&body)
            .map_err(|e| OmdbError::Decode(status.as_u16(), e))?;
        Ok(body)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OmdbError {
    #[error("Upstream request failed: {0}")]
    Request(reqwest::Error),
    #[error("Upstream returned an invalid body (status {0}): {1}")]
    Decode(u16, serde_json::Error),
}

// The request URL carries the API key, so it never goes into the error.
impl From<reqwest::Error> for OmdbError {
    fn from(e: reqwest::Error) -> Self {
        OmdbError::Request(e.without_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use wiremock::matchers::{method, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_sends_key_and_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("apikey", "secret"))
            .and(query_param("s", "batman begins"))
            .and(query_param("type", "movie"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"Search":[],"totalResults":"0","Response":"True"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = OmdbClient::new(server.uri(), "secret").unwrap();
        let body = client.search("batman begins", 2).await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["Response"], "True");
    }

    #[tokio::test]
    async fn test_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("i", "tt0372784"))
            .and(query_param_is_missing("type"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"imdbID":"tt0372784","Plot":"p"}"#),
            )
            .mount(&server)
            .await;

        let client = OmdbClient::new(server.uri(), "secret").unwrap();
        let body = client.lookup("tt0372784").await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["imdbID"], "tt0372784");
    }

    #[tokio::test]
    async fn test_error_body_is_relayed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"Response":"False","Error":"Invalid API key!"}"#),
            )
            .mount(&server)
            .await;

        let client = OmdbClient::new(server.uri(), "wrong").unwrap();
        let body = client.lookup("tt1").await.unwrap();
        assert_eq!(&body[..], br#"{"Response":"False","Error":"Invalid API key!"}"#);
    }

    #[tokio::test]
    async fn test_non_json_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let client = OmdbClient::new(server.uri(), "secret").unwrap();
        let err = client.lookup("tt1").await.unwrap_err();
        assert!(matches!(err, OmdbError::Decode(502, _)));
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        // Nothing listens on the discard port.
        let client = OmdbClient::new("http://127.0.0.1:9/", "secret").unwrap();
        let err = client.lookup("tt1").await.unwrap_err();
        assert!(matches!(err, OmdbError::Request(_)));
    }
}
