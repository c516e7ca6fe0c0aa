use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub appdir: Option<String>,
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(skip)]
    pub debug_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

/// Upstream movie database settings. The API key never leaves the server.
#[derive(Clone, Deserialize, Serialize)]
pub struct OmdbConfig {
    #[serde(default = "default_omdb_url")]
    pub baseurl: String,
    #[serde(default)]
    pub apikey: Option<String>,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            baseurl: default_omdb_url(),
            apikey: None,
        }
    }
}

// Keep the key out of debug logs.
impl std::fmt::Debug for OmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmdbConfig")
            .field("baseurl", &self.baseurl)
            .field("apikey", &self.apikey.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Where the page controllers reach the proxy endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    #[serde(default = "default_proxy_url")]
    pub url: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            url: default_proxy_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_port() -> String {
    "8888".to_string()
}

fn default_omdb_url() -> String {
    "https://www.omdbapi.com/".to_string()
}

fn default_proxy_url() -> String {
    "http://localhost:8888/.netlify/functions/script".to_string()
}

fn default_storage_path() -> String {
    "./watchlist.json".to_string()
}

const API_KEY_VARS: &[&str] = &["OMDB_API_KEY", "API_KEY"];

impl Config {
    /// Load the config file. A missing file at the default location is not an
    /// error, everything has a default.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Config::default());
            }
            Err(e) => return Err(ConfigError::ReadError(path.to_string(), e)),
        };

        Self::from_yaml(&content).map_err(|e| ConfigError::ParseError(path.to_string(), e))
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to unit, not to a struct.
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(content)
    }

    /// The upstream API key: config file first, then the environment.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        self.api_key_with(|name| std::env::var(name).ok())
    }

    fn api_key_with<F>(&self, lookup: F) -> Result<String, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = self.omdb.apikey.as_ref().filter(|k| !k.is_empty()) {
            return Ok(key.clone());
        }
        API_KEY_VARS
            .iter()
            .filter_map(|name| lookup(*name))
            .find(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("No upstream API key: set omdb.apikey or OMDB_API_KEY")]
    MissingApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.listen.port, "8888");
        assert_eq!(config.omdb.baseurl, "https://www.omdbapi.com/");
        assert_eq!(config.storage.path, "./watchlist.json");
        assert!(config.appdir.is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
listen:
  address: 127.0.0.1
  port: "9000"
appdir: ./dist
omdb:
  apikey: secret
proxy:
  url: http://example.com/api/movies
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.listen.address.as_deref(), Some("127.0.0.1"));
        assert_eq!(config.listen.port, "9000");
        assert_eq!(config.appdir.as_deref(), Some("./dist"));
        assert_eq!(config.proxy.url, "http://example.com/api/movies");
        assert_eq!(config.api_key_with(|_| None).unwrap(), "secret");
    }

    #[test]
    fn test_api_key_falls_back_to_env() {
        let config = Config::default();
        let key = config
            .api_key_with(|name| (name == "API_KEY").then(|| "from-env".to_string()))
            .unwrap();
        assert_eq!(key, "from-env");

        assert!(matches!(
            config.api_key_with(|_| None),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let mut config = Config::default();
        config.omdb.apikey = Some("secret".to_string());
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::from_file("/nonexistent/movie-watchlist.yaml").unwrap();
        assert_eq!(config.listen.port, "8888");
    }
}
