// web_app/api/config.rs - Backend connection settings

use std::env;
use std::time::Duration;

/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "PRODUCT_SEARCH_API_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Settings for `HttpGateway`
#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix, without trailing slash
    pub base_url: String,
    /// Request timeout (ignored on wasm32, where the browser owns it)
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("product-search-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Read the base URL from `PRODUCT_SEARCH_API_URL`, falling back to the default
    pub fn from_env() -> Self {
        match env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Join a path below the base URL; `path` starts with `/`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ApiConfig::new("http://example.test/api/");
        assert_eq!(config.base_url, "http://example.test/api");
        assert_eq!(
            config.endpoint("/search/history/"),
            "http://example.test/api/search/history/"
        );
    }

    #[test]
    fn test_default_points_at_local_backend() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
