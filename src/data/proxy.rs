//! ScrapingAnt proxy client
//!
//! All outbound requests go through the ScrapingAnt general endpoint, which
//! renders the target page and returns its HTML. An account token is
//! required.

use crate::{BoxScoreError, Result};

const DEFAULT_ENDPOINT: &str = "https://api.scrapingant.com/v2/general";
const API_KEY_HEADER: &str = "x-api-key";

/// Blocking HTTP client keyed by a ScrapingAnt API token
pub struct ProxyClient {
    client: reqwest::blocking::Client,
    api_key: String,
    endpoint: String,
}

impl ProxyClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_timeout(api_key, 30)
    }

    pub fn with_timeout(api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        ProxyClient {
            client,
            api_key: api_key.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Override the proxy endpoint (for tests)
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    fn request(&self, url: &str) -> reqwest::blocking::RequestBuilder {
        self.client
            .get(&self.endpoint)
            .query(&[("url", url)])
            .header(API_KEY_HEADER, self.api_key.as_str())
    }

    /// Fetch a page through the proxy and return its HTML
    pub fn fetch(&self, url: &str) -> Result<String> {
        log::debug!("Fetching {} via proxy", url);

        let response = self.request(url).send()?;

        if !response.status().is_success() {
            return Err(BoxScoreError::Proxy {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_encoding() {
        let client = ProxyClient::new("test-key");
        let request = client
            .request("https://www.nba.com/stats/teams/boxscores?Season=2022-23")
            .build()
            .unwrap();

        let url = request.url().as_str();
        assert!(url.starts_with(DEFAULT_ENDPOINT));
        assert!(url.contains("url=https%3A%2F%2Fwww.nba.com%2Fstats%2Fteams%2Fboxscores"));
        assert_eq!(
            request.headers().get(API_KEY_HEADER).unwrap(),
            &"test-key"
        );
    }

    #[test]
    fn test_endpoint_override() {
        let client = ProxyClient::new("k").with_endpoint("http://localhost:9999/general");
        let request = client.request("https://example.com").build().unwrap();
        assert!(request.url().as_str().starts_with("http://localhost:9999/general"));
    }
}
