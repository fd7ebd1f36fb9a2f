use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{HeadersConfig, RequestConfig};
use crate::errors::{AppError, AppResult};
use crate::utils::headers::{BrowserHeaders, HeaderProfile};

/// Raw response body plus the server-declared content type
#[derive(Debug, Clone, Default)]
pub struct FetchedBody {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Outbound HTTP seam used by the resolver and the downloader
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// GET a URL and return the body as text
    async fn fetch_text(&self, url: &str, profile: &HeaderProfile) -> AppResult<String>;

    /// GET a URL and return the raw body with its content type
    async fn fetch_bytes(&self, url: &str, profile: &HeaderProfile) -> AppResult<FetchedBody>;
}

/// reqwest-backed fetcher that impersonates a desktop browser
pub struct BrowserHttpClient {
    client: Client,
    headers: BrowserHeaders,
}

impl BrowserHttpClient {
    /// Every request, page and manifest fetches included, is bounded by
    /// `request.timeout`.
    pub fn new(request: &RequestConfig, headers: HeadersConfig) -> AppResult<Self> {
        Self::with_timeout(request.timeout, headers)
    }

    pub fn with_timeout(timeout: Duration, headers: HeadersConfig) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            headers: BrowserHeaders::new(headers),
        })
    }

    fn header_map(&self, profile: &HeaderProfile) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in self.headers.for_profile(profile) {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    map.insert(name, value);
                }
                _ => warn!("Skipping invalid header {}: {:?}", name, value),
            }
        }
        map
    }

    async fn send(&self, url: &str, profile: &HeaderProfile) -> AppResult<Response> {
        let response = self
            .client
            .get(url)
            .headers(self.header_map(profile))
            .send()
            .await
            .map_err(|e| AppError::network(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::network(
                url,
                format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }
        Ok(response)
    }
}

#[async_trait]
impl HttpFetcher for BrowserHttpClient {
    async fn fetch_text(&self, url: &str, profile: &HeaderProfile) -> AppResult<String> {
        debug!("Fetching text content from: {}", url);
        let response = self.send(url, profile).await?;
        let content = response
            .text()
            .await
            .map_err(|e| AppError::network(url, format!("Failed to read response: {e}")))?;
        debug!("Fetched {} characters from {}", content.len(), url);
        Ok(content)
    }

    async fn fetch_bytes(&self, url: &str, profile: &HeaderProfile) -> AppResult<FetchedBody> {
        debug!("Fetching binary content from: {}", url);
        let response = self.send(url, profile).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::network(url, format!("Failed to read response body: {e}")))?;
        debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(FetchedBody {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_map_contains_profile_headers() {
        let client = BrowserHttpClient::with_timeout(Duration::from_secs(1), HeadersConfig::default())
            .unwrap();
        let map = client.header_map(&HeaderProfile::image_for("github.com"));
        assert_eq!(map.get("referer").unwrap(), "https://github.com");
        assert_eq!(map.get("sec-fetch-dest").unwrap(), "image");
        assert!(map.get("user-agent").is_some());
    }

    #[test]
    fn test_invalid_header_value_is_skipped() {
        let headers = HeadersConfig {
            user_agent: "bad\nagent".to_string(),
            ..HeadersConfig::default()
        };
        let client = BrowserHttpClient::with_timeout(Duration::from_secs(1), headers).unwrap();
        let map = client.header_map(&HeaderProfile::Webpage);
        assert!(map.get("user-agent").is_none());
        assert!(map.get("accept").is_some());
    }
}
