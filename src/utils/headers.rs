//! Browser-like request header profiles
//!
//! Two profiles share a common identity (user agent and client hints): one
//! for navigating to pages and manifests, one for fetching the image itself.

use crate::config::HeadersConfig;

/// Which set of headers a request carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderProfile {
    /// Top-level navigation, referred from a search engine
    Webpage,
    /// Image sub-resource, referred from the owning domain
    Image { domain: String },
}

impl HeaderProfile {
    pub fn image_for(domain: &str) -> Self {
        Self::Image {
            domain: domain.to_string(),
        }
    }
}

/// Builds concrete header lists for each profile
#[derive(Debug, Clone)]
pub struct BrowserHeaders {
    config: HeadersConfig,
}

impl BrowserHeaders {
    pub fn new(config: HeadersConfig) -> Self {
        Self { config }
    }

    fn common(&self) -> Vec<(&'static str, String)> {
        vec![
            ("User-Agent", self.config.user_agent.clone()),
            ("Accept-Language", self.config.accept_language.clone()),
            ("sec-ch-ua", self.config.sec_ch_ua.clone()),
            ("sec-ch-ua-mobile", self.config.sec_ch_ua_mobile.clone()),
            ("sec-ch-ua-platform", self.config.sec_ch_ua_platform.clone()),
            ("Connection", "keep-alive".to_string()),
        ]
    }

    /// Ordered header name/value pairs for a profile
    pub fn for_profile(&self, profile: &HeaderProfile) -> Vec<(&'static str, String)> {
        let mut headers = self.common();
        match profile {
            HeaderProfile::Webpage => headers.extend([
                (
                    "Accept",
                    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7".to_string(),
                ),
                ("Cache-Control", "max-age=0".to_string()),
                ("Upgrade-Insecure-Requests", "1".to_string()),
                ("Sec-Fetch-Dest", "document".to_string()),
                ("Sec-Fetch-Mode", "navigate".to_string()),
                ("Sec-Fetch-Site", "none".to_string()),
                ("Sec-Fetch-User", "?1".to_string()),
                ("Referer", self.config.search_referer.clone()),
            ]),
            HeaderProfile::Image { domain } => headers.extend([
                (
                    "Accept",
                    "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8".to_string(),
                ),
                ("Cache-Control", "no-cache".to_string()),
                ("Pragma", "no-cache".to_string()),
                ("Sec-Fetch-Dest", "image".to_string()),
                ("Sec-Fetch-Mode", "no-cors".to_string()),
                ("Sec-Fetch-Site", "same-origin".to_string()),
                ("Referer", format!("https://{domain}")),
            ]),
        }
        headers
    }
}
