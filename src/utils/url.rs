//! URL utilities for consistent URL handling
//!
//! Candidate logo URLs scraped from pages and manifests come in every shape:
//! protocol-relative, root-relative, bare relative paths and absolute URLs.
//! These helpers turn them into absolute HTTPS URLs anchored at the domain.

use url::Url;

/// URL utilities for consistent URL handling
pub struct UrlUtils;

impl UrlUtils {
    /// Resolve a scraped URL against the domain it was found on
    ///
    /// - `//host/path` gets an `https:` prefix
    /// - `/path` becomes `https://<domain>/path`
    /// - `path` becomes `https://<domain>/path`
    /// - anything already starting with `http` passes through unchanged
    ///
    /// The input is never rejected here; an unusable result is caught later
    /// by [`UrlUtils::is_valid`] or by the fetch itself.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use logo_fetcher::utils::url::UrlUtils;
    ///
    /// assert_eq!(UrlUtils::normalize("//cdn.example/a.png", "x.com"), "https://cdn.example/a.png");
    /// assert_eq!(UrlUtils::normalize("/a.png", "x.com"), "https://x.com/a.png");
    /// assert_eq!(UrlUtils::normalize("a.png", "x.com"), "https://x.com/a.png");
    /// assert_eq!(UrlUtils::normalize("https://y.com/a.png", "x.com"), "https://y.com/a.png");
    /// ```
    pub fn normalize(url: &str, domain: &str) -> String {
        let trimmed = url.trim();

        if trimmed.starts_with("//") {
            format!("https:{trimmed}")
        } else if trimmed.starts_with('/') {
            format!("https://{domain}{trimmed}")
        } else if !trimmed.starts_with("http") {
            format!("https://{domain}/{trimmed}")
        } else {
            trimmed.to_string()
        }
    }

    /// Normalize and require the result to parse as an absolute http(s) URL
    ///
    /// Returns `None` for empty input or when the normalized string is not a
    /// usable URL.
    pub fn normalize_checked(url: &str, domain: &str) -> Option<String> {
        if url.trim().is_empty() {
            return None;
        }
        let normalized = Self::normalize(url, domain);
        Self::is_valid(&normalized).then_some(normalized)
    }

    /// Home page URL for a bare domain
    pub fn home_page(domain: &str) -> String {
        format!("https://{domain}")
    }

    /// Portion of the domain before the first dot (`github.com` -> `github`)
    pub fn leading_label(domain: &str) -> &str {
        domain.split('.').next().unwrap_or(domain)
    }

    /// Check if a URL is an absolute http(s) URL with a host
    pub fn is_valid(url: &str) -> bool {
        Url::parse(url)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
            .unwrap_or(false)
    }
}
