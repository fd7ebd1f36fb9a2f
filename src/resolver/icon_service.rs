//! Third-party icon service lookup
//!
//! The service hosts curated SVG logos keyed by brand name; the brand is
//! guessed from the domain's leading label.

use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::utils::headers::HeaderProfile;
use crate::utils::http_client::HttpFetcher;
use crate::utils::url::UrlUtils;

/// `<base>/<leading label>.svg`
pub fn icon_service_url(base: &str, domain: &str) -> String {
    format!(
        "{}/{}.svg",
        base.trim_end_matches('/'),
        UrlUtils::leading_label(domain)
    )
}

/// Ask the icon service for an SVG logo; success requires SVG markup in the body
pub async fn lookup(fetcher: &dyn HttpFetcher, base: &str, domain: &str) -> AppResult<String> {
    let url = icon_service_url(base, domain);
    debug!("Trying icon service for {}: {}", domain, url);

    let body = fetcher.fetch_text(&url, &HeaderProfile::Webpage).await?;
    if body.contains("<svg") {
        Ok(url)
    } else {
        Err(AppError::not_found(domain))
    }
}
