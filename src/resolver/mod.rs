//! Logo URL resolution
//!
//! A domain is resolved by trying, in order, the icon service, the site's
//! web app manifest and the metadata in its home page. The first strategy
//! that yields a usable absolute URL wins. The whole chain is retried as a
//! unit; once attempts are exhausted the domain is reported as not found.

pub mod html;
pub mod icon_service;
pub mod manifest;

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::RequestConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{LogoSource, ResolvedLogoUrl};
use crate::utils::headers::HeaderProfile;
use crate::utils::http_client::HttpFetcher;
use crate::utils::jitter::DelayPolicy;
use crate::utils::retry::RetryPolicy;
use crate::utils::url::UrlUtils;

pub use html::PageLinks;

pub struct LogoResolver {
    fetcher: Arc<dyn HttpFetcher>,
    retry: RetryPolicy,
    icon_service_base: String,
}

impl LogoResolver {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, request: &RequestConfig, delays: DelayPolicy) -> Self {
        Self {
            fetcher,
            retry: RetryPolicy::new(request.max_retries, delays),
            icon_service_base: request.icon_service_base.clone(),
        }
    }

    /// Resolve the best logo URL for `domain`
    ///
    /// Any failure surviving every attempt is reported as
    /// [`AppError::NotFound`].
    pub async fn resolve(&self, domain: &str) -> AppResult<ResolvedLogoUrl> {
        let operation = format!("resolve {domain}");
        self.retry
            .run(&operation, |_| self.resolve_once(domain))
            .await
            .map_err(|err| match err {
                AppError::NotFound { .. } => err,
                other => {
                    debug!("Resolution for {} ended with: {}", domain, other);
                    AppError::not_found(domain)
                }
            })
    }

    async fn resolve_once(&self, domain: &str) -> AppResult<ResolvedLogoUrl> {
        let fetcher = self.fetcher.as_ref();

        match icon_service::lookup(fetcher, &self.icon_service_base, domain).await {
            Ok(url) => {
                info!("Found logo for {} via {}", domain, LogoSource::IconService);
                return Ok(ResolvedLogoUrl::new(url, LogoSource::IconService));
            }
            Err(e) => debug!("Icon service miss for {}: {}", domain, e),
        }

        let page = fetcher
            .fetch_text(&UrlUtils::home_page(domain), &HeaderProfile::Webpage)
            .await?;
        let links = PageLinks::extract(&page);

        if let Some(href) = links.manifest_href.as_deref() {
            match manifest::lookup(fetcher, href, domain).await {
                Ok(url) => {
                    info!("Found logo for {} via {}", domain, LogoSource::Manifest);
                    return Ok(ResolvedLogoUrl::new(url, LogoSource::Manifest));
                }
                Err(e) => debug!("Manifest lookup failed for {}: {}", domain, e),
            }
        }

        for candidate in &links.logo_candidates {
            match UrlUtils::normalize_checked(candidate, domain) {
                Some(url) => {
                    info!("Found logo for {} via {}", domain, LogoSource::HtmlMetadata);
                    return Ok(ResolvedLogoUrl::new(url, LogoSource::HtmlMetadata));
                }
                None => debug!("Skipping malformed candidate {:?} for {}", candidate, domain),
            }
        }

        Err(AppError::not_found(domain))
    }
}
