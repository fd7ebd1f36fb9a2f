use std::sync::Arc;
use tracing::{debug, info};

use crate::config::RequestConfig;
use crate::errors::{AppError, AppResult};
use crate::models::DownloadedAsset;
use crate::utils::headers::HeaderProfile;
use crate::utils::http_client::HttpFetcher;
use crate::utils::jitter::DelayPolicy;
use crate::utils::retry::RetryPolicy;

/// Map a declared content type to a file extension
///
/// Best effort only: the payload itself is not inspected, so a server that
/// lies about the type produces a mislabeled file.
pub fn infer_format(content_type: Option<&str>) -> &'static str {
    let content_type = content_type.unwrap_or_default().to_ascii_lowercase();
    if content_type.contains("svg") {
        "svg"
    } else if content_type.contains("jpeg") || content_type.contains("jpg") {
        "jpg"
    } else {
        "png"
    }
}

/// Check that a payload is what its format claims
///
/// SVG payloads only need to contain markup; raster payloads must decode.
pub fn verify_payload(url: &str, asset: &DownloadedAsset) -> AppResult<()> {
    if asset.format == "svg" {
        let text = String::from_utf8_lossy(&asset.bytes);
        if text.contains("<svg") {
            return Ok(());
        }
        return Err(AppError::invalid_image(url, "payload has no <svg> element"));
    }

    image::load_from_memory(&asset.bytes)
        .map(|_| ())
        .map_err(|e| AppError::invalid_image(url, e.to_string()))
}

/// Downloads resolved logo URLs with bounded retries
pub struct LogoDownloader {
    fetcher: Arc<dyn HttpFetcher>,
    retry: RetryPolicy,
    verify_images: bool,
}

impl LogoDownloader {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, request: &RequestConfig, delays: DelayPolicy) -> Self {
        Self {
            fetcher,
            retry: RetryPolicy::new(request.max_retries, delays),
            verify_images: request.verify_images,
        }
    }

    /// Fetch `url` on behalf of `domain`, sending the image header profile
    pub async fn fetch(&self, domain: &str, url: &str) -> AppResult<DownloadedAsset> {
        let profile = HeaderProfile::image_for(domain);
        let operation = format!("download {url}");

        let asset = self
            .retry
            .run(&operation, |attempt| {
                let profile = &profile;
                async move {
                    debug!("Downloading {} (attempt {})", url, attempt);
                    let body = self.fetcher.fetch_bytes(url, profile).await?;
                    let asset = DownloadedAsset {
                        format: infer_format(body.content_type.as_deref()).to_string(),
                        bytes: body.bytes,
                    };
                    if self.verify_images {
                        verify_payload(url, &asset)?;
                    }
                    Ok(asset)
                }
            })
            .await?;

        info!(
            "Downloaded {} bytes for {} as {}",
            asset.bytes.len(),
            domain,
            asset.format
        );
        Ok(asset)
    }
}
