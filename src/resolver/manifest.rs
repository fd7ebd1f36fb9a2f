//! Web app manifest lookup
//!
//! A manifest lists icons with optional `sizes` and `type`. A vector icon
//! always wins; otherwise the widest declared icon is picked.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::utils::headers::HeaderProfile;
use crate::utils::http_client::HttpFetcher;
use crate::utils::url::UrlUtils;

/// The subset of a web app manifest used for logo selection
///
/// Fields of the wrong JSON type are treated as absent: a non-array `icons`
/// is no icons, a non-object entry is dropped, and a non-string `src`,
/// `sizes` or `type` is `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebManifest {
    #[serde(default, deserialize_with = "lenient_icons")]
    pub icons: Vec<ManifestIcon>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestIcon {
    #[serde(default, deserialize_with = "lenient_string")]
    pub src: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sizes: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub mime_type: Option<String>,
}

fn lenient_icons<'de, D>(deserializer: D) -> Result<Vec<ManifestIcon>, D::Error>
where
    D: Deserializer<'de>,
{
    let icons = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    };
    Ok(icons)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

impl ManifestIcon {
    fn src(&self) -> Option<&str> {
        self.src.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn is_vector(&self) -> bool {
        self.src()
            .map(|s| s.to_ascii_lowercase().ends_with(".svg"))
            .unwrap_or(false)
    }

    /// Declared width, 0 when `sizes` is absent or unparseable
    ///
    /// `sizes` may hold several space-separated `WxH` tokens; the widest counts.
    pub fn width(&self) -> u32 {
        self.sizes
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .filter_map(|token| {
                let (w, _) = token.split_once(['x', 'X'])?;
                w.parse::<u32>().ok()
            })
            .max()
            .unwrap_or(0)
    }
}

/// Pick the preferred icon: first vector icon, else the widest (earliest on ties)
pub fn choose_icon(icons: &[ManifestIcon]) -> Option<&ManifestIcon> {
    let candidates = || icons.iter().filter(|icon| icon.src().is_some());

    if let Some(vector) = candidates().find(|icon| icon.is_vector()) {
        return Some(vector);
    }

    candidates().fold(None, |best: Option<&ManifestIcon>, icon| match best {
        Some(current) if current.width() >= icon.width() => Some(current),
        _ => Some(icon),
    })
}

/// Parse manifest JSON and resolve the chosen icon against the domain
pub fn select_logo_url(manifest_json: &str, domain: &str) -> AppResult<String> {
    let manifest: WebManifest = serde_json::from_str(manifest_json)?;
    let icon = choose_icon(&manifest.icons).ok_or_else(|| AppError::not_found(domain))?;
    let src = icon.src().unwrap_or_default();
    UrlUtils::normalize_checked(src, domain).ok_or_else(|| AppError::malformed_url(src))
}

/// Fetch the manifest referenced by `manifest_href` and pick a logo from it
pub async fn lookup(fetcher: &dyn HttpFetcher, manifest_href: &str, domain: &str) -> AppResult<String> {
    let manifest_url = UrlUtils::normalize_checked(manifest_href, domain)
        .ok_or_else(|| AppError::malformed_url(manifest_href))?;
    debug!("Fetching manifest for {}: {}", domain, manifest_url);

    let body = fetcher
        .fetch_text(&manifest_url, &HeaderProfile::Webpage)
        .await?;
    select_logo_url(&body, domain)
}
