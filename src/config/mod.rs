use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use crate::models::WebsiteList;
use crate::utils::jitter::DelayRange;
use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub headers: HeadersConfig,
    #[serde(default)]
    pub delays: DelayConfig,
    #[serde(default)]
    pub housekeeping: HousekeepingConfig,
}

/// Locations of the domain list, the logo files and the cache index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_websites_path")]
    pub websites: PathBuf,
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
    #[serde(default = "default_index_file")]
    pub index_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Attempts per resolve and per download, including the first one
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Applied to every outbound request, page and manifest fetches included
    #[serde(default = "default_request_timeout", with = "duration_serde::duration")]
    pub timeout: Duration,
    /// Base URL of the third-party icon service; `<label>.svg` is appended
    #[serde(default = "default_icon_service_base")]
    pub icon_service_base: String,
    /// Decode downloaded payloads before caching them
    #[serde(default = "default_verify_images")]
    pub verify_images: bool,
}

/// Browser identity shared by both header profiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadersConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    #[serde(default = "default_sec_ch_ua")]
    pub sec_ch_ua: String,
    #[serde(default = "default_sec_ch_ua_mobile")]
    pub sec_ch_ua_mobile: String,
    #[serde(default = "default_sec_ch_ua_platform")]
    pub sec_ch_ua_platform: String,
    #[serde(default = "default_search_referer")]
    pub search_referer: String,
}

/// Pacing between network operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    /// Backoff before each retry attempt
    pub retry: DelayRange,
    /// After a cache hit
    pub cache: DelayRange,
    /// Between resolving and downloading
    pub download: DelayRange,
    /// After an unexpected per-domain error
    pub error: DelayRange,
    /// Between domains after a download attempt
    pub next: DelayRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HousekeepingConfig {
    /// Raster logos narrower or shorter than this are reported as small
    #[serde(default = "default_small_image_threshold")]
    pub small_image_threshold: u32,
}

fn default_websites_path() -> PathBuf {
    PathBuf::from(DEFAULT_WEBSITES_PATH)
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STORAGE_DIR)
}

fn default_index_file() -> PathBuf {
    PathBuf::from(DEFAULT_INDEX_FILE)
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
}

fn default_icon_service_base() -> String {
    DEFAULT_ICON_SERVICE_BASE.to_string()
}

fn default_verify_images() -> bool {
    DEFAULT_VERIFY_IMAGES
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_accept_language() -> String {
    DEFAULT_ACCEPT_LANGUAGE.to_string()
}

fn default_sec_ch_ua() -> String {
    DEFAULT_SEC_CH_UA.to_string()
}

fn default_sec_ch_ua_mobile() -> String {
    DEFAULT_SEC_CH_UA_MOBILE.to_string()
}

fn default_sec_ch_ua_platform() -> String {
    DEFAULT_SEC_CH_UA_PLATFORM.to_string()
}

fn default_search_referer() -> String {
    DEFAULT_SEARCH_REFERER.to_string()
}

fn default_small_image_threshold() -> u32 {
    DEFAULT_SMALL_IMAGE_THRESHOLD
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            websites: default_websites_path(),
            storage_dir: default_storage_dir(),
            index_file: default_index_file(),
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            timeout: default_request_timeout(),
            icon_service_base: default_icon_service_base(),
            verify_images: default_verify_images(),
        }
    }
}

impl Default for HeadersConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            sec_ch_ua: default_sec_ch_ua(),
            sec_ch_ua_mobile: default_sec_ch_ua_mobile(),
            sec_ch_ua_platform: default_sec_ch_ua_platform(),
            search_referer: default_search_referer(),
        }
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            retry: DelayRange::from(DEFAULT_RETRY_DELAY_MS),
            cache: DelayRange::from(DEFAULT_CACHE_DELAY_MS),
            download: DelayRange::from(DEFAULT_DOWNLOAD_DELAY_MS),
            error: DelayRange::from(DEFAULT_ERROR_DELAY_MS),
            next: DelayRange::from(DEFAULT_NEXT_DELAY_MS),
        }
    }
}

impl DelayConfig {
    /// All ranges zeroed, so nothing sleeps
    pub fn none() -> Self {
        Self {
            retry: DelayRange::ZERO,
            cache: DelayRange::ZERO,
            download: DelayRange::ZERO,
            error: DelayRange::ZERO,
            next: DelayRange::ZERO,
        }
    }

    fn named(&self) -> [(&'static str, DelayRange); 5] {
        [
            ("retry", self.retry),
            ("cache", self.cache),
            ("download", self.download),
            ("error", self.error),
            ("next", self.next),
        ]
    }
}

impl Default for HousekeepingConfig {
    fn default() -> Self {
        Self {
            small_image_threshold: default_small_image_threshold(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist. A file that exists but does not parse is an error.
    pub fn load_from_file(config_file: &Path) -> Result<Self> {
        let config = if config_file.exists() {
            let contents = std::fs::read_to_string(config_file)
                .with_context(|| format!("Failed to read {}", config_file.display()))?;
            let config: Self = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", config_file.display()))?;
            info!("Configuration loaded from: {}", config_file.display());
            config
        } else {
            info!(
                "No configuration file at {}, using defaults",
                config_file.display()
            );
            Self::default()
        };

        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.request.max_retries == 0 {
            return Err("request.max_retries must be at least 1".to_string());
        }
        if self.request.timeout.is_zero() {
            return Err("request.timeout must be greater than zero".to_string());
        }
        for (name, range) in self.delays.named() {
            if range.min_ms > range.max_ms {
                return Err(format!(
                    "delays.{name}: min_ms ({}) is greater than max_ms ({})",
                    range.min_ms, range.max_ms
                ));
            }
        }
        Ok(())
    }
}

/// Read the list of domains to process
///
/// Unlike the configuration file, the list is required: a missing or
/// malformed file stops the run.
pub fn load_websites(path: &Path) -> Result<WebsiteList> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read website list {}", path.display()))?;
    let list: WebsiteList = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse website list {}", path.display()))?;
    info!("Loaded {} websites from {}", list.websites.len(), path.display());
    Ok(list)
}
