/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Path defaults
pub const DEFAULT_CONFIG_FILE: &str = "logo-fetcher.toml";
pub const DEFAULT_WEBSITES_PATH: &str = "websites.json";
pub const DEFAULT_STORAGE_DIR: &str = "source";
pub const DEFAULT_INDEX_FILE: &str = "source.json";

// Request defaults
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_ICON_SERVICE_BASE: &str = "https://api.iconify.design/logos";
pub const DEFAULT_VERIFY_IMAGES: bool = false;

// Browser impersonation defaults
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8";
pub const DEFAULT_SEC_CH_UA: &str =
    "\"Google Chrome\";v=\"120\", \"Chromium\";v=\"120\", \"Not=A?Brand\";v=\"99\"";
pub const DEFAULT_SEC_CH_UA_MOBILE: &str = "?0";
pub const DEFAULT_SEC_CH_UA_PLATFORM: &str = "\"macOS\"";
pub const DEFAULT_SEARCH_REFERER: &str = "https://www.google.com/";

// Delay defaults (milliseconds, half-open ranges)
pub const DEFAULT_RETRY_DELAY_MS: (u64, u64) = (400, 1200);
pub const DEFAULT_CACHE_DELAY_MS: (u64, u64) = (100, 300);
pub const DEFAULT_DOWNLOAD_DELAY_MS: (u64, u64) = (200, 500);
pub const DEFAULT_ERROR_DELAY_MS: (u64, u64) = (800, 1500);
pub const DEFAULT_NEXT_DELAY_MS: (u64, u64) = (500, 1000);

// Housekeeping defaults
pub const DEFAULT_SMALL_IMAGE_THRESHOLD: u32 = 100;
