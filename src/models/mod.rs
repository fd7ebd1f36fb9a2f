use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Input file listing the domains to process
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebsiteList {
    pub websites: Vec<String>,
}

/// Index record for one successfully downloaded logo
///
/// Serialized as `{ "format": "svg", "lastUpdated": "2024-01-01T00:00:00Z" }`
/// keyed by domain in the index file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// File extension without the dot
    pub format: String,
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new<S: Into<String>>(format: S) -> Self {
        Self {
            format: format.into(),
            last_updated: Utc::now(),
        }
    }

    /// File name backing this entry for `domain`
    pub fn file_name(&self, domain: &str) -> String {
        format!("{}.{}", domain, self.format)
    }
}

/// Which resolution strategy produced a logo URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoSource {
    IconService,
    Manifest,
    HtmlMetadata,
}

impl fmt::Display for LogoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::IconService => "icon service",
            Self::Manifest => "web app manifest",
            Self::HtmlMetadata => "html metadata",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLogoUrl {
    pub url: String,
    pub source: LogoSource,
}

impl ResolvedLogoUrl {
    pub fn new<S: Into<String>>(url: S, source: LogoSource) -> Self {
        Self {
            url: url.into(),
            source,
        }
    }
}

/// Downloaded payload, consumed right away by storage and the index
#[derive(Debug, Clone)]
pub struct DownloadedAsset {
    pub bytes: Vec<u8>,
    /// Extension without the dot (`svg`, `jpg`, `png`)
    pub format: String,
}

/// Terminal state of one domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainOutcome {
    Cached,
    Succeeded,
    Failed,
}

/// Per-run counters, never persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub succeeded: usize,
    pub failed: usize,
    pub cached: usize,
    pub total: usize,
}

impl RunStats {
    pub fn record(&mut self, outcome: DomainOutcome) {
        match outcome {
            DomainOutcome::Cached => self.cached += 1,
            DomainOutcome::Succeeded => self.succeeded += 1,
            DomainOutcome::Failed => self.failed += 1,
        }
        self.total += 1;
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "succeeded={}, failed={}, cached={}, total={}",
            self.succeeded, self.failed, self.cached, self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_entry_wire_format() {
        let entry: CacheEntry =
            serde_json::from_str(r#"{"format":"svg","lastUpdated":"2024-03-01T12:00:00.000Z"}"#)
                .unwrap();
        assert_eq!(entry.format, "svg");
        assert_eq!(entry.file_name("github.com"), "github.com.svg");

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("lastUpdated").is_some());
        assert!(json.get("last_updated").is_none());
    }

    #[test]
    fn test_run_stats_record() {
        let mut stats = RunStats::default();
        stats.record(DomainOutcome::Cached);
        stats.record(DomainOutcome::Failed);
        stats.record(DomainOutcome::Succeeded);
        stats.record(DomainOutcome::Failed);
        assert_eq!(
            stats,
            RunStats {
                succeeded: 1,
                failed: 2,
                cached: 1,
                total: 4
            }
        );
        assert_eq!(
            stats.to_string(),
            "succeeded=1, failed=2, cached=1, total=4"
        );
    }

    #[test]
    fn test_website_list_parse() {
        let list: WebsiteList =
            serde_json::from_str(r#"{"websites":["github.com","docs.rs"]}"#).unwrap();
        assert_eq!(list.websites, vec!["github.com", "docs.rs"]);
    }
}
