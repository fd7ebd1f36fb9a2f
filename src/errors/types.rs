//! Error type definitions for the logo fetcher
//!
//! This module defines all error types used throughout the crate. Per-domain
//! errors are converted into a failed outcome by the pipeline; only
//! configuration and index-load errors are meant to stop a run.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// No resolution strategy produced a candidate logo URL
    #[error("No logo found for {domain}")]
    NotFound { domain: String },

    /// Transport failure, timeout or non-2xx response
    #[error("Network error: {url} - {message}")]
    Network { url: String, message: String },

    /// The persisted cache index exists but cannot be parsed
    #[error("Corrupt cache index at {}: {source}", path.display())]
    CorruptIndex {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A candidate URL could not be turned into a usable absolute URL
    #[error("Malformed URL: {url}")]
    MalformedUrl { url: String },

    /// Downloaded payload failed decode verification
    #[error("Invalid image from {url}: {message}")]
    InvalidImage { url: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors outside the cache index
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience methods for creating common error types
impl AppError {
    pub fn not_found<S: Into<String>>(domain: S) -> Self {
        Self::NotFound {
            domain: domain.into(),
        }
    }

    pub fn network<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn malformed_url<S: Into<String>>(url: S) -> Self {
        Self::MalformedUrl { url: url.into() }
    }

    pub fn invalid_image<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::InvalidImage {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether another attempt could plausibly succeed
    ///
    /// Network failures are transient. A resolver miss is retried as well,
    /// since a page that failed to render its icon links may succeed on the
    /// next request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::NotFound { .. })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        Self::Network {
            url,
            message: err.to_string(),
        }
    }
}
