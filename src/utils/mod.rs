//! Utility modules for the logo fetcher
//!
//! This module contains reusable utilities shared by the resolver, the
//! downloader and the pipeline.

pub mod headers;
pub mod http_client;
pub mod jitter;
pub mod retry;
pub mod url;

pub use headers::{BrowserHeaders, HeaderProfile};
pub use http_client::{BrowserHttpClient, FetchedBody, HttpFetcher};
pub use jitter::{DelayKind, DelayPolicy, DelayRange};
pub use retry::RetryPolicy;
