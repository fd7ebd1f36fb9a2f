//! Centralized error handling for the logo fetcher
//!
//! # Error Categories
//!
//! - **NotFound**: every resolution strategy came up empty for a domain
//! - **Network**: transport, timeout and non-2xx failures (retryable)
//! - **CorruptIndex**: the cache index file exists but does not parse
//! - **MalformedUrl**: a candidate could not be normalized into an absolute URL
//!
//! # Usage
//!
//! ```rust
//! use logo_fetcher::errors::{AppError, AppResult};
//!
//! fn lookup(domain: &str) -> AppResult<String> {
//!     Err(AppError::not_found(domain))
//! }
//! assert!(lookup("example.com").is_err());
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;
