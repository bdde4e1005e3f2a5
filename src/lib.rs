//! Seedwave: a batched seed-URL crawl dispatcher
//!
//! This crate validates, normalizes, and deduplicates a user-supplied batch of
//! seed URLs, then dispatches each admitted URL to a crawl engine under a
//! bounded concurrency budget, measuring per-URL fetch latency along the way.

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Seedwave operations
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Engine error: {0}")]
    Engine(#[from] engine::EngineError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Report channel closed before batch completed")]
    ReportChannelClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Errors produced by the timing fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Got HTTP status code {code} for {url}")]
    Status { url: String, code: u16 },
}

/// Result type alias for Seedwave operations
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use dispatch::{run_batch, BatchSummary, Dispatcher};
pub use engine::CrawlEngine;
pub use output::{ReportLine, ReportSink};
pub use url::{canonical_key, validate_url, CanonicalKey, Scheme, ValidationIssue};
