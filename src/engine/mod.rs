//! Crawl engine seam
//!
//! The dispatcher hands each admitted, timed URL to a crawl engine for
//! content traversal. The engine runs its own internal concurrency and
//! reports back asynchronously: the dispatcher wraps each visit so that
//! success appends one "finished" report line and failure appends one
//! error line, each settling the batch countdown exactly once.

mod traversal;

use async_trait::async_trait;
use thiserror::Error;

pub use traversal::SiteTraversal;

/// Errors reported by a crawl engine's error callback
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("HTTP error for {url}: {message}")]
    Http { url: String, message: String },

    #[error("HTTP status {code} for {url}")]
    Status { url: String, code: u16 },

    #[error("Failed to parse {url}: {message}")]
    Parse { url: String, message: String },
}

/// A page-scraping/traversal engine
///
/// Given a validated URL, the engine performs the fetch-and-follow-links
/// work. Implementations manage their own internal concurrency; the
/// dispatcher's admission gate does not extend into the engine.
#[async_trait]
pub trait CrawlEngine: Send + Sync {
    /// Visits a URL and traverses its content
    ///
    /// Resolves once traversal for this URL is complete or has failed.
    async fn visit(&self, url: &str) -> Result<(), EngineError>;
}
