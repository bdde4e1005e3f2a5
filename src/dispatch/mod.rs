//! Dispatch pipeline for seed-URL batches
//!
//! This module contains the core of the crate:
//! - The per-batch dedup registry and duplicate-group bookkeeping
//! - The batch completion countdown
//! - The gated timing fetch
//! - The dispatcher that orchestrates validation, normalization, dedup,
//!   admission, fetch timing, and the engine handoff

mod completion;
mod dispatcher;
mod fetcher;
mod registry;

pub use completion::BatchCompletion;
pub use dispatcher::Dispatcher;
pub use fetcher::{build_http_client, timed_fetch};
pub use registry::{DedupRegistry, DuplicateGroup};

pub use crate::output::BatchSummary;

use crate::config::Config;
use crate::engine::SiteTraversal;
use crate::output::ReportSink;

/// Dispatches one batch with the built-in traversal engine
///
/// Convenience wrapper for callers that do not need a custom engine.
///
/// # Arguments
///
/// * `config` - Dispatcher configuration
/// * `input` - Whitespace-separated candidate URLs, as typed by the user
/// * `sink` - Destination for the serialized report lines
pub async fn run_batch(
    config: Config,
    input: &str,
    sink: Box<dyn ReportSink>,
) -> crate::Result<BatchSummary> {
    let engine = SiteTraversal::new(&config)?;
    let dispatcher = Dispatcher::new(config, engine)?;
    dispatcher.run_batch(input, sink).await
}
