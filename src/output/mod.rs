//! Report output for Seedwave
//!
//! Report lines from concurrent dispatch tasks are messages on an mpsc
//! channel. A single consumer task owns the sink and serializes all writes,
//! so no two tasks ever touch the display buffer at once.

use crate::url::{CanonicalKey, ValidationIssue};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One human-readable line of batch output
#[derive(Debug, Clone, PartialEq)]
pub enum ReportLine {
    /// Validation issues collected for one input URL (advisory)
    Issues {
        input: String,
        issues: Vec<ValidationIssue>,
    },

    /// The input could not be normalized into a canonical key
    Invalid { input: String },

    /// The input collided with an already-admitted canonical key
    Duplicate { input: String, key: CanonicalKey },

    /// Timing fetch succeeded
    Loaded { url: String, elapsed: Duration },

    /// Timing fetch failed; the URL was not handed to the engine
    FetchFailed { url: String, error: String },

    /// The engine finished traversing the URL
    Finished { url: String },

    /// The engine reported an error for the URL
    CrawlFailed { url: String, error: String },

    /// All original inputs that collided on one canonical key
    DuplicateGroup {
        key: CanonicalKey,
        inputs: Vec<String>,
    },

    /// End-of-batch summary
    Summary(BatchSummary),
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLine::Issues { input, issues } => {
                writeln!(f, "url: {}", input)?;
                for (i, issue) in issues.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", issue)?;
                }
                Ok(())
            }
            ReportLine::Invalid { input } => write!(f, "Invalid URL: {}", input),
            ReportLine::Duplicate { input, key } => {
                write!(f, "Skipping {} (already visiting {})", input, key)
            }
            ReportLine::Loaded { url, elapsed } => {
                write!(f, "Loaded {} in {:?}", url, elapsed)
            }
            ReportLine::FetchFailed { url, error } => {
                write!(f, "Failed to fetch {}: {}", url, error)
            }
            ReportLine::Finished { url } => write!(f, "Finished {}", url),
            ReportLine::CrawlFailed { url, error } => {
                write!(f, "Crawl failed for {}: {}", url, error)
            }
            ReportLine::DuplicateGroup { key, inputs } => {
                write!(f, "Duplicate or similar URLs for {}:", key)?;
                for input in inputs {
                    write!(f, "\n- {}", input)?;
                }
                Ok(())
            }
            ReportLine::Summary(summary) => write!(f, "{}", summary),
        }
    }
}

/// End-of-batch statistics, emitted after the completion barrier
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    /// When the batch started
    pub started_at: DateTime<Utc>,

    /// Number of input URLs in the batch
    pub inputs: usize,

    /// Inputs admitted for fetching
    pub admitted: usize,

    /// Inputs skipped as duplicates of an admitted key
    pub duplicates: usize,

    /// Inputs rejected as unparseable
    pub invalid: usize,

    /// Admitted URLs whose timing fetch failed
    pub fetch_failures: usize,

    /// Handed-off URLs whose traversal failed
    pub crawl_failures: usize,

    /// Handed-off URLs the engine finished successfully
    pub finished: usize,

    /// Wall time from dispatch start to completion barrier
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn new(started_at: DateTime<Utc>, inputs: usize) -> Self {
        BatchSummary {
            started_at,
            inputs,
            admitted: 0,
            duplicates: 0,
            invalid: 0,
            fetch_failures: 0,
            crawl_failures: 0,
            finished: 0,
            elapsed: Duration::ZERO,
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Batch done in {:?}: {} inputs, {} admitted, {} duplicates, \
             {} invalid, {} fetch failures, {} crawl failures, {} finished \
             (started {})",
            self.elapsed,
            self.inputs,
            self.admitted,
            self.duplicates,
            self.invalid,
            self.fetch_failures,
            self.crawl_failures,
            self.finished,
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        )
    }
}

/// Destination for serialized report lines
///
/// The sink is owned by the single consumer task; implementations never
/// need their own locking for ordering.
pub trait ReportSink: Send {
    fn emit(&mut self, line: &ReportLine);
}

/// Sink that prints each line to stdout (the CLI presentation layer)
#[derive(Debug, Default)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn emit(&mut self, line: &ReportLine) {
        println!("{}", line);
    }
}

/// Sink that collects lines into shared memory, for tests and embedding
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<ReportLine>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of everything emitted so far
    pub fn lines(&self) -> Vec<ReportLine> {
        self.lines.lock().expect("report sink lock poisoned").clone()
    }
}

impl ReportSink for MemorySink {
    fn emit(&mut self, line: &ReportLine) {
        self.lines
            .lock()
            .expect("report sink lock poisoned")
            .push(line.clone());
    }
}

/// Spawns the consumer task that owns the sink
///
/// The task drains the channel until every sender has been dropped, so
/// awaiting the returned handle guarantees all report lines were written.
pub fn spawn_report_consumer(
    mut sink: Box<dyn ReportSink>,
    mut rx: mpsc::UnboundedReceiver<ReportLine>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            sink.emit(&line);
        }
    })
}
