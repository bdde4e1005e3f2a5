//! Crawl dispatcher - per-batch orchestration
//!
//! For each input URL the dispatcher runs validation, normalization, and the
//! dedup check synchronously in input order, then spawns one task per
//! admitted URL for the gated fetch and the engine handoff. Admission
//! decisions therefore never race each other; only fetch and traversal run
//! concurrently, and their report lines arrive in completion order.

use crate::config::Config;
use crate::dispatch::completion::BatchCompletion;
use crate::dispatch::fetcher::{build_http_client, timed_fetch};
use crate::dispatch::registry::DedupRegistry;
use crate::engine::CrawlEngine;
use crate::output::{spawn_report_consumer, BatchSummary, ReportLine, ReportSink};
use crate::url::{canonical_key, validate_url};
use crate::DispatchError;
use chrono::Utc;
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};

/// Counters updated from concurrent tasks, folded into the summary after
/// the completion barrier
#[derive(Debug, Default)]
struct TaskCounters {
    fetch_failures: AtomicUsize,
    crawl_failures: AtomicUsize,
    finished: AtomicUsize,
}

/// Batch dispatcher coupling a dedup registry, an admission gate, and a
/// crawl engine
pub struct Dispatcher<E> {
    config: Arc<Config>,
    client: Client,
    engine: Arc<E>,
}

impl<E: CrawlEngine + 'static> Dispatcher<E> {
    /// Creates a dispatcher with its own HTTP client for timing fetches
    pub fn new(config: Config, engine: E) -> crate::Result<Self> {
        let client = build_http_client(&config)?;
        Ok(Dispatcher {
            config: Arc::new(config),
            client,
            engine: Arc::new(engine),
        })
    }

    /// Dispatches a whitespace-separated string of candidate URLs
    ///
    /// This is the raw input shape the presentation layer collects.
    pub async fn run_batch(
        &self,
        input: &str,
        sink: Box<dyn ReportSink>,
    ) -> crate::Result<BatchSummary> {
        let inputs: Vec<String> = input.split_whitespace().map(str::to_string).collect();
        self.run_batch_urls(&inputs, sink).await
    }

    /// Dispatches a batch of candidate URLs
    ///
    /// Each input accounts for exactly one completion unit. The duplicate
    /// groups and the summary are reported only after every unit has
    /// settled, so the report is never emitted against in-flight state.
    pub async fn run_batch_urls(
        &self,
        inputs: &[String],
        sink: Box<dyn ReportSink>,
    ) -> crate::Result<BatchSummary> {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut summary = BatchSummary::new(started_at, inputs.len());

        if inputs.len() > self.config.dispatch.max_batch_size {
            tracing::warn!(
                "Batch of {} inputs exceeds max-batch-size {}; processing anyway",
                inputs.len(),
                self.config.dispatch.max_batch_size
            );
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let consumer = spawn_report_consumer(sink, rx);

        // All per-batch state: nothing here outlives the batch run.
        let registry = Arc::new(DedupRegistry::new());
        let gate = Arc::new(Semaphore::new(self.config.dispatch.max_in_flight as usize));
        let completion = Arc::new(BatchCompletion::new());
        let counters = Arc::new(TaskCounters::default());

        for input in inputs {
            completion.add(1);

            // Validating: issues are advisory and never block the URL.
            let issues = validate_url(input);
            if !issues.is_empty() {
                report(
                    &tx,
                    ReportLine::Issues {
                        input: input.clone(),
                        issues,
                    },
                );
            }

            // Normalizing
            let key = match canonical_key(input) {
                Ok(k) => k,
                Err(e) => {
                    tracing::debug!("Rejecting {}: {}", input, e);
                    report(
                        &tx,
                        ReportLine::Invalid {
                            input: input.clone(),
                        },
                    );
                    summary.invalid += 1;
                    completion.done();
                    continue;
                }
            };

            // DedupCheck before gate acquisition, so a duplicate never
            // consumes an admission slot.
            if !registry.try_admit(&key) {
                registry.record_duplicate(key.clone(), input);
                report(
                    &tx,
                    ReportLine::Duplicate {
                        input: input.clone(),
                        key,
                    },
                );
                summary.duplicates += 1;
                completion.done();
                continue;
            }
            summary.admitted += 1;

            let url = input.clone();
            let client = self.client.clone();
            let engine = Arc::clone(&self.engine);
            let gate = Arc::clone(&gate);
            let completion = Arc::clone(&completion);
            let counters = Arc::clone(&counters);
            let tx = tx.clone();

            tokio::spawn(async move {
                // The gate is never closed while tasks hold it.
                let permit = match gate.acquire_owned().await {
                    Ok(p) => p,
                    Err(_) => {
                        completion.done();
                        return;
                    }
                };

                match timed_fetch(&client, &url).await {
                    Err(e) => {
                        tracing::debug!("Fetch failed for {}: {}", url, e);
                        report(
                            &tx,
                            ReportLine::FetchFailed {
                                url,
                                error: e.to_string(),
                            },
                        );
                        counters.fetch_failures.fetch_add(1, Ordering::Relaxed);
                        completion.done();
                        drop(permit);
                    }
                    Ok(elapsed) => {
                        report(
                            &tx,
                            ReportLine::Loaded {
                                url: url.clone(),
                                elapsed,
                            },
                        );

                        // HandedOff: the engine manages its own internal
                        // concurrency, so the admission slot is returned as
                        // soon as the visit is initiated. The visit task
                        // settles this URL's completion unit.
                        tokio::spawn(async move {
                            match engine.visit(&url).await {
                                Ok(()) => {
                                    counters.finished.fetch_add(1, Ordering::Relaxed);
                                    report(&tx, ReportLine::Finished { url });
                                }
                                Err(e) => {
                                    counters.crawl_failures.fetch_add(1, Ordering::Relaxed);
                                    report(
                                        &tx,
                                        ReportLine::CrawlFailed {
                                            url,
                                            error: e.to_string(),
                                        },
                                    );
                                }
                            }
                            completion.done();
                        });
                        drop(permit);
                    }
                }
            });
        }

        // Completion barrier: every input has settled before any batch-level
        // reporting happens.
        completion.wait().await;

        for (key, originals) in registry.duplicate_groups() {
            report(
                &tx,
                ReportLine::DuplicateGroup {
                    key,
                    inputs: originals,
                },
            );
        }

        summary.fetch_failures = counters.fetch_failures.load(Ordering::Relaxed);
        summary.crawl_failures = counters.crawl_failures.load(Ordering::Relaxed);
        summary.finished = counters.finished.load(Ordering::Relaxed);
        summary.elapsed = start.elapsed();
        report(&tx, ReportLine::Summary(summary.clone()));

        // Dropping the last sender lets the consumer drain and exit.
        drop(tx);
        consumer
            .await
            .map_err(|_| DispatchError::ReportChannelClosed)?;

        Ok(summary)
    }
}

/// Sends a report line to the consumer
///
/// The consumer only stops after all senders drop, so a failed send can
/// only mean the consumer task itself died.
fn report(tx: &mpsc::UnboundedSender<ReportLine>, line: ReportLine) {
    if tx.send(line).is_err() {
        tracing::warn!("Report consumer is gone; dropping a report line");
    }
}
