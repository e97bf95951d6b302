//! Detail enrichment: one rendered page per summary, bounded concurrency.
//!
//! Every summary gets its own task. A semaphore caps how many tasks render at
//! once, each task sleeps a random jitter before its request, and results
//! come back over a channel to a single consumer. A failed page never fails
//! the batch: its summary is turned into a degraded detail record and the
//! failure is recorded next to it.

use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::error::{PipelineError, RenderError};
use crate::extract::extract_detail;
use crate::traits::renderer::Renderer;
use crate::types::config::EnrichConfig;
use crate::types::listing::{ListingDetail, ListingSummary};

/// One summary whose detail page could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichFailure {
    pub id: String,
    pub url: String,
    pub reason: String,
}

/// Result of an enrichment pass.
///
/// `details` always holds one record per input summary, in completion order.
#[derive(Debug, Clone, Default)]
pub struct EnrichResult {
    pub details: Vec<ListingDetail>,
    pub failures: Vec<EnrichFailure>,
}

impl EnrichResult {
    /// Check if every detail page was fetched and extracted.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Aggregate error for the batch, present iff at least one item failed.
    pub fn error(&self) -> Option<PipelineError> {
        (!self.failures.is_empty()).then(|| PipelineError::PartialEnrichment {
            failed: self.failures.len(),
            total: self.details.len(),
        })
    }
}

struct Outcome {
    index: usize,
    detail: std::result::Result<ListingDetail, RenderError>,
}

/// Fetches detail pages for a batch of summaries.
pub struct Enricher<R> {
    renderer: Arc<R>,
    config: EnrichConfig,
}

impl<R: Renderer + 'static> Enricher<R> {
    /// Create an enricher over a shared renderer. A concurrency of zero is
    /// raised to one.
    pub fn new(renderer: Arc<R>, mut config: EnrichConfig) -> Self {
        config.concurrency = config.concurrency.max(1);
        Self { renderer, config }
    }

    /// Enrich every summary, waiting for all tasks to finish.
    pub async fn enrich(&self, summaries: &[ListingSummary]) -> EnrichResult {
        self.enrich_until(summaries, None).await
    }

    /// Enrich every summary, giving up at `deadline`.
    ///
    /// Tasks still running at the deadline are aborted. Their summaries are
    /// replaced by degraded records and counted as failures, so the output
    /// still has one detail per summary.
    pub async fn enrich_until(
        &self,
        summaries: &[ListingSummary],
        deadline: Option<Instant>,
    ) -> EnrichResult {
        let total = summaries.len();
        info!(
            total,
            concurrency = self.config.concurrency,
            renderer = self.renderer.name(),
            "Enriching listings"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let (tx, mut rx) = mpsc::channel::<Outcome>(total.max(1));
        let mut handles = Vec::with_capacity(total);

        for (index, summary) in summaries.iter().enumerate() {
            let tx = tx.clone();
            let sem = semaphore.clone();
            let renderer = self.renderer.clone();
            let config = self.config.clone();
            let summary = summary.clone();

            handles.push(tokio::spawn(async move {
                let detail = fetch_detail(renderer.as_ref(), &config, &sem, &summary).await;
                let _ = tx.send(Outcome { index, detail }).await;
            }));
        }
        drop(tx);

        let mut result = EnrichResult {
            details: Vec::with_capacity(total),
            failures: Vec::new(),
        };
        let mut finished = vec![false; total];

        loop {
            let next = match deadline {
                Some(at) => match timeout_at(at, rx.recv()).await {
                    Ok(next) => next,
                    Err(_) => {
                        warn!(
                            remaining = finished.iter().filter(|done| !**done).count(),
                            "Enrichment deadline exceeded, abandoning in-flight pages"
                        );
                        break;
                    }
                },
                None => rx.recv().await,
            };
            let Some(outcome) = next else {
                break;
            };

            finished[outcome.index] = true;
            let summary = &summaries[outcome.index];
            match outcome.detail {
                Ok(detail) => result.details.push(detail),
                Err(e) => record_failure(&mut result, summary, e.to_string()),
            }
        }

        for handle in &handles {
            handle.abort();
        }

        // Anything not reported by now was aborted or panicked.
        let reason = if deadline.is_some_and(|at| Instant::now() >= at) {
            "deadline exceeded"
        } else {
            "task aborted"
        };
        for (index, summary) in summaries.iter().enumerate() {
            if !finished[index] {
                record_failure(&mut result, summary, reason.to_string());
            }
        }

        if result.is_success() {
            info!(total, "Enrichment complete");
        } else {
            warn!(
                total,
                failed = result.failures.len(),
                "Enrichment complete with failures"
            );
        }

        result
    }
}

async fn fetch_detail<R: Renderer + ?Sized>(
    renderer: &R,
    config: &EnrichConfig,
    semaphore: &Semaphore,
    summary: &ListingSummary,
) -> std::result::Result<ListingDetail, RenderError> {
    let _permit = semaphore.acquire().await.map_err(|e| RenderError::Http(Box::new(e)))?;

    let jitter = config.sample_jitter();
    if !jitter.is_zero() {
        tokio::time::sleep(jitter).await;
    }

    debug!(listing_id = %summary.id, url = %summary.url, "Rendering detail page");
    let html = timeout(config.page_timeout, renderer.render(&summary.url, config.settle_delay))
        .await
        .map_err(|_| RenderError::Timeout {
            url: summary.url.clone(),
        })??;

    if html.trim().is_empty() {
        return Err(RenderError::EmptyDocument {
            url: summary.url.clone(),
        });
    }

    Ok(extract_detail(&html, summary))
}

fn record_failure(result: &mut EnrichResult, summary: &ListingSummary, reason: String) {
    warn!(
        listing_id = %summary.id,
        url = %summary.url,
        reason = %reason,
        "Detail page failed, using summary data"
    );
    result.details.push(ListingDetail::from_summary(summary));
    result.failures.push(EnrichFailure {
        id: summary.id.clone(),
        url: summary.url.clone(),
        reason,
    });
}
