//! Testing utilities including mock implementations.
//!
//! Provides mock implementations of the collaborator traits so the pipeline
//! can be driven end to end without a browser or an ingestion service.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{IngestError, IngestResult, RenderError, RenderResult};
use crate::traits::renderer::Renderer;
use crate::traits::sink::{IngestBatch, IngestReceipt, OpportunitySink};

/// A mock renderer for testing.
///
/// Returns canned markup per URL. Unknown URLs answer with a 404 status so a
/// missing fixture shows up as an ordinary fetch failure.
#[derive(Default, Clone)]
pub struct MockRenderer {
    /// Canned markup by URL
    pages: Arc<RwLock<HashMap<String, String>>>,

    /// URLs that should fail
    fail_urls: Arc<RwLock<Vec<String>>>,

    /// Artificial render latency by URL
    delays: Arc<RwLock<HashMap<String, Duration>>>,

    /// Every URL requested, in call order
    calls: Arc<RwLock<Vec<String>>>,

    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockRenderer {
    /// Create a new mock renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.write().unwrap().insert(url.into(), html.into());
        self
    }

    /// Mark a URL as failing with a 500 from the rendering service.
    pub fn fail_url(self, url: impl Into<String>) -> Self {
        self.fail_urls.write().unwrap().push(url.into());
        self
    }

    /// Sleep `delay` before answering for `url`.
    pub fn with_delay(self, url: impl Into<String>, delay: Duration) -> Self {
        self.delays.write().unwrap().insert(url.into(), delay);
        self
    }

    /// Get all URLs requested so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Get the number of render calls.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Highest number of renders observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    async fn render(&self, url: &str, _settle: Duration) -> RenderResult<String> {
        self.calls.write().unwrap().push(url.to_string());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = self.delays.read().unwrap().get(url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_urls.read().unwrap().iter().any(|u| u == url) {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: 500,
            });
        }

        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| RenderError::Status {
                url: url.to_string(),
                status: 404,
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A mock ingestion sink for testing.
///
/// Records every batch it receives and answers with a receipt counting all
/// opportunities as new.
#[derive(Default, Clone)]
pub struct MockSink {
    batches: Arc<RwLock<Vec<IngestBatch>>>,
    failure: Arc<RwLock<Option<(u16, String)>>>,
}

impl MockSink {
    /// Create a new mock sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every batch with the given status and message.
    pub fn failing(self, status: u16, message: impl Into<String>) -> Self {
        *self.failure.write().unwrap() = Some((status, message.into()));
        self
    }

    /// Get all batches received so far.
    pub fn batches(&self) -> Vec<IngestBatch> {
        self.batches.read().unwrap().clone()
    }
}

#[async_trait]
impl OpportunitySink for MockSink {
    async fn ingest(&self, batch: &IngestBatch) -> IngestResult<IngestReceipt> {
        self.batches.write().unwrap().push(batch.clone());

        if let Some((status, message)) = self.failure.read().unwrap().clone() {
            return Err(IngestError::Api { status, message });
        }

        let count = self.batches.read().unwrap().len();
        Ok(IngestReceipt {
            job_run_id: format!("mock-run-{}", count),
            new_count: batch.len() as u64,
            updated_count: 0,
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Markup fixtures shaped like the marketplace's pages.
pub mod fixtures {
    /// Padding placed between cards so one card's context window never
    /// reaches the next card.
    const CARD_GAP: usize = 12_000;

    /// One search-result card linking to `/imovel/<id>`.
    pub fn card(id: &str, body: &str) -> String {
        format!(
            r#"<div class="listing-card"><a href="/imovel/{id}/comprar">{body}</a></div>"#,
            id = id,
            body = body
        )
    }

    /// A search-results page holding `cards`, spaced apart.
    pub fn results_page(cards: &[String]) -> String {
        let gap = format!("<div>{}</div>", " ".repeat(CARD_GAP));
        format!(
            "<html><body><main>{}</main></body></html>",
            cards.join(&gap)
        )
    }

    /// A listing detail page with the usual labelled sections.
    pub fn detail_page(title: &str, price: &str, area: &str, extra: &str) -> String {
        format!(
            r#"<html><body>
            <h1>{title}</h1>
            <dl><dt>Venda</dt><dd>R$ {price}</dd><dt>Metragem</dt><dd>{area} m²</dd></dl>
            {extra}
            </body></html>"#,
            title = title,
            price = price,
            area = area,
            extra = extra
        )
    }
}
