//! End-to-end run: search page → summaries → details → ranked batch.

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tokio::time::{timeout_at, Instant};
use tracing::{info, warn};

use super::enrich::{EnrichFailure, Enricher};
use super::normalize::normalize;
use super::score::ScoringEngine;
use super::url::search_url;
use crate::error::{PipelineError, RenderError, Result};
use crate::extract::extract_summaries;
use crate::traits::renderer::Renderer;
use crate::traits::sink::{IngestBatch, IngestReceipt, OpportunitySink};
use crate::types::config::{PipelineConfig, SearchQuery};
use crate::types::opportunity::Opportunity;

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct ScoutReport {
    /// Human-readable search location
    pub location: String,

    /// Search-results URL that was rendered
    pub search_url: String,

    /// When the search page was rendered
    pub scraped_at: DateTime<Utc>,

    /// Unique listings found on the search page, before the limit
    pub summaries_found: usize,

    /// Detail records produced (one per enriched summary)
    pub enriched: usize,

    /// Detail pages that fell back to summary data
    pub failures: Vec<EnrichFailure>,

    /// Records dropped by normalization
    pub rejected: usize,

    /// Median price per square meter of the scored set
    pub market_median: f64,

    /// Ranked opportunities, best first
    pub opportunities: Vec<Opportunity>,
}

impl ScoutReport {
    /// Aggregate enrichment error, present iff any detail page failed.
    pub fn enrich_error(&self) -> Option<PipelineError> {
        (!self.failures.is_empty()).then(|| PipelineError::PartialEnrichment {
            failed: self.failures.len(),
            total: self.enriched,
        })
    }

    /// The ingestion payload for this run.
    pub fn to_batch(&self) -> IngestBatch {
        IngestBatch::new(
            self.location.clone(),
            self.scraped_at,
            self.market_median,
            self.opportunities.clone(),
        )
    }
}

/// Runs one search query through the whole pipeline.
///
/// # Example
///
/// ```rust,ignore
/// let scout = Scout::new(Arc::new(renderer), PipelineConfig::default().with_limit(30));
/// let report = scout.run(&SearchQuery::new("sp", "São Paulo", "Vila Mariana")).await?;
/// let receipt = deliver(&report, &sink).await?;
/// ```
pub struct Scout<R> {
    renderer: Arc<R>,
    config: PipelineConfig,
    today: Option<NaiveDate>,
}

impl<R: Renderer + 'static> Scout<R> {
    /// Create a scout over a shared renderer.
    pub fn new(renderer: Arc<R>, config: PipelineConfig) -> Self {
        Self {
            renderer,
            config,
            today: None,
        }
    }

    /// Fix the date listing age is measured against. Defaults to the UTC
    /// date at scrape time.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Run the query to completion.
    ///
    /// Fails only when the search page cannot be rendered. Detail failures
    /// are reported through [`ScoutReport::failures`].
    pub async fn run(&self, query: &SearchQuery) -> Result<ScoutReport> {
        let started = Instant::now();
        let deadline = started + self.config.deadline;
        let url = search_url(query);
        let location = query.location_label();

        info!(location = %location, url = %url, "Rendering search page");
        let html = self.render_listing_page(&url, started, deadline).await?;
        let scraped_at = Utc::now();

        let mut summaries = extract_summaries(&html);
        let summaries_found = summaries.len();
        if let Some(limit) = self.config.limit {
            summaries.truncate(limit);
        }
        if summaries.is_empty() {
            warn!(url = %url, "No listings found on search page");
        } else {
            info!(
                found = summaries_found,
                enriching = summaries.len(),
                "Extracted listings from search page"
            );
        }

        let enricher = Enricher::new(self.renderer.clone(), self.config.enrich.clone());
        let enriched = enricher.enrich_until(&summaries, Some(deadline)).await;
        if let Some(e) = enriched.error() {
            warn!(error = %e, "Continuing with partially enriched batch");
        }

        let listings = normalize(&enriched.details);
        let rejected = enriched.details.len() - listings.len();

        let today = self.today.unwrap_or_else(|| scraped_at.date_naive());
        let (market_median, opportunities) = ScoringEngine::new(today).rank(listings);

        info!(
            opportunities = opportunities.len(),
            rejected,
            market_median,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Run complete"
        );

        Ok(ScoutReport {
            location,
            search_url: url,
            scraped_at,
            summaries_found,
            enriched: enriched.details.len(),
            failures: enriched.failures,
            rejected,
            market_median,
            opportunities,
        })
    }

    async fn render_listing_page(
        &self,
        url: &str,
        started: Instant,
        deadline: Instant,
    ) -> Result<String> {
        let page_deadline = (started + self.config.listing_timeout).min(deadline);
        let rendered = timeout_at(
            page_deadline,
            self.renderer.render(url, self.config.listing_settle_delay),
        )
        .await;

        let html = match rendered {
            Ok(Ok(html)) => html,
            Ok(Err(e)) => return Err(PipelineError::ListingPage(e)),
            Err(_) if page_deadline == deadline => {
                return Err(PipelineError::DeadlineExceeded {
                    stage: "listing page",
                })
            }
            Err(_) => {
                return Err(PipelineError::ListingPage(RenderError::Timeout {
                    url: url.to_string(),
                }))
            }
        };

        if html.trim().is_empty() {
            return Err(PipelineError::ListingPage(RenderError::EmptyDocument {
                url: url.to_string(),
            }));
        }
        Ok(html)
    }
}

/// Send a report's batch to the sink. Transport failures are fatal.
pub async fn deliver<S: OpportunitySink + ?Sized>(
    report: &ScoutReport,
    sink: &S,
) -> Result<IngestReceipt> {
    let receipt = sink.ingest(&report.to_batch()).await?;
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockRenderer, MockSink};
    use crate::types::config::EnrichConfig;
    use std::time::Duration;

    const SEARCH_URL: &str =
        "https://www.quintoandar.com.br/comprar/imovel/vila-mariana-são-paulo-sp-brasil";

    fn query() -> SearchQuery {
        SearchQuery::new("sp", "São Paulo", "Vila Mariana")
    }

    fn config() -> PipelineConfig {
        PipelineConfig::default().with_enrich(EnrichConfig::new().without_jitter())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[tokio::test]
    async fn test_listing_page_failure_is_fatal() {
        let renderer = MockRenderer::new().fail_url(SEARCH_URL);
        let scout = Scout::new(Arc::new(renderer), config());

        let err = scout.run(&query()).await.unwrap_err();
        assert!(matches!(err, PipelineError::ListingPage(RenderError::Status { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_empty_search_page_yields_empty_report() {
        let renderer = MockRenderer::new().with_page(SEARCH_URL, "<html><body></body></html>");
        let report = Scout::new(Arc::new(renderer), config())
            .with_today(today())
            .run(&query())
            .await
            .unwrap();

        assert_eq!(report.summaries_found, 0);
        assert!(report.opportunities.is_empty());
        assert_eq!(report.market_median, 0.0);
        assert!(report.enrich_error().is_none());
        assert_eq!(report.location, "Vila Mariana, São Paulo, SP");
    }

    #[tokio::test]
    async fn test_limit_caps_enrichment() {
        let cards: Vec<_> = (1..=4)
            .map(|i| fixtures::card(&i.to_string(), "<p>R$ 400.000</p><span>50 m²</span>"))
            .collect();
        let renderer = MockRenderer::new().with_page(SEARCH_URL, fixtures::results_page(&cards));

        let report = Scout::new(Arc::new(renderer.clone()), config().with_limit(2))
            .with_today(today())
            .run(&query())
            .await
            .unwrap();

        assert_eq!(report.summaries_found, 4);
        assert_eq!(report.enriched, 2);
        // search page + two detail pages
        assert_eq!(renderer.call_count(), 3);
        // detail pages are unknown to the mock, so both degrade to summary data
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.opportunities.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listing_page_timeout() {
        let renderer = MockRenderer::new()
            .with_page(SEARCH_URL, "<html></html>")
            .with_delay(SEARCH_URL, Duration::from_secs(90));

        let err = Scout::new(Arc::new(renderer), config())
            .run(&query())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::ListingPage(RenderError::Timeout { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_during_listing_page() {
        let renderer = MockRenderer::new()
            .with_page(SEARCH_URL, "<html></html>")
            .with_delay(SEARCH_URL, Duration::from_secs(90));

        let config = config().with_deadline(Duration::from_secs(10));
        let err = Scout::new(Arc::new(renderer), config)
            .run(&query())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::DeadlineExceeded { stage: "listing page" }
        ));
    }

    #[tokio::test]
    async fn test_deliver_failure_is_fatal() {
        let renderer = MockRenderer::new().with_page(SEARCH_URL, "<html></html>");
        let report = Scout::new(Arc::new(renderer), config())
            .with_today(today())
            .run(&query())
            .await
            .unwrap();

        let sink = MockSink::new().failing(503, "unavailable");
        let err = deliver(&report, &sink).await.unwrap_err();
        assert!(matches!(err, PipelineError::Ingest(_)));
    }
}
