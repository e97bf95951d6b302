//! Configuration types for a search run and its enrichment stage.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where to search: one neighborhood of one city.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Two-letter state code (e.g. "sp")
    pub state: String,

    /// City name as a human would type it (e.g. "São Paulo")
    pub city: String,

    /// Neighborhood slug or name; empty searches the whole city
    pub neighborhood: String,
}

impl SearchQuery {
    /// Create a new query.
    pub fn new(
        state: impl Into<String>,
        city: impl Into<String>,
        neighborhood: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            city: city.into(),
            neighborhood: neighborhood.into(),
        }
    }

    /// Human-readable location label, used in the ingest payload.
    pub fn location_label(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if !self.neighborhood.trim().is_empty() {
            parts.push(self.neighborhood.trim().to_string());
        }
        parts.push(self.city.trim().to_string());
        parts.push(self.state.trim().to_uppercase());
        parts.join(", ")
    }
}

/// Configuration for the detail enrichment stage.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    /// Maximum simultaneous detail fetches
    pub concurrency: usize,

    /// Lower bound of the pre-fetch jitter
    pub jitter_min: Duration,

    /// Upper bound of the pre-fetch jitter
    pub jitter_max: Duration,

    /// Settle delay passed to the renderer for detail pages
    pub settle_delay: Duration,

    /// Per-page timeout enforced around each render call
    pub page_timeout: Duration,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            concurrency: 3,
            jitter_min: Duration::from_millis(1_000),
            jitter_max: Duration::from_millis(3_000),
            settle_delay: Duration::from_secs(3),
            page_timeout: Duration::from_secs(45),
        }
    }
}

impl EnrichConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency cap (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the jitter range. Bounds are swapped if given in the wrong order.
    pub fn with_jitter(mut self, min: Duration, max: Duration) -> Self {
        self.jitter_min = min.min(max);
        self.jitter_max = min.max(max);
        self
    }

    /// Disable jitter entirely (tests, replays).
    pub fn without_jitter(self) -> Self {
        self.with_jitter(Duration::ZERO, Duration::ZERO)
    }

    /// Set the renderer settle delay.
    pub fn with_settle_delay(mut self, settle: Duration) -> Self {
        self.settle_delay = settle;
        self
    }

    /// Set the per-page timeout.
    pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    /// Draw one jitter interval, uniform in `[jitter_min, jitter_max]`.
    pub fn sample_jitter(&self) -> Duration {
        let min = self.jitter_min.as_millis() as u64;
        let max = self.jitter_max.as_millis() as u64;
        if max <= min {
            return self.jitter_min;
        }
        Duration::from_millis(fastrand::u64(min..=max))
    }
}

/// Configuration for a full pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Enrichment stage settings
    pub enrich: EnrichConfig,

    /// Settle delay for the search-results page
    pub listing_settle_delay: Duration,

    /// Timeout for rendering the search-results page
    pub listing_timeout: Duration,

    /// Wall-clock budget for the whole run
    pub deadline: Duration,

    /// Cap on the number of summaries sent to enrichment
    pub limit: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            enrich: EnrichConfig::default(),
            listing_settle_delay: Duration::from_secs(5),
            listing_timeout: Duration::from_secs(60),
            deadline: Duration::from_secs(10 * 60),
            limit: None,
        }
    }
}

impl PipelineConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set enrichment settings.
    pub fn with_enrich(mut self, enrich: EnrichConfig) -> Self {
        self.enrich = enrich;
        self
    }

    /// Set the listing-page settle delay.
    pub fn with_listing_settle_delay(mut self, settle: Duration) -> Self {
        self.listing_settle_delay = settle;
        self
    }

    /// Set the listing-page timeout.
    pub fn with_listing_timeout(mut self, timeout: Duration) -> Self {
        self.listing_timeout = timeout;
        self
    }

    /// Set the overall run deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Cap how many summaries are enriched.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
