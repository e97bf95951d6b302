//! Buy-low real-estate listing scout.
//!
//! Turns rendered marketplace pages into a ranked batch of listings priced
//! below their neighborhood's median price per square meter.
//!
//! # Pipeline
//!
//! 1. Build the search URL for a state, city and neighborhood
//! 2. Render it through a [`Renderer`] and extract listing summaries
//! 3. Render each listing's own page (three at a time, with jitter) and
//!    extract a detail record, falling back to the summary on failure
//! 4. Drop records without a price or area
//! 5. Score every listing against the market median and rank
//! 6. Hand the batch to an [`OpportunitySink`]
//!
//! # Usage
//!
//! ```rust,ignore
//! use listing_scout::{deliver, PipelineConfig, Scout, SearchQuery};
//! use listing_scout::renderers::BrowserlessRenderer;
//! use listing_scout::sinks::HttpIngestClient;
//!
//! let scout = Scout::new(Arc::new(renderer), PipelineConfig::default().with_limit(30));
//! let report = scout.run(&SearchQuery::new("sp", "São Paulo", "Vila Mariana")).await?;
//! if let Some(partial) = report.enrich_error() {
//!     tracing::warn!(error = %partial, "partial batch");
//! }
//! let receipt = deliver(&report, &sink).await?;
//! ```
//!
//! # Modules
//!
//! - [`extract`] - Pattern-based extraction from rendered markup
//! - [`pipeline`] - Enrichment, normalization, scoring and the runner
//! - [`traits`] - Collaborator seams (Renderer, OpportunitySink)
//! - [`types`] - Listing, opportunity and configuration types
//! - [`renderers`] - Browserless rendering client
//! - [`sinks`] - HTTP ingestion client
//! - [`security`] - Service endpoints with redacted secrets
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod extract;
pub mod pipeline;
pub mod renderers;
pub mod security;
pub mod sinks;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{IngestError, PipelineError, RenderError};
pub use pipeline::{
    deliver, normalize, search_url, EnrichFailure, EnrichResult, Enricher, Scout, ScoutReport,
    ScoringEngine,
};
pub use traits::{
    renderer::Renderer,
    sink::{IngestBatch, IngestReceipt, OpportunitySink},
};
pub use types::{
    config::{EnrichConfig, PipelineConfig, SearchQuery},
    listing::{ListingDetail, ListingSummary, NormalizedListing, SOURCE_TAG},
    opportunity::{Opportunity, ScoreBreakdown},
};
