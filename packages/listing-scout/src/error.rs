//! Typed errors for the listing pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`).

use thiserror::Error;

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The search-results page could not be rendered; nothing to enrich.
    #[error("listing page failed: {0}")]
    ListingPage(#[source] RenderError),

    /// Some detail pages failed and were replaced by summary data.
    ///
    /// Returned next to a complete result set; callers decide whether the
    /// partial batch is acceptable.
    #[error("{failed} erros ao enriquecer {total} anúncios")]
    PartialEnrichment { failed: usize, total: usize },

    /// Sending the scored batch failed. The batch is not stored anywhere else.
    #[error("ingest failed: {0}")]
    Ingest(#[from] IngestError),

    /// The overall run deadline expired before the stage finished.
    #[error("pipeline deadline exceeded during {stage}")]
    DeadlineExceeded { stage: &'static str },
}

/// Errors returned by a [`Renderer`](crate::traits::renderer::Renderer).
#[derive(Debug, Error)]
pub enum RenderError {
    /// Transport-level failure talking to the rendering service
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Rendering service answered with a non-success status
    #[error("render service returned {status} for {url}")]
    Status { url: String, status: u16 },

    /// Navigation did not finish within the caller's timeout
    #[error("timeout rendering: {url}")]
    Timeout { url: String },

    /// The page rendered but produced no markup
    #[error("empty document: {url}")]
    EmptyDocument { url: String },
}

/// Errors returned by an [`OpportunitySink`](crate::traits::sink::OpportunitySink).
#[derive(Debug, Error)]
pub enum IngestError {
    /// Request could not be sent or the body could not be read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Ingestion service rejected the batch
    #[error("ingest API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected receipt
    #[error("invalid ingest response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for render operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Result type alias for ingest operations.
pub type IngestResult<T> = std::result::Result<T, IngestError>;
