//! Sink trait for delivering a scored batch to the ingestion service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::IngestResult;
use crate::types::listing::SOURCE_TAG;
use crate::types::opportunity::Opportunity;

/// One ranked batch, exactly as it goes over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestBatch {
    /// Source tag of every listing in the batch
    pub source: String,

    /// Human-readable search location
    pub location: String,

    /// When the search page was scraped
    pub scraped_at: DateTime<Utc>,

    /// Median price per square meter used for scoring
    pub market_median: f64,

    /// Ranked opportunities, best first
    pub opportunities: Vec<Opportunity>,
}

impl IngestBatch {
    /// Create a batch for the default source.
    pub fn new(
        location: impl Into<String>,
        scraped_at: DateTime<Utc>,
        market_median: f64,
        opportunities: Vec<Opportunity>,
    ) -> Self {
        Self {
            source: SOURCE_TAG.to_string(),
            location: location.into(),
            scraped_at,
            market_median,
            opportunities,
        }
    }

    /// Number of opportunities in the batch.
    pub fn len(&self) -> usize {
        self.opportunities.len()
    }

    /// Check if the batch has no opportunities.
    pub fn is_empty(&self) -> bool {
        self.opportunities.is_empty()
    }
}

/// What the ingestion service did with a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReceipt {
    pub job_run_id: String,
    pub new_count: u64,
    pub updated_count: u64,
}

/// Destination for scored batches.
///
/// Failures are reported upward and never retried here.
#[async_trait]
pub trait OpportunitySink: Send + Sync {
    /// Deliver one batch.
    async fn ingest(&self, batch: &IngestBatch) -> IngestResult<IngestReceipt>;

    /// Get the sink name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_serializes_wire_fields() {
        let batch = IngestBatch::new("Vila Mariana, São Paulo, SP", Utc::now(), 10_000.0, vec![]);
        let json = serde_json::to_value(&batch).unwrap();

        assert_eq!(json["source"], "quintoandar");
        assert_eq!(json["location"], "Vila Mariana, São Paulo, SP");
        assert_eq!(json["market_median"], 10_000.0);
        assert!(json["scraped_at"].is_string());
        assert!(json["opportunities"].as_array().unwrap().is_empty());
        assert!(batch.is_empty());
    }

    #[test]
    fn test_receipt_deserializes() {
        let receipt: IngestReceipt = serde_json::from_str(
            r#"{"job_run_id":"run-42","new_count":3,"updated_count":7}"#,
        )
        .unwrap();
        assert_eq!(receipt.job_run_id, "run-42");
        assert_eq!(receipt.new_count, 3);
        assert_eq!(receipt.updated_count, 7);
    }
}
