//! HTTP ingestion client.
//!
//! Sends one ranked batch as a single JSON POST, authenticated with a shared
//! secret header. Non-success responses are hard errors and are not retried.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{IngestError, IngestResult};
use crate::security::ServiceEndpoint;
use crate::traits::sink::{IngestBatch, IngestReceipt, OpportunitySink};

/// Header carrying the shared ingestion secret.
pub const SECRET_HEADER: &str = "X-Ingest-Secret";

/// Posts batches to the ingestion service.
///
/// # Example
///
/// ```rust,ignore
/// use listing_scout::sinks::HttpIngestClient;
/// use listing_scout::security::ServiceEndpoint;
///
/// let endpoint = ServiceEndpoint::new(ingest_url).with_secret(secret);
/// let client = HttpIngestClient::new(endpoint)?;
/// let receipt = client.ingest(&batch).await?;
/// ```
pub struct HttpIngestClient {
    client: Client,
    endpoint: ServiceEndpoint,
}

impl HttpIngestClient {
    /// Create a client. The endpoint URL is used as-is for the POST.
    pub fn new(endpoint: ServiceEndpoint) -> IngestResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl OpportunitySink for HttpIngestClient {
    async fn ingest(&self, batch: &IngestBatch) -> IngestResult<IngestReceipt> {
        info!(
            location = %batch.location,
            opportunities = batch.len(),
            "Sending batch to ingestion service"
        );

        let mut request = self.client.post(self.endpoint.base_url()).json(batch);
        if let Some(secret) = self.endpoint.secret() {
            request = request.header(SECRET_HEADER, secret);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Ingestion service rejected batch");
            return Err(IngestError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let receipt: IngestReceipt = serde_json::from_str(&body)?;
        info!(
            job_run_id = %receipt.job_run_id,
            new = receipt.new_count,
            updated = receipt.updated_count,
            "Batch ingested"
        );
        Ok(receipt)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        let endpoint = ServiceEndpoint::new("https://ingest.example.com/api/listings")
            .with_secret("secret");
        let client = HttpIngestClient::new(endpoint).unwrap();
        assert_eq!(client.name(), "http");
        assert_eq!(
            client.endpoint.base_url(),
            "https://ingest.example.com/api/listings"
        );
    }
}
