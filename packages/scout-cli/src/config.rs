use anyhow::{Context, Result};
use dotenvy::dotenv;
use listing_scout::security::ServiceEndpoint;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub renderer: ServiceEndpoint,
    /// Absent in dry-run mode
    pub ingest: Option<ServiceEndpoint>,
    pub user_agent: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Ingestion settings are only required when `require_ingest` is set.
    pub fn from_env(require_ingest: bool) -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let renderer_url = env::var("RENDERER_URL").context("RENDERER_URL must be set")?;
        let mut renderer = ServiceEndpoint::parse(&renderer_url)
            .context("RENDERER_URL must be an http(s) URL")?;
        if let Ok(token) = env::var("RENDERER_TOKEN") {
            renderer = renderer.with_secret(token);
        }

        let ingest = if require_ingest {
            let url = env::var("INGEST_URL").context("INGEST_URL must be set")?;
            let secret = env::var("INGEST_SECRET").context("INGEST_SECRET must be set")?;
            let endpoint = ServiceEndpoint::parse(&url)
                .context("INGEST_URL must be an http(s) URL")?
                .with_secret(secret);
            Some(endpoint)
        } else {
            None
        };

        Ok(Self {
            renderer,
            ingest,
            user_agent: env::var("SCOUT_USER_AGENT").ok().filter(|ua| !ua.trim().is_empty()),
        })
    }
}
