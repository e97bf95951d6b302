//! Scout CLI
//!
//! Runs one search through the listing pipeline and either sends the ranked
//! batch to the ingestion service or prints it.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use listing_scout::{
    deliver,
    renderers::BrowserlessRenderer,
    sinks::HttpIngestClient,
    PipelineConfig, Scout, SearchQuery,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(about = "Find below-market listings in one neighborhood")]
struct Cli {
    /// Two-letter state code
    #[arg(long, default_value = "sp")]
    state: String,

    /// City name
    #[arg(long, default_value = "São Paulo")]
    city: String,

    /// Neighborhood to search
    #[arg(long)]
    neighborhood: String,

    /// Maximum number of listings to enrich
    #[arg(long, default_value_t = 30)]
    limit: usize,

    /// Print the ranked batch instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "info,listing_scout=debug,scout=debug"
    } else {
        "info,listing_scout=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env(!cli.dry_run).context("Failed to load configuration")?;
    tracing::debug!(?config, "Configuration loaded");

    let mut renderer =
        BrowserlessRenderer::new(config.renderer.clone()).context("Failed to build renderer")?;
    if let Some(user_agent) = &config.user_agent {
        renderer = renderer.with_user_agent(user_agent.clone());
    }

    let query = SearchQuery::new(&cli.state, &cli.city, &cli.neighborhood);
    let pipeline = PipelineConfig::default().with_limit(cli.limit);
    let report = Scout::new(Arc::new(renderer), pipeline)
        .run(&query)
        .await
        .context("Search failed")?;

    if let Some(partial) = report.enrich_error() {
        tracing::warn!(error = %partial, "Some listings use summary data only");
    }

    if cli.dry_run {
        let json = serde_json::to_string_pretty(&report.to_batch())
            .context("Failed to serialize batch")?;
        println!("{}", json);
        return Ok(());
    }

    let endpoint = config
        .ingest
        .context("INGEST_URL and INGEST_SECRET must be set")?;
    let sink = HttpIngestClient::new(endpoint).context("Failed to build ingest client")?;
    let receipt = deliver(&report, &sink).await.context("Ingestion failed")?;

    tracing::info!(
        job_run_id = %receipt.job_run_id,
        new = receipt.new_count,
        updated = receipt.updated_count,
        opportunities = report.opportunities.len(),
        "Done"
    );
    Ok(())
}
