//! The listing pipeline.
//!
//! Stages, in order:
//! - Search URL construction ([`url`])
//! - Detail enrichment with bounded concurrency ([`enrich`])
//! - Normalization gate ([`normalize`])
//! - Market-relative scoring and ranking ([`score`])
//! - The end-to-end runner tying them together ([`run`])

pub mod enrich;
pub mod keywords;
pub mod normalize;
pub mod run;
pub mod score;
pub mod url;

pub use enrich::{EnrichFailure, EnrichResult, Enricher};
pub use normalize::normalize;
pub use run::{deliver, Scout, ScoutReport};
pub use score::{market_median, ScoringEngine};
pub use url::search_url;
