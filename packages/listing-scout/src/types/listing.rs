//! Listing records - summary, detail, and the normalized transport form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Source tag attached to every normalized listing.
pub const SOURCE_TAG: &str = "quintoandar";

/// Maximum number of images kept on a detail record.
pub const MAX_IMAGES: usize = 20;

/// Lightweight listing record derived from a search-results page.
///
/// Every field is best-effort: a pattern miss leaves the zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingSummary {
    /// Numeric suffix of the canonical `/imovel/<id>` URL
    pub id: String,

    /// Absolute URL of the listing's detail page
    pub url: String,

    pub title: String,

    /// Asking price in centavos
    pub price_cents: i64,

    /// Floor area in square meters
    pub area_m2: f64,

    pub bedrooms: u8,
    pub bathrooms: u8,
    pub parking_spots: u8,

    /// Monthly condominium fee in centavos
    pub condo_fee_cents: i64,

    /// Property tax (IPTU) in centavos
    pub iptu_cents: i64,

    pub neighborhood: String,
    pub address: String,

    /// First image found near the listing anchor
    pub thumbnail_url: String,
}

impl ListingSummary {
    /// Create a summary with only the identity fields set.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            ..Default::default()
        }
    }
}

/// Full listing record derived from the listing's own page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingDetail {
    pub id: String,
    pub url: String,
    pub title: String,
    pub price_cents: i64,
    pub area_m2: f64,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub parking_spots: u8,
    pub condo_fee_cents: i64,
    pub iptu_cents: i64,
    pub neighborhood: String,
    pub address: String,
    pub thumbnail_url: String,

    pub description: String,
    pub suites: u8,
    pub floor: u8,
    pub city: String,
    pub state: String,

    /// Image URLs in document order, deduplicated, at most [`MAX_IMAGES`]
    pub images: Vec<String>,

    pub published_at: Option<NaiveDate>,

    /// Set when this record was synthesized from the summary after a failed
    /// fetch. Never carried into the normalized listing.
    #[serde(skip)]
    pub degraded: bool,
}

impl ListingDetail {
    /// Seed a detail record from a summary. Detail-only fields start empty.
    pub fn seeded(summary: &ListingSummary) -> Self {
        Self {
            id: summary.id.clone(),
            url: summary.url.clone(),
            title: summary.title.clone(),
            price_cents: summary.price_cents,
            area_m2: summary.area_m2,
            bedrooms: summary.bedrooms,
            bathrooms: summary.bathrooms,
            parking_spots: summary.parking_spots,
            condo_fee_cents: summary.condo_fee_cents,
            iptu_cents: summary.iptu_cents,
            neighborhood: summary.neighborhood.clone(),
            address: summary.address.clone(),
            thumbnail_url: summary.thumbnail_url.clone(),
            ..Default::default()
        }
    }

    /// Degraded fallback used when the detail page could not be fetched or
    /// extracted: summary data plus a single-image list from the thumbnail.
    pub fn from_summary(summary: &ListingSummary) -> Self {
        let mut detail = Self::seeded(summary);
        if !summary.thumbnail_url.is_empty() {
            detail.images = vec![summary.thumbnail_url.clone()];
        }
        detail.degraded = true;
        detail
    }
}

/// Canonical listing record suitable for transport.
///
/// Invariant: `price_cents > 0 && area_m2 > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedListing {
    pub source: String,
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub area_m2: f64,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub suites: u8,
    pub parking_spots: u8,
    pub floor: u8,
    pub condo_fee_cents: i64,
    pub iptu_cents: i64,
    pub address: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub images: Vec<String>,
    pub published_at: Option<NaiveDate>,
}

impl NormalizedListing {
    /// Price per square meter in reais. Zero when the area is unknown.
    pub fn price_per_m2(&self) -> f64 {
        if self.area_m2 > 0.0 {
            (self.price_cents as f64 / 100.0) / self.area_m2
        } else {
            0.0
        }
    }
}
