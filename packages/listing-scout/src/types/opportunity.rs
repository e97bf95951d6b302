//! Scored opportunities and their score breakdown.

use serde::{Deserialize, Serialize};

use super::listing::NormalizedListing;

/// Lowest possible final score.
pub const MIN_SCORE: i32 = 0;

/// Highest possible final score.
pub const MAX_SCORE: i32 = 100;

/// The seven independently computed sub-scores of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Discount against the market median (0..=40)
    pub discount: i32,

    /// Floor area fit (0..=15)
    pub area_fit: i32,

    /// Bedroom count fit (0..=10)
    pub bedroom_fit: i32,

    /// Parking availability (0..=5)
    pub parking_fit: i32,

    /// Renovation-opportunity keywords (0..=15)
    pub keyword_signal: i32,

    /// Structural or water damage keywords (-20 or 0)
    pub penalty: i32,

    /// Age of the listing (-10, -5 or 0)
    pub time_decay: i32,
}

impl ScoreBreakdown {
    /// Raw, unclamped sum of all sub-scores.
    pub fn raw_sum(&self) -> i32 {
        self.discount
            + self.area_fit
            + self.bedroom_fit
            + self.parking_fit
            + self.keyword_signal
            + self.penalty
            + self.time_decay
    }

    /// Final score: the sum clamped into `[0, 100]`.
    pub fn total(&self) -> i32 {
        self.raw_sum().clamp(MIN_SCORE, MAX_SCORE)
    }
}

/// A scored, ranked listing candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    #[serde(flatten)]
    pub listing: NormalizedListing,

    /// Listing price per square meter, in reais
    pub price_per_m2: f64,

    /// Market median price per square meter used for the discount
    pub market_median: f64,

    /// `(median - price_per_m2) / median`, zero when undefined
    pub discount: f64,

    pub score: i32,
    pub breakdown: ScoreBreakdown,
}
