//! Market-relative scoring and ranking.
//!
//! Each listing gets seven independent sub-scores. The discount against the
//! market median price per square meter dominates; fit, keyword and age
//! signals adjust it. The final score is the clamped sum.

use chrono::NaiveDate;
use tracing::debug;

use super::keywords::{DAMAGE_KEYWORDS, RENOVATION_KEYWORDS};
use crate::extract::text::fold_accents;
use crate::types::listing::NormalizedListing;
use crate::types::opportunity::{Opportunity, ScoreBreakdown};

/// Flat penalty applied when any damage keyword is present.
pub const DAMAGE_PENALTY: i32 = -20;

/// Median price per square meter over listings with a known area.
///
/// Returns 0 for an empty set.
pub fn market_median(listings: &[NormalizedListing]) -> f64 {
    let mut values: Vec<f64> = listings
        .iter()
        .filter(|listing| listing.area_m2 > 0.0)
        .map(NormalizedListing::price_per_m2)
        .collect();
    median(&mut values)
}

fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Relative discount of `price_per_m2` against `median`; 0 when either is
/// not positive.
pub fn relative_discount(price_per_m2: f64, median: f64) -> f64 {
    if median > 0.0 && price_per_m2 > 0.0 {
        (median - price_per_m2) / median
    } else {
        0.0
    }
}

/// Discount band score. The 20-40% band scores highest; anything deeper
/// drops back to 20.
pub fn discount_score(discount: f64) -> i32 {
    if (0.20..=0.40).contains(&discount) {
        40
    } else if discount > 0.40 {
        20
    } else if discount >= 0.15 {
        30
    } else if discount >= 0.10 {
        20
    } else if discount >= 0.05 {
        10
    } else {
        0
    }
}

pub fn area_score(area_m2: f64) -> i32 {
    if (50.0..=90.0).contains(&area_m2) {
        15
    } else if (40.0..=100.0).contains(&area_m2) {
        10
    } else {
        0
    }
}

pub fn bedroom_score(bedrooms: u8) -> i32 {
    match bedrooms {
        2 | 3 => 10,
        1 | 4 => 5,
        _ => 0,
    }
}

pub fn parking_score(parking_spots: u8) -> i32 {
    if parking_spots >= 1 {
        5
    } else {
        0
    }
}

/// Score from the number of distinct renovation keywords in folded text.
pub fn keyword_score(folded: &str) -> i32 {
    let hits = RENOVATION_KEYWORDS
        .iter()
        .filter(|keyword| folded.contains(*keyword))
        .count();
    match hits {
        n if n >= 5 => 15,
        n if n >= 3 => 10,
        n if n >= 1 => 5,
        _ => 0,
    }
}

/// Flat penalty on the first damage keyword found in folded text.
pub fn damage_penalty(folded: &str) -> i32 {
    if DAMAGE_KEYWORDS.iter().any(|keyword| folded.contains(keyword)) {
        DAMAGE_PENALTY
    } else {
        0
    }
}

/// Age penalty. Listings without a publication date are not penalized.
pub fn time_decay(published_at: Option<NaiveDate>, today: NaiveDate) -> i32 {
    let Some(published) = published_at else {
        return 0;
    };
    match (today - published).num_days() {
        days if days > 60 => -10,
        days if days > 30 => -5,
        _ => 0,
    }
}

/// Scores and ranks normalized listings against their own market median.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    today: NaiveDate,
}

impl ScoringEngine {
    /// Create an engine that measures listing age against `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Score one listing against a precomputed median.
    pub fn score(&self, listing: NormalizedListing, market_median: f64) -> Opportunity {
        let price_per_m2 = listing.price_per_m2();
        let discount = relative_discount(price_per_m2, market_median);
        let text = fold_accents(&format!("{} {}", listing.title, listing.description));

        let breakdown = ScoreBreakdown {
            discount: discount_score(discount),
            area_fit: area_score(listing.area_m2),
            bedroom_fit: bedroom_score(listing.bedrooms),
            parking_fit: parking_score(listing.parking_spots),
            keyword_signal: keyword_score(&text),
            penalty: damage_penalty(&text),
            time_decay: time_decay(listing.published_at, self.today),
        };

        debug!(
            listing_id = %listing.id,
            price_per_m2,
            discount,
            score = breakdown.total(),
            "Scored listing"
        );

        Opportunity {
            listing,
            price_per_m2,
            market_median,
            discount,
            score: breakdown.total(),
            breakdown,
        }
    }

    /// Compute the market median, score every listing, and sort by score
    /// descending. Ties keep their input order.
    pub fn rank(&self, listings: Vec<NormalizedListing>) -> (f64, Vec<Opportunity>) {
        let median = market_median(&listings);
        let mut opportunities: Vec<Opportunity> = listings
            .into_iter()
            .map(|listing| self.score(listing, median))
            .collect();
        opportunities.sort_by(|a, b| b.score.cmp(&a.score));
        (median, opportunities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::listing::SOURCE_TAG;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn listing(id: &str, price_reais: i64, area_m2: f64) -> NormalizedListing {
        NormalizedListing {
            source: SOURCE_TAG.to_string(),
            id: id.to_string(),
            url: format!("https://www.quintoandar.com.br/imovel/{}", id),
            title: String::new(),
            description: String::new(),
            price_cents: price_reais * 100,
            area_m2,
            bedrooms: 0,
            bathrooms: 0,
            suites: 0,
            parking_spots: 0,
            floor: 0,
            condo_fee_cents: 0,
            iptu_cents: 0,
            address: String::new(),
            neighborhood: String::new(),
            city: String::new(),
            state: String::new(),
            images: vec![],
            published_at: None,
        }
    }

    #[test]
    fn test_median_odd_and_even() {
        let odd = vec![
            listing("1", 800_000, 80.0),
            listing("2", 300_000, 60.0),
            listing("3", 700_000, 100.0),
        ];
        // 10_000, 5_000, 7_000
        assert_eq!(market_median(&odd), 7_000.0);

        let even = vec![listing("1", 800_000, 80.0), listing("2", 300_000, 60.0)];
        assert_eq!(market_median(&even), 7_500.0);
    }

    #[test]
    fn test_median_empty() {
        assert_eq!(market_median(&[]), 0.0);
    }

    #[test]
    fn test_discount_bands() {
        assert_eq!(discount_score(0.20), 40);
        assert_eq!(discount_score(0.40), 40);
        assert_eq!(discount_score(0.41), 20);
        assert_eq!(discount_score(0.17), 30);
        assert_eq!(discount_score(0.12), 20);
        assert_eq!(discount_score(0.05), 10);
        assert_eq!(discount_score(0.02), 0);
        assert_eq!(discount_score(-0.30), 0);
    }

    #[test]
    fn test_fit_scores() {
        assert_eq!(area_score(50.0), 15);
        assert_eq!(area_score(90.0), 15);
        assert_eq!(area_score(45.0), 10);
        assert_eq!(area_score(100.0), 10);
        assert_eq!(area_score(120.0), 0);
        assert_eq!(bedroom_score(3), 10);
        assert_eq!(bedroom_score(4), 5);
        assert_eq!(bedroom_score(0), 0);
        assert_eq!(parking_score(0), 0);
        assert_eq!(parking_score(2), 5);
    }

    #[test]
    fn test_keyword_signal_is_accent_insensitive() {
        let text = fold_accents("URGENTE! Espólio, Venda Rápida");
        // urgente, espolio, venda rapida
        assert_eq!(keyword_score(&text), 10);
        assert_eq!(keyword_score(&fold_accents("Oportunidade")), 5);
        assert_eq!(keyword_score("sala ampla"), 0);
    }

    #[test]
    fn test_renovation_phrase_counts_once() {
        assert_eq!(keyword_score(&fold_accents("Apartamento para reformar")), 5);
        assert_eq!(keyword_score(&fold_accents("Precisa de reforma, reformado em parte")), 5);
        // reforma, oportunidade, urgente
        assert_eq!(keyword_score(&fold_accents("Para reformar! Oportunidade urgente")), 10);
    }

    #[test]
    fn test_penalty_is_flat() {
        let text = fold_accents("Infiltração, mofo e rachadura no teto");
        assert_eq!(damage_penalty(&text), -20);
        assert_eq!(damage_penalty("tudo certo"), 0);
    }

    #[test]
    fn test_time_decay() {
        let today = today();
        let days_ago = |n: i64| Some(today - chrono::Duration::days(n));
        assert_eq!(time_decay(None, today), 0);
        assert_eq!(time_decay(days_ago(10), today), 0);
        assert_eq!(time_decay(days_ago(30), today), 0);
        assert_eq!(time_decay(days_ago(31), today), -5);
        assert_eq!(time_decay(days_ago(61), today), -10);
        assert_eq!(time_decay(days_ago(-5), today), 0);
    }

    #[test]
    fn test_rank_orders_by_score_and_keeps_ties_stable() {
        let mut best = listing("best-fit", 420_000, 70.0);
        best.bedrooms = 2;
        let a = listing("tie-a", 1_000_000, 200.0);
        let b = listing("tie-b", 1_000_000, 200.0);
        let c = listing("market", 700_000, 100.0);

        let engine = ScoringEngine::new(today());
        let (median, ranked) = engine.rank(vec![a, best, b, c]);

        // 5_000, 6_000, 5_000, 7_000
        assert_eq!(median, 5_500.0);
        let ids: Vec<_> = ranked.iter().map(|o| o.listing.id.as_str()).collect();
        assert_eq!(ids[0], "best-fit");
        let tie_a = ids.iter().position(|id| *id == "tie-a");
        let tie_b = ids.iter().position(|id| *id == "tie-b");
        assert!(tie_a < tie_b);
    }

    #[test]
    fn test_score_clamps_at_zero() {
        let mut poor = listing("poor", 2_000_000, 20.0);
        poor.description = "Goteira na sala".to_string();
        poor.published_at = Some(today() - chrono::Duration::days(90));

        let opportunity = ScoringEngine::new(today()).score(poor, 10_000.0);
        assert_eq!(opportunity.breakdown.raw_sum(), -30);
        assert_eq!(opportunity.score, 0);
    }

    proptest! {
        #[test]
        fn prop_median_is_between_min_and_max(
            values in prop::collection::vec(1.0f64..1_000_000.0, 1..50)
        ) {
            let mut sorted = values.clone();
            let m = median(&mut sorted);
            let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(m >= min && m <= max);

            let below = values.iter().filter(|v| **v < m).count();
            let above = values.iter().filter(|v| **v > m).count();
            prop_assert!(below <= values.len() / 2);
            prop_assert!(above <= values.len() / 2);
        }

        #[test]
        fn prop_discount_score_is_a_known_band(discount in -2.0f64..2.0) {
            let score = discount_score(discount);
            prop_assert!([0, 10, 20, 30, 40].contains(&score));
            if discount < 0.05 {
                prop_assert_eq!(score, 0);
            }
            if (0.20..=0.40).contains(&discount) {
                prop_assert_eq!(score, 40);
            }
        }

        #[test]
        fn prop_total_is_clamped(
            discount in 0..=40i32,
            keyword in 0..=15i32,
            penalty in prop::sample::select(vec![0, -20]),
            decay in prop::sample::select(vec![0, -5, -10]),
        ) {
            let breakdown = ScoreBreakdown {
                discount,
                area_fit: 15,
                bedroom_fit: 10,
                parking_fit: 5,
                keyword_signal: keyword,
                penalty,
                time_decay: decay,
            };
            prop_assert!((0..=100).contains(&breakdown.total()));
        }
    }
}
