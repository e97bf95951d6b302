//! Detail extraction from a single listing page.
//!
//! The detail record starts as a copy of the summary. Every field is then
//! re-derived from the full document with label-anchored rules and only
//! overwritten when a rule produces a valid value.

use std::collections::HashSet;
use tracing::debug;

use super::rules::{
    first_valid, BATHROOMS, BEDROOMS, DESCRIPTION, DETAIL_AREA, DETAIL_CONDO, DETAIL_IPTU,
    DETAIL_PRICE, DETAIL_TITLE, FLOOR, PARKING, RE_FULL_ADDRESS, RE_IMAGE, RE_PUBLISHED, SUITES,
};
use super::text::{
    clean_markup, parse_bounded_count, parse_currency_cents, parse_decimal, parse_pt_date,
};
use crate::types::listing::{ListingDetail, ListingSummary, MAX_IMAGES};

/// Extract a detail record from a listing page, seeded by its summary.
pub fn extract_detail(html: &str, summary: &ListingSummary) -> ListingDetail {
    let mut detail = ListingDetail::seeded(summary);

    if let Some(title) = first_valid(DETAIL_TITLE, html, non_empty_text) {
        detail.title = title;
    }
    if let Some(price) = first_valid(DETAIL_PRICE, html, positive_cents) {
        detail.price_cents = price;
    }
    if let Some(area) = first_valid(DETAIL_AREA, html, positive_decimal) {
        detail.area_m2 = area;
    }
    if let Some(condo) = first_valid(DETAIL_CONDO, html, parse_currency_cents) {
        detail.condo_fee_cents = condo;
    }
    if let Some(iptu) = first_valid(DETAIL_IPTU, html, parse_currency_cents) {
        detail.iptu_cents = iptu;
    }

    if let Some(bedrooms) = first_valid(BEDROOMS, html, |raw| parse_bounded_count(raw, 1, 10)) {
        detail.bedrooms = bedrooms;
    }
    if let Some(bathrooms) = first_valid(BATHROOMS, html, |raw| parse_bounded_count(raw, 1, 10)) {
        detail.bathrooms = bathrooms;
    }
    if let Some(parking) = first_valid(PARKING, html, |raw| parse_bounded_count(raw, 0, 10)) {
        detail.parking_spots = parking;
    }
    if let Some(suites) = first_valid(SUITES, html, |raw| parse_bounded_count(raw, 0, 10)) {
        detail.suites = suites;
    }
    if let Some(floor) = first_valid(FLOOR, html, |raw| parse_bounded_count(raw, 0, 99)) {
        detail.floor = floor;
    }

    detail.description = first_valid(DESCRIPTION, html, non_empty_text).unwrap_or_default();

    // All four parts come from one match or none of them change.
    if let Some(caps) = RE_FULL_ADDRESS.captures(html) {
        detail.address = caps[1].trim().to_string();
        detail.neighborhood = caps[2].trim().to_string();
        detail.city = caps[3].trim().to_string();
        detail.state = caps[4].trim().to_string();
    }

    detail.images = collect_images(html);
    if detail.images.is_empty() && !detail.thumbnail_url.is_empty() {
        detail.images.push(detail.thumbnail_url.clone());
    }
    if detail.thumbnail_url.is_empty() {
        if let Some(first) = detail.images.first() {
            detail.thumbnail_url = first.clone();
        }
    }

    detail.published_at = RE_PUBLISHED
        .captures(html)
        .and_then(|caps| parse_pt_date(&caps[1], &caps[2], &caps[3]));

    debug!(
        listing_id = %detail.id,
        price_cents = detail.price_cents,
        area_m2 = detail.area_m2,
        images = detail.images.len(),
        "Extracted listing detail"
    );

    detail
}

/// CDN images in document order, deduplicated, capped at [`MAX_IMAGES`].
fn collect_images(html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    RE_IMAGE
        .find_iter(html)
        .map(|m| m.as_str())
        .filter(|url| seen.insert(*url))
        .take(MAX_IMAGES)
        .map(String::from)
        .collect()
}

fn non_empty_text(raw: &str) -> Option<String> {
    let text = clean_markup(raw);
    (!text.is_empty()).then_some(text)
}

fn positive_cents(raw: &str) -> Option<i64> {
    parse_currency_cents(raw).filter(|cents| *cents > 0)
}

fn positive_decimal(raw: &str) -> Option<f64> {
    parse_decimal(raw).filter(|value| *value > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn seed() -> ListingSummary {
        let mut summary = ListingSummary::new("893456789", "https://www.quintoandar.com.br/imovel/893456789");
        summary.title = "Título do card".to_string();
        summary.price_cents = 70_000_000;
        summary.area_m2 = 80.0;
        summary.bedrooms = 3;
        summary.neighborhood = "Vila Mariana".to_string();
        summary.address = "Rua Domingos de Morais".to_string();
        summary.thumbnail_url = "https://www.quintoandar.com.br/img/med/thumb.jpg".to_string();
        summary
    }

    const DETAIL_PAGE: &str = r#"
        <html><head><title>QuintoAndar</title></head><body>
        <h1>Apartamento à venda com 2 quartos, 72m²</h1>
        <p>Rua Vergueiro, 3200, Vila Mariana, São Paulo - SP</p>
        <img src="https://www.quintoandar.com.br/img/xxl/a.jpg">
        <img src="https://www.quintoandar.com.br/img/xxl/b.jpg">
        <img src="https://www.quintoandar.com.br/img/xxl/a.jpg">
        <section>
          <dt>Venda</dt><dd>R$ 640.000</dd>
          <dt>Condomínio</dt><dd>R$ 1.050</dd>
          <dt>IPTU</dt><dd>R$ 210,50</dd>
          <dt>Metragem</dt><dd>72 m²</dd>
        </section>
        <ul><li>2 quartos</li><li>1 suíte</li><li>2 banheiros</li><li>1 vaga</li><li>8º andar</li></ul>
        <div data-testid="house-description">Apartamento <b>original</b>, precisa de reforma.</div>
        <small>Anúncio criado em 7 de março de 2026</small>
        </body></html>"#;

    #[test]
    fn test_detail_overrides_seed() {
        let detail = extract_detail(DETAIL_PAGE, &seed());

        assert_eq!(detail.id, "893456789");
        assert_eq!(detail.title, "Apartamento à venda com 2 quartos, 72m²");
        assert_eq!(detail.price_cents, 64_000_000);
        assert_eq!(detail.condo_fee_cents, 105_000);
        assert_eq!(detail.iptu_cents, 21_050);
        assert_eq!(detail.area_m2, 72.0);
        assert_eq!(detail.bedrooms, 2);
        assert_eq!(detail.suites, 1);
        assert_eq!(detail.bathrooms, 2);
        assert_eq!(detail.parking_spots, 1);
        assert_eq!(detail.floor, 8);
        assert_eq!(detail.description, "Apartamento original , precisa de reforma.");
        assert_eq!(detail.address, "Rua Vergueiro, 3200");
        assert_eq!(detail.neighborhood, "Vila Mariana");
        assert_eq!(detail.city, "São Paulo");
        assert_eq!(detail.state, "SP");
        assert_eq!(detail.published_at, NaiveDate::from_ymd_opt(2026, 3, 7));
        assert!(!detail.degraded);
    }

    #[test]
    fn test_images_are_deduplicated_in_order() {
        let detail = extract_detail(DETAIL_PAGE, &seed());
        assert_eq!(
            detail.images,
            vec![
                "https://www.quintoandar.com.br/img/xxl/a.jpg".to_string(),
                "https://www.quintoandar.com.br/img/xxl/b.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_images_capped() {
        let html: String = (0..30)
            .map(|i| format!(r#"<img src="https://www.quintoandar.com.br/img/xxl/{}.jpg">"#, i))
            .collect();
        let detail = extract_detail(&html, &seed());
        assert_eq!(detail.images.len(), MAX_IMAGES);
        assert!(detail.images[0].ends_with("/0.jpg"));
        assert!(detail.images[19].ends_with("/19.jpg"));
    }

    #[test]
    fn test_empty_page_keeps_seed() {
        let summary = seed();
        let detail = extract_detail("<html></html>", &summary);

        assert_eq!(detail.title, summary.title);
        assert_eq!(detail.price_cents, summary.price_cents);
        assert_eq!(detail.area_m2, summary.area_m2);
        assert_eq!(detail.bedrooms, 3);
        assert_eq!(detail.address, summary.address);
        assert_eq!(detail.neighborhood, summary.neighborhood);
        assert!(detail.city.is_empty());
        assert!(detail.state.is_empty());
        assert!(detail.description.is_empty());
        assert_eq!(detail.images, vec![summary.thumbnail_url.clone()]);
        assert_eq!(detail.published_at, None);
    }

    #[test]
    fn test_partial_address_leaves_all_four_parts() {
        let html = "<p>Rua Vergueiro, 3200, Vila Mariana</p>";
        let detail = extract_detail(html, &seed());
        assert_eq!(detail.address, "Rua Domingos de Morais");
        assert_eq!(detail.neighborhood, "Vila Mariana");
        assert!(detail.city.is_empty());
    }

    #[test]
    fn test_description_falls_back_to_class_rule() {
        let html = r#"<p class="listing-description">Sala ampla e iluminada</p>"#;
        let detail = extract_detail(html, &seed());
        assert_eq!(detail.description, "Sala ampla e iluminada");
    }

    #[test]
    fn test_invalid_date_is_unset() {
        let html = "criado em 31 de fevereiro de 2026";
        assert_eq!(extract_detail(html, &seed()).published_at, None);
    }

    #[test]
    fn test_unaccented_month_name() {
        let html = "Criado em 2 de marco de 2026";
        assert_eq!(
            extract_detail(html, &seed()).published_at,
            NaiveDate::from_ymd_opt(2026, 3, 2)
        );
    }
}
