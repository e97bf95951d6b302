//! Summary extraction from a search-results page.

use std::collections::HashSet;
use tracing::debug;

use super::rules::{
    first_valid, AREA_ANY, BATHROOMS, BEDROOMS, PARKING, RE_IMAGE, RE_LISTING_ANCHOR, RE_MONEY,
    RE_STREET, SUMMARY_TITLE,
};
use super::text::{
    char_window, clean_markup, fold_accents, parse_bounded_count, parse_currency_cents,
    parse_decimal,
};
use crate::types::listing::ListingSummary;

/// Characters of context taken on each side of a listing anchor.
pub const CONTEXT_RADIUS: usize = 5_000;

/// How far back from a currency amount to look for its label.
const LABEL_LOOKBEHIND: usize = 40;

const BASE_URL: &str = "https://www.quintoandar.com.br";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeeKind {
    Condo,
    PropertyTax,
}

/// Extract one summary per unique listing id, in document order.
///
/// Duplicate anchors for the same id are ignored; the first occurrence wins.
pub fn extract_summaries(html: &str) -> Vec<ListingSummary> {
    let mut seen = HashSet::new();
    let mut summaries = Vec::new();

    for caps in RE_LISTING_ANCHOR.captures_iter(html) {
        let (Some(anchor), Some(id)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        if !seen.insert(id.as_str()) {
            continue;
        }

        let window = char_window(html, anchor.start(), CONTEXT_RADIUS);
        summaries.push(summary_from_window(id.as_str(), window));
    }

    debug!(count = summaries.len(), "Extracted listing summaries");
    summaries
}

/// Canonical absolute URL for a listing id.
pub fn canonical_url(id: &str) -> String {
    format!("{}/imovel/{}", BASE_URL, id)
}

fn summary_from_window(id: &str, window: &str) -> ListingSummary {
    let mut summary = ListingSummary::new(id, canonical_url(id));

    if let Some(title) = first_valid(SUMMARY_TITLE, window, non_empty_text) {
        summary.title = title;
    }

    apply_money(&mut summary, window);

    if let Some(area) = first_valid(AREA_ANY, window, positive_decimal) {
        summary.area_m2 = area;
    }
    if let Some(bedrooms) = first_valid(BEDROOMS, window, |raw| parse_bounded_count(raw, 1, 10)) {
        summary.bedrooms = bedrooms;
    }
    if let Some(bathrooms) = first_valid(BATHROOMS, window, |raw| parse_bounded_count(raw, 1, 10))
    {
        summary.bathrooms = bathrooms;
    }
    if let Some(parking) = first_valid(PARKING, window, |raw| parse_bounded_count(raw, 0, 10)) {
        summary.parking_spots = parking;
    }

    if let Some(caps) = RE_STREET.captures(window) {
        summary.address = caps[1].trim().to_string();
        if let Some(neighborhood) = caps.get(2) {
            summary.neighborhood = neighborhood.as_str().trim().to_string();
        }
    }

    if let Some(image) = RE_IMAGE.find(window) {
        summary.thumbnail_url = image.as_str().to_string();
    }

    summary
}

/// First amount is the price; later amounts are fees if a label precedes them.
fn apply_money(summary: &mut ListingSummary, window: &str) {
    let mut amounts = RE_MONEY.captures_iter(window);

    let Some(first) = amounts.next() else {
        return;
    };
    if let Some(price) = parse_currency_cents(&first[1]) {
        summary.price_cents = price;
    }

    for caps in amounts {
        let (Some(whole), Some(raw)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Some(value) = parse_currency_cents(raw.as_str()) else {
            continue;
        };

        let preceding = lookbehind(window, whole.start(), LABEL_LOOKBEHIND);
        match classify_fee(preceding) {
            Some(FeeKind::Condo) if summary.condo_fee_cents == 0 => {
                summary.condo_fee_cents = value;
            }
            Some(FeeKind::PropertyTax) if summary.iptu_cents == 0 => {
                summary.iptu_cents = value;
            }
            _ => {}
        }
    }
}

fn lookbehind(text: &str, end: usize, chars: usize) -> &str {
    let start = text[..end]
        .char_indices()
        .rev()
        .nth(chars.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    &text[start..end]
}

/// The label closest to the amount decides its kind.
fn classify_fee(preceding: &str) -> Option<FeeKind> {
    let folded = fold_accents(preceding);
    let condo = ["condominio", "cond."]
        .iter()
        .filter_map(|label| folded.rfind(label))
        .max();
    let tax = folded.rfind("iptu");

    match (condo, tax) {
        (Some(c), Some(t)) if t > c => Some(FeeKind::PropertyTax),
        (Some(_), _) => Some(FeeKind::Condo),
        (None, Some(_)) => Some(FeeKind::PropertyTax),
        (None, None) => None,
    }
}

fn non_empty_text(raw: &str) -> Option<String> {
    let text = clean_markup(raw);
    (!text.is_empty()).then_some(text)
}

fn positive_decimal(raw: &str) -> Option<f64> {
    parse_decimal(raw).filter(|value| *value > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, body: &str) -> String {
        format!(
            r#"<div class="card"><a href="/imovel/{id}/comprar">{body}</a></div>"#,
            id = id,
            body = body
        )
    }

    #[test]
    fn test_extracts_all_fields_from_card() {
        let html = card(
            "893456789",
            r#"<img src="https://www.quintoandar.com.br/img/med/893456789-1.jpg" alt="Apartamento com 2 quartos na Vila Mariana">
               <h2>Apartamento reformado perto do metrô</h2>
               <p>R$ 650.000</p><p>Condomínio R$ 900</p><p>IPTU R$ 150</p>
               <span>68 m²</span><span>2 quartos</span><span>1 banheiro</span><span>1 vaga</span>
               <p>Rua Domingos de Morais, 1500, Vila Mariana</p>"#,
        );

        let summaries = extract_summaries(&html);
        assert_eq!(summaries.len(), 1);

        let s = &summaries[0];
        assert_eq!(s.id, "893456789");
        assert_eq!(s.url, "https://www.quintoandar.com.br/imovel/893456789");
        assert_eq!(s.title, "Apartamento reformado perto do metrô");
        assert_eq!(s.price_cents, 65_000_000);
        assert_eq!(s.condo_fee_cents, 90_000);
        assert_eq!(s.iptu_cents, 15_000);
        assert_eq!(s.area_m2, 68.0);
        assert_eq!(s.bedrooms, 2);
        assert_eq!(s.bathrooms, 1);
        assert_eq!(s.parking_spots, 1);
        assert_eq!(s.address, "Rua Domingos de Morais, 1500");
        assert_eq!(s.neighborhood, "Vila Mariana");
        assert_eq!(
            s.thumbnail_url,
            "https://www.quintoandar.com.br/img/med/893456789-1.jpg"
        );
    }

    #[test]
    fn test_duplicate_anchor_keeps_first_occurrence() {
        let html = format!(
            "{}{}",
            card("111", "<h2>Primeiro anúncio aqui</h2>"),
            r#"<a href="https://www.quintoandar.com.br/imovel/111">ver de novo</a>"#
        );

        let summaries = extract_summaries(&html);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, "111");
        assert_eq!(summaries[0].title, "Primeiro anúncio aqui");
    }

    #[test]
    fn test_distinct_ids_in_document_order() {
        let filler = "x".repeat(12_000);
        let html = format!(
            "{}{}{}",
            card("2", "<h2>Segundo no id, primeiro na página</h2><p>R$ 400.000</p>"),
            filler,
            card("1", "<h2>Primeiro no id, segundo na página</h2><p>R$ 900.000</p>"),
        );

        let summaries = extract_summaries(&html);
        let ids: Vec<_> = summaries.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(summaries[0].price_cents, 40_000_000);
        assert_eq!(summaries[1].price_cents, 90_000_000);
    }

    #[test]
    fn test_out_of_range_counts_are_discarded() {
        let html = card("5", "<span>15 quartos</span><span>0 banheiros</span><span>12 vagas</span>");
        let s = &extract_summaries(&html)[0];
        assert_eq!(s.bedrooms, 0);
        assert_eq!(s.bathrooms, 0);
        assert_eq!(s.parking_spots, 0);
    }

    #[test]
    fn test_zero_parking_is_accepted() {
        let html = card("6", "<span>0 vagas</span>");
        assert_eq!(extract_summaries(&html)[0].parking_spots, 0);
    }

    #[test]
    fn test_missing_fields_stay_zero() {
        let html = card("7", "sem dados");
        let s = &extract_summaries(&html)[0];
        assert_eq!(s.id, "7");
        assert!(s.title.is_empty());
        assert_eq!(s.price_cents, 0);
        assert_eq!(s.area_m2, 0.0);
        assert!(s.address.is_empty());
        assert!(s.thumbnail_url.is_empty());
    }

    #[test]
    fn test_no_anchors_yields_empty() {
        assert!(extract_summaries("<html><body>Nenhum imóvel</body></html>").is_empty());
    }

    #[test]
    fn test_unlabelled_second_amount_is_ignored() {
        let html = card("8", "<p>R$ 500.000</p><p>antes R$ 550.000</p>");
        let s = &extract_summaries(&html)[0];
        assert_eq!(s.price_cents, 50_000_000);
        assert_eq!(s.condo_fee_cents, 0);
        assert_eq!(s.iptu_cents, 0);
    }

    #[test]
    fn test_classify_fee_uses_closest_label() {
        assert_eq!(classify_fee("Condomínio R$ 800 · IPTU "), Some(FeeKind::PropertyTax));
        assert_eq!(classify_fee("IPTU R$ 100 · Cond. "), Some(FeeKind::Condo));
        assert_eq!(classify_fee("valor total "), None);
    }
}
