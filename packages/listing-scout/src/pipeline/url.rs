//! Search URL construction.

use crate::types::config::SearchQuery;

const SEARCH_BASE: &str = "https://www.quintoandar.com.br/comprar/imovel";

/// Build the search-results URL for a query.
///
/// Parts are trimmed, lowercased, and whitespace runs become single hyphens.
/// No other validation happens here; a bad location fails at render time.
pub fn search_url(query: &SearchQuery) -> String {
    let state = slug(&query.state);
    let city = slug(&query.city);
    let neighborhood = slug(&query.neighborhood);

    if neighborhood.is_empty() {
        format!("{}/{}-{}-brasil", SEARCH_BASE, city, state)
    } else {
        format!("{}/{}-{}-{}-brasil", SEARCH_BASE, neighborhood, city, state)
    }
}

fn slug(part: &str) -> String {
    part.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}
