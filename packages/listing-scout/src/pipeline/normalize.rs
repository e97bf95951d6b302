//! Detail records to canonical listings.

use tracing::debug;

use crate::types::listing::{ListingDetail, NormalizedListing, SOURCE_TAG};

/// Normalize details, dropping any without a positive price and area.
///
/// Input order is preserved. Rejections are silent apart from a debug line;
/// callers see them as a count difference.
pub fn normalize(details: &[ListingDetail]) -> Vec<NormalizedListing> {
    details
        .iter()
        .filter(|detail| {
            let valid = detail.price_cents > 0 && detail.area_m2 > 0.0;
            if !valid {
                debug!(
                    listing_id = %detail.id,
                    price_cents = detail.price_cents,
                    area_m2 = detail.area_m2,
                    "Dropping listing without price or area"
                );
            }
            valid
        })
        .map(to_normalized)
        .collect()
}

fn to_normalized(detail: &ListingDetail) -> NormalizedListing {
    NormalizedListing {
        source: SOURCE_TAG.to_string(),
        id: detail.id.clone(),
        url: detail.url.clone(),
        title: detail.title.clone(),
        description: detail.description.clone(),
        price_cents: detail.price_cents,
        area_m2: detail.area_m2,
        bedrooms: detail.bedrooms,
        bathrooms: detail.bathrooms,
        suites: detail.suites,
        parking_spots: detail.parking_spots,
        floor: detail.floor,
        condo_fee_cents: detail.condo_fee_cents,
        iptu_cents: detail.iptu_cents,
        address: detail.address.clone(),
        neighborhood: detail.neighborhood.clone(),
        city: detail.city.clone(),
        state: detail.state.clone(),
        images: detail.images.clone(),
        published_at: detail.published_at,
    }
}
