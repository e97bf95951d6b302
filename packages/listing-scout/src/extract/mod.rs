//! Structured extraction from rendered marketplace markup.
//!
//! Both entry points are pure functions of the document text:
//!
//! - [`extract_summaries`] reads a search-results page into one
//!   [`ListingSummary`](crate::types::listing::ListingSummary) per listing.
//! - [`extract_detail`] reads a listing's own page into a
//!   [`ListingDetail`](crate::types::listing::ListingDetail), seeded by its
//!   summary.
//!
//! Extraction never fails. A field whose rules all miss keeps its zero value
//! (or its seed, on the detail page).

pub mod detail;
pub mod rules;
pub mod summary;
pub mod text;

pub use detail::extract_detail;
pub use summary::{canonical_url, extract_summaries};
pub use text::fold_accents;
