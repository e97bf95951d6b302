//! Ordered extraction rules.
//!
//! Every field owns a slice of rules. Rules are tried in order, each on its
//! own, and the first one that yields a valid value wins. Priority lives in
//! the slice order, not inside a single clever pattern.

use regex::Regex;
use std::sync::LazyLock;

/// Street prefixes recognised at the start of an address.
const STREET_PREFIX: &str = r"\b(?:Rua|Avenida|Av\.|Alameda|Travessa|Praça|Estrada|Rodovia|Largo)";

/// Currency amount following "R$", with optional non-breaking space.
const MONEY: &str = r"R\$(?:\s|&nbsp;)*(\d{1,3}(?:\.\d{3})+(?:,\d{1,2})?|\d+(?:,\d{1,2})?)";

/// Area amount preceding "m²".
const AREA: &str =
    r"(\d{1,3}(?:\.\d{3})+(?:,\d{1,2})?|\d{1,5}\.\d{1,2}|\d{1,5}(?:,\d{1,2})?)\s*m²";

/// One named pattern whose first capture group holds the value.
pub struct ExtractionRule {
    pub name: &'static str,
    pub regex: &'static LazyLock<Regex>,
}

impl ExtractionRule {
    /// First capture of this rule in `text`, trimmed. Empty captures count
    /// as a miss.
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        let value = self.regex.captures(text)?.get(1)?.as_str().trim();
        (!value.is_empty()).then_some(value)
    }
}

/// Run `rules` in order; the first capture that `parse` accepts wins.
pub fn first_valid<T>(
    rules: &[ExtractionRule],
    text: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    rules.iter().find_map(|rule| {
        let raw = rule.capture(text)?;
        let parsed = parse(raw);
        if parsed.is_none() {
            tracing::trace!(rule = rule.name, raw, "Capture rejected");
        }
        parsed
    })
}

// =============================================================================
// Listing page
// =============================================================================

/// Anchor to a listing detail page. Group 1: href, group 2: numeric id.
pub static RE_LISTING_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href="((?:https?://(?:www\.)?quintoandar\.com\.br)?/imovel/(\d+)[^"]*)""#)
        .unwrap()
});

/// Any currency amount. Group 1: amount.
pub static RE_MONEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(MONEY).unwrap());

/// Image under the marketplace CDN path.
pub static RE_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https://www\.quintoandar\.com\.br/img/[^"'\s<>)]+"#).unwrap()
});

/// Street address with an optional trailing neighborhood segment.
/// Group 1: street (and number), group 2: neighborhood.
pub static RE_STREET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"({STREET_PREFIX}\s[^<>"\n,]{{2,100}}(?:,\s*\d+[A-Za-z]?)?)(?:\s*,\s*(\p{{Lu}}[^<>"\n,]{{1,60}}))?"#
    ))
    .unwrap()
});

static RE_TITLE_H2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h2[^>]*>\s*([^<]{5,200}?)\s*</h2>").unwrap());
static RE_TITLE_ALT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<img[^>]*\balt="([^"]{5,200})""#).unwrap());
static RE_TITLE_KIND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"((?:Apartamento|Casa|Cobertura|Studio|Kitnet|Flat|Sobrado)\b[^<>"\n]{3,150})"#)
        .unwrap()
});

static RE_AREA: LazyLock<Regex> = LazyLock::new(|| Regex::new(AREA).unwrap());
static RE_BEDROOMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,3})\s*quartos?\b").unwrap());
static RE_BATHROOMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,3})\s*banheiros?\b").unwrap());
static RE_PARKING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,3})\s*vagas?\b").unwrap());

pub static SUMMARY_TITLE: &[ExtractionRule] = &[
    ExtractionRule { name: "title_h2", regex: &RE_TITLE_H2 },
    ExtractionRule { name: "title_img_alt", regex: &RE_TITLE_ALT },
    ExtractionRule { name: "title_property_kind", regex: &RE_TITLE_KIND },
];

pub static AREA_ANY: &[ExtractionRule] = &[ExtractionRule { name: "area_m2", regex: &RE_AREA }];

pub static BEDROOMS: &[ExtractionRule] =
    &[ExtractionRule { name: "bedrooms", regex: &RE_BEDROOMS }];

pub static BATHROOMS: &[ExtractionRule] =
    &[ExtractionRule { name: "bathrooms", regex: &RE_BATHROOMS }];

pub static PARKING: &[ExtractionRule] = &[ExtractionRule { name: "parking", regex: &RE_PARKING }];

// =============================================================================
// Detail page
// =============================================================================

static RE_PRICE_SALE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?s)\bVenda\b.{{0,200}}?{MONEY}")).unwrap());
static RE_AREA_LABELLED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?s)Metragem.{{0,120}}?{AREA}")).unwrap());
static RE_CONDO_LABELLED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?is)Condom[ií]nio.{{0,120}}?{MONEY}")).unwrap());
static RE_IPTU_LABELLED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?s)IPTU.{{0,120}}?{MONEY}")).unwrap());
static RE_SUITES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,3})\s*su[ií]tes?\b").unwrap());
static RE_FLOOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,3})\s*[º°]?\s*andar\b").unwrap());

static RE_TITLE_H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").unwrap());
static RE_TITLE_DOCUMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

static RE_DESCRIPTION_TESTID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<(?:div|p|section)[^>]*data-testid="[^"]*description[^"]*"[^>]*>(.*?)</(?:div|p|section)>"#,
    )
    .unwrap()
});
static RE_DESCRIPTION_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<(?:div|p|section|span)[^>]*class="[^"]*description[^"]*"[^>]*>(.*?)</(?:div|p|section|span)>"#,
    )
    .unwrap()
});

/// Street, neighborhood, city and state in one match. Groups 1-4.
pub static RE_FULL_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"({STREET_PREFIX}\s[^<>"\n,]{{2,100}}(?:,\s*\d+[A-Za-z]?)?)\s*,\s*([^<>"\n,]{{2,60}}?)\s*,\s*([^<>"\n,]{{2,60}}?)\s*-\s*([A-Z]{{2}})\b"#
    ))
    .unwrap()
});

/// "criado em 5 de março de 2026". Groups: day, month name, year.
pub static RE_PUBLISHED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)criado em (\d{1,2}) de (\p{L}+) de (\d{4})").unwrap()
});

pub static DETAIL_PRICE: &[ExtractionRule] =
    &[ExtractionRule { name: "price_sale_label", regex: &RE_PRICE_SALE }];

pub static DETAIL_AREA: &[ExtractionRule] = &[
    ExtractionRule { name: "area_metragem_label", regex: &RE_AREA_LABELLED },
    ExtractionRule { name: "area_m2", regex: &RE_AREA },
];

pub static DETAIL_CONDO: &[ExtractionRule] =
    &[ExtractionRule { name: "condo_label", regex: &RE_CONDO_LABELLED }];

pub static DETAIL_IPTU: &[ExtractionRule] =
    &[ExtractionRule { name: "iptu_label", regex: &RE_IPTU_LABELLED }];

pub static SUITES: &[ExtractionRule] = &[ExtractionRule { name: "suites", regex: &RE_SUITES }];

pub static FLOOR: &[ExtractionRule] = &[ExtractionRule { name: "floor", regex: &RE_FLOOR }];

pub static DETAIL_TITLE: &[ExtractionRule] = &[
    ExtractionRule { name: "title_h1", regex: &RE_TITLE_H1 },
    ExtractionRule { name: "title_document", regex: &RE_TITLE_DOCUMENT },
];

pub static DESCRIPTION: &[ExtractionRule] = &[
    ExtractionRule { name: "description_testid", regex: &RE_DESCRIPTION_TESTID },
    ExtractionRule { name: "description_class", regex: &RE_DESCRIPTION_CLASS },
];
