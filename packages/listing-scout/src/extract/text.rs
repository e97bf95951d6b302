//! Text helpers shared by the extractor and the scoring engine.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Portuguese month names, already accent-folded.
const MONTHS: &[(&str, u32)] = &[
    ("janeiro", 1),
    ("fevereiro", 2),
    ("marco", 3),
    ("abril", 4),
    ("maio", 5),
    ("junho", 6),
    ("julho", 7),
    ("agosto", 8),
    ("setembro", 9),
    ("outubro", 10),
    ("novembro", 11),
    ("dezembro", 12),
];

/// Lowercase and strip Portuguese diacritics so "Refôrma" matches "reforma".
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Slice of `text` spanning `radius` characters on each side of byte offset
/// `pos`, clamped to the document.
pub fn char_window(text: &str, pos: usize, radius: usize) -> &str {
    let pos = floor_char_boundary(text, pos.min(text.len()));
    if radius == 0 {
        return "";
    }

    let start = text[..pos]
        .char_indices()
        .rev()
        .nth(radius - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let end = text[pos..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len());

    &text[start..end]
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Strip markup, decode the handful of entities the site emits, and collapse
/// whitespace.
pub fn clean_markup(fragment: &str) -> String {
    let without_tags = RE_TAG.replace_all(fragment, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    RE_WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

/// Brazilian decimal ("1.234,56") to f64.
///
/// Without a comma, a dot followed by one or two digits is read as the
/// decimal point ("72.5"). Any other dot groups thousands.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let dot_decimal = !raw.contains(',')
        && raw.split_once('.').is_some_and(|(_, fraction)| {
            (1..=2).contains(&fraction.len()) && fraction.bytes().all(|b| b.is_ascii_digit())
        });
    let normalized = if dot_decimal {
        raw.to_string()
    } else {
        raw.replace('.', "").replace(',', ".")
    };
    let value: f64 = normalized.parse().ok()?;
    value.is_finite().then_some(value)
}

/// Currency text ("500.000", "1.234,56") to integer centavos.
///
/// Rounds half away from zero on the scaled value.
pub fn parse_currency_cents(raw: &str) -> Option<i64> {
    let value = parse_decimal(raw)?;
    if value < 0.0 {
        return None;
    }
    Some((value * 100.0).round() as i64)
}

/// Small count accepted only inside `[min, max]`. Out-of-range values are
/// discarded, not clamped.
pub fn parse_bounded_count(raw: &str, min: u8, max: u8) -> Option<u8> {
    let value: u32 = raw.trim().parse().ok()?;
    (u32::from(min)..=u32::from(max))
        .contains(&value)
        .then_some(value as u8)
}

/// Month number for a Portuguese month name, accent- and case-insensitive.
pub fn month_number(name: &str) -> Option<u32> {
    let folded = fold_accents(name.trim());
    MONTHS
        .iter()
        .find(|(month, _)| *month == folded)
        .map(|(_, number)| *number)
}

/// Build a date from the three captures of a "D de <mês> de Y" phrase.
pub fn parse_pt_date(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let day: u32 = day.trim().parse().ok()?;
    let year: i32 = year.trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month_number(month)?, day)
}
