//! Slug generation and the date formats accepted in document metadata.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rand::distr::Alphanumeric;
use rand::Rng;

use halosync_core::SlugStrategy;

/// Length of a [`SlugStrategy::ShortId`] slug.
pub const SHORT_ID_LEN: usize = 8;

/// Derive a slug for `title`.
///
/// `strategy` defaults to [`SlugStrategy::TitleBased`]. `reference_date` is
/// only read by [`SlugStrategy::Timestamp`]; an absent or unparseable date
/// falls back to the current instant. Never fails; the result is empty only
/// for a short id of an empty title.
pub fn generate_slug(
    title: &str,
    strategy: Option<SlugStrategy>,
    reference_date: Option<&str>,
) -> String {
    match strategy.unwrap_or_default() {
        SlugStrategy::TitleBased => title_slug(title),
        SlugStrategy::ShortId => short_id(title),
        SlugStrategy::FullId => uuid::Uuid::new_v4().to_string(),
        SlugStrategy::Timestamp => {
            let instant = reference_date.and_then(parse_date).unwrap_or_else(Utc::now);
            instant.timestamp_millis().to_string()
        }
    }
}

/// Transliterate to ASCII, lowercase, and join alphanumeric runs with `-`.
fn title_slug(title: &str) -> String {
    let ascii = deunicode::deunicode(title.trim());
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_sep = false;
    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}

fn short_id(title: &str) -> String {
    if title.is_empty() {
        return String::new();
    }
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SHORT_ID_LEN)
        .map(char::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a metadata `date` value.
///
/// RFC 3339 keeps its offset; date-times without one and bare dates are read
/// as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
