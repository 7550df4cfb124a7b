// src/process/dates.rs

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Parenthesized annotations appended to date headers, e.g.
/// "Mar. 31, 2024 (10-Q_2024-02-06)".
static PAREN_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*?\)").unwrap());

/// A single abbreviation dot after a word token ("Mar." -> "Mar").
static ABBREV_DOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\w+)\.").unwrap());

/// Month name, day and 4-digit year anywhere in the label, in either
/// month-first or day-first order.
static MONTH_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([A-Za-z]{3,9})\b[^0-9]*(\d{1,2})\D+((?:19|20)\d{2})").unwrap());
static DAY_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})\s+([A-Za-z]{3,9})\D+((?:19|20)\d{2})").unwrap());

const FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Drop the annotation noise that filings attach to date headers.
fn clean_label(raw: &str) -> String {
    let no_parens = PAREN_SUFFIX.replace_all(raw, "");
    ABBREV_DOT.replace_all(&no_parens, "$1").trim().to_string()
}

fn month_number(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_ascii_lowercase();
    let n = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(n)
}

/// Parse a raw date-column header into a calendar date, tolerating
/// annotation suffixes, abbreviation dots and extra words. Returns `None`
/// when no date can be recovered.
pub fn parse_label(raw: &str) -> Option<NaiveDate> {
    let cleaned = clean_label(raw);
    if cleaned.is_empty() {
        return None;
    }

    for fmt in FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(&cleaned, fmt) {
            return Some(d);
        }
    }

    // Tolerate extra words by pulling the month/day/year tokens out of
    // whatever surrounds them.
    if let Some(caps) = MONTH_FIRST.captures(&cleaned) {
        if let Some(month) = month_number(&caps[1]) {
            let day: Option<u32> = caps[2].parse().ok();
            let year: Option<i32> = caps[3].parse().ok();
            if let (Some(day), Some(year)) = (day, year) {
                if let Some(d) = NaiveDate::from_ymd_opt(year, month, day) {
                    return Some(d);
                }
            }
        }
    }
    if let Some(caps) = DAY_FIRST.captures(&cleaned) {
        if let Some(month) = month_number(&caps[2]) {
            let day: Option<u32> = caps[1].parse().ok();
            let year: Option<i32> = caps[3].parse().ok();
            if let (Some(day), Some(year)) = (day, year) {
                if let Some(d) = NaiveDate::from_ymd_opt(year, month, day) {
                    return Some(d);
                }
            }
        }
    }

    None
}

/// Canonical `YYYY-MM-DD` form of a raw header, or the cleaned raw string
/// when parsing fails. Callers that need a real date use [`parse_label`];
/// the string fallback exists for display and diagnostics only.
pub fn canonicalize_label(raw: &str) -> String {
    match parse_label(raw) {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => clean_label(raw),
    }
}
