//! Deterministic date-window derivation from natural-language text.
//!
//! The assistant is not trusted as a date source: whatever dates it writes
//! into a proposed command are discarded, and the window is re-derived here
//! from the user's own question. Unparseable input degrades to a default
//! six-month window instead of failing.

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{latest_final_date, DateRange};

const DEFAULT_WINDOW_MONTHS: i64 = 6;
/// Months are approximated as 30 days for relative windows.
const DAYS_PER_MONTH: i64 = 30;

static LAST_MONTHS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:[uú]ltim[oa]s?|last)\s+(\d{1,3})\s+(?:mes(?:es)?|months?)\b")
        .expect("last-months pattern")
});

static MONTH_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:de|from)\s+([a-záéíóú]+)\s+(?:de\s+|of\s+)?(\d{4})\s+(?:a|to)\s+([a-záéíóú]+)\s+(?:de\s+|of\s+)?(\d{4})",
    )
    .expect("month-range pattern")
});

static ISO_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2})\s*(?:a(?:l)?|to|hasta|[-–])\s*(\d{4}-\d{2}-\d{2})")
        .expect("iso-range pattern")
});

/// Derives the date window for a question. Patterns are tried in order:
/// "last N months", "from <month> <year> to <month> <year>", an explicit
/// ISO range, then the default window. The output always satisfies
/// `start <= end <= today - 2 days`.
pub fn resolve(text: &str, today: NaiveDate) -> DateRange {
    if let Some(range) = last_months(text, today) {
        return range;
    }
    if let Some(range) = month_range(text, today) {
        return range;
    }
    if let Some(range) = iso_range(text, today) {
        return range;
    }
    default_window(today)
}

/// Default window: last six months ending at the reporting-lag boundary.
pub fn default_window(today: NaiveDate) -> DateRange {
    let end = latest_final_date(today);
    DateRange::new(end - Duration::days(DEFAULT_WINDOW_MONTHS * DAYS_PER_MONTH), end)
}

fn last_months(text: &str, today: NaiveDate) -> Option<DateRange> {
    let captures = LAST_MONTHS.captures(text)?;
    let months: i64 = captures[1].parse().ok()?;
    if months == 0 {
        return None;
    }
    let end = latest_final_date(today);
    Some(DateRange::new(end - Duration::days(months * DAYS_PER_MONTH), end))
}

fn month_range(text: &str, today: NaiveDate) -> Option<DateRange> {
    let captures = MONTH_RANGE.captures(text)?;
    let start_month = month_number(&captures[1])?;
    let start_year: i32 = captures[2].parse().ok()?;
    let end_month = month_number(&captures[3])?;
    let end_year: i32 = captures[4].parse().ok()?;

    let start = NaiveDate::from_ymd_opt(start_year, start_month, 1)?;
    let end = month_end(end_year, end_month)?;
    clamp(start, end, today)
}

fn iso_range(text: &str, today: NaiveDate) -> Option<DateRange> {
    let captures = ISO_RANGE.captures(text)?;
    let start = NaiveDate::parse_from_str(&captures[1], "%Y-%m-%d").ok()?;
    let end = NaiveDate::parse_from_str(&captures[2], "%Y-%m-%d").ok()?;
    clamp(start, end, today)
}

/// Clamps `end` to the reporting-lag boundary and rejects windows that end
/// up inverted, so the range invariant holds for every returned value.
fn clamp(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Option<DateRange> {
    let end = end.min(latest_final_date(today));
    if start > end {
        return None;
    }
    Some(DateRange::new(start, end))
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some(first_of_next - Duration::days(1))
}

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let index = match lower.as_str() {
        "enero" | "january" => 1,
        "febrero" | "february" => 2,
        "marzo" | "march" => 3,
        "abril" | "april" => 4,
        "mayo" | "may" => 5,
        "junio" | "june" => 6,
        "julio" | "july" => 7,
        "agosto" | "august" => 8,
        "septiembre" | "setiembre" | "september" => 9,
        "octubre" | "october" => 10,
        "noviembre" | "november" => 11,
        "diciembre" | "december" => 12,
        _ => return None,
    };
    Some(index)
}
