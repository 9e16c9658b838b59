use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;

static FOUR_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})").expect("valid year regex"));

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Resolves a release indicator into a year
///
/// Numbers are truncated, strings are parsed as a full date first and then
/// scanned for the first run of four digits. Anything else is unknown.
pub fn extract_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i32::try_from(i).ok()
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i32)
            }
        }
        Value::String(s) => year_from_str(s),
        _ => None,
    }
}

/// String form of [`extract_year`]
pub fn year_from_str(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    parse_full_date(raw).or_else(|| {
        FOUR_DIGITS
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    })
}

/// `%Y` also accepts one to three digits, so short years are widened the way
/// dateutil does it (within 50 years of today) and 3-digit years are refused.
fn parse_full_date(raw: &str) -> Option<i32> {
    parse_calendar_year(raw).and_then(|year| match year {
        0..=99 => Some(widen_two_digit_year(year, Utc::now().year())),
        100..=999 => None,
        _ => Some(year),
    })
}

fn widen_two_digit_year(year: i32, current_year: i32) -> i32 {
    let widened = year + current_year / 100 * 100;
    if widened >= current_year + 50 {
        widened - 100
    } else if widened < current_year - 50 {
        widened + 100
    } else {
        widened
    }
}

fn parse_calendar_year(raw: &str) -> Option<i32> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.year());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.year())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .map(|d| d.year())
        })
}
