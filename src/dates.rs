//! Ad-card date parsing.
//!
//! The library renders "Started running on January 1, 2025" in English and
//! "1 janvier 2025 - 15 mars 2025" style ranges in French. Cards frequently
//! omit dates entirely, so parsing never errors: absence is a valid outcome
//! and must not abort a collection run.

use chrono::NaiveDate;

use crate::app::{AdlensError, Result};

/// French month names (and common abbreviations) to month numbers.
const FRENCH_MONTHS: &[(&str, u32)] = &[
    ("janvier", 1),
    ("janv", 1),
    ("février", 2),
    ("fevrier", 2),
    ("févr", 2),
    ("mars", 3),
    ("avril", 4),
    ("avr", 4),
    ("mai", 5),
    ("juin", 6),
    ("juillet", 7),
    ("juil", 7),
    ("août", 8),
    ("aout", 8),
    ("septembre", 9),
    ("sept", 9),
    ("octobre", 10),
    ("oct", 10),
    ("novembre", 11),
    ("nov", 11),
    ("décembre", 12),
    ("decembre", 12),
    ("déc", 12),
];

/// Parse a rendered ad date. Strict library format first, then a set of
/// fallback formats. Returns `None` rather than erroring.
pub fn parse_ad_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    // Library format: "January 1, 2025"
    if let Ok(date) = NaiveDate::parse_from_str(text, "%B %d, %Y") {
        return Some(date);
    }

    parse_fallback(text)
}

fn parse_fallback(text: &str) -> Option<NaiveDate> {
    for format in ["%Y-%m-%d", "%d/%m/%Y", "%B %d %Y", "%d %B %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    parse_french(text)
}

/// "1 janvier 2025" or "1er janvier 2025".
fn parse_french(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split_whitespace();
    let day_token = parts.next()?;
    let month_token = parts.next()?;
    let year_token = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let day: u32 = day_token.trim_end_matches("er").parse().ok()?;
    let year: i32 = year_token.parse().ok()?;
    let month_key = month_token.to_lowercase();
    let month_key = month_key.trim_end_matches('.');
    let month = FRENCH_MONTHS
        .iter()
        .find(|(name, _)| *name == month_key)
        .map(|(_, number)| *number)?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a YYYY-MM-DD window bound from the CLI. Malformed input is an
/// input error that aborts before any collection starts.
pub fn parse_iso_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| {
        AdlensError::InvalidInput(format!("invalid date '{text}', expected YYYY-MM-DD"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_strict_library_format() {
        assert_eq!(parse_ad_date("January 1, 2025"), Some(date(2025, 1, 1)));
        assert_eq!(parse_ad_date("December 31, 2024"), Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_iso_fallback() {
        assert_eq!(parse_ad_date("2025-06-15"), Some(date(2025, 6, 15)));
    }

    #[test]
    fn test_french_locale() {
        assert_eq!(parse_ad_date("1 janvier 2025"), Some(date(2025, 1, 1)));
        assert_eq!(parse_ad_date("1er janvier 2025"), Some(date(2025, 1, 1)));
        assert_eq!(parse_ad_date("15 août 2025"), Some(date(2025, 8, 15)));
        assert_eq!(parse_ad_date("3 Décembre 2024"), Some(date(2024, 12, 3)));
    }

    #[test]
    fn test_garbage_is_none_not_error() {
        assert_eq!(parse_ad_date(""), None);
        assert_eq!(parse_ad_date("Sponsorisé"), None);
        assert_eq!(parse_ad_date("32 janvier 2025"), None);
        assert_eq!(parse_ad_date("not a date at all"), None);
    }

    #[test]
    fn test_iso_window_bound() {
        assert_eq!(parse_iso_date("2025-01-01").unwrap(), date(2025, 1, 1));
        assert!(parse_iso_date("01/01/2025").is_err());
        assert!(parse_iso_date("").is_err());
    }
}
