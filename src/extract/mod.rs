//! Page Extractor: turns the rendered text of an Ads Library results page
//! into raw [`AdRecord`]s.
//!
//! The library renders one card per ad, each headed by a status word and a
//! library-id label ("Library ID: 123..." / "ID dans la bibliothèque :
//! 123..."). Extraction is pure pattern-matching over `body.innerText`, so
//! it is deterministic for a given rendering state: re-extracting the same
//! page yields the same records.

use std::sync::LazyLock;

use regex::Regex;

use crate::dates;
use crate::domain::{ad::truncate_chars, AdRecord, Platform, MAX_EXCERPT_CHARS, MAX_TEXT_LINES};

/// Card start marker: optional status word followed by the id label, in
/// either UI locale.
static CARD_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(?:Inactive|Active|Inactif|Actif)\s+)?(?:ID dans la bibliothèque|Library ID)")
        .expect("valid regex")
});

static LIBRARY_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:ID dans la bibliothèque|Library ID)\s*:?\s*(\d+)").expect("valid regex")
});

/// English single start date: "Started running on January 1, 2025".
static STARTED_RUNNING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Started running on ([A-Za-z]+ \d{1,2}, \d{4})").expect("valid regex")
});

/// French date range: "1 janvier 2025 - 15 mars 2025".
static DATE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2}(?:er)?\s+\p{L}+\s+\d{4})\s*-\s*(\d{1,2}(?:er)?\s+\p{L}+\s+\d{4})")
        .expect("valid regex")
});

/// Advertiser-reported result count shown above the feed.
static EXPECTED_TOTAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+(?:résultats?|results?)").expect("valid regex"));

/// Extract every ad card currently visible in the rendered page text.
///
/// May return records already produced by a previous call against an
/// earlier rendering state; deduplication is the collector's job.
pub fn extract_ads(page_text: &str) -> Vec<AdRecord> {
    split_card_sections(page_text)
        .into_iter()
        .map(extract_card)
        .collect()
}

/// Advertiser-reported total, 0 when the page does not expose one.
pub fn extract_expected_total(page_text: &str) -> u64 {
    EXPECTED_TOTAL_RE
        .captures(page_text)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

/// Slice the page text into per-card sections at each card marker.
fn split_card_sections(page_text: &str) -> Vec<&str> {
    let starts: Vec<usize> = CARD_MARKER_RE
        .find_iter(page_text)
        .map(|m| m.start())
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(page_text.len());
            &page_text[start..end]
        })
        .collect()
}

fn extract_card(section: &str) -> AdRecord {
    // Library-reported id when present; cards that hide it get a
    // content-derived id so re-rendered DOM never double-counts.
    let id = LIBRARY_ID_RE
        .captures(section)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| AdRecord::content_id(section));

    let mut ad = AdRecord::new(id);

    if let Some(caps) = STARTED_RUNNING_RE.captures(section) {
        ad.date_start_text = Some(caps[1].to_string());
    } else if let Some(caps) = DATE_RANGE_RE.captures(section) {
        ad.date_start_text = Some(caps[1].to_string());
        ad.date_end_text = Some(caps[2].to_string());
    }
    ad.date_start = ad.date_start_text.as_deref().and_then(dates::parse_ad_date);
    ad.date_end = ad.date_end_text.as_deref().and_then(dates::parse_ad_date);

    ad.platforms = Platform::detect(section);
    ad.text_lines = creative_lines(section);
    ad.raw_excerpt = truncate_chars(section, MAX_EXCERPT_CHARS);
    ad
}

/// Creative text lines: everything after the sponsored marker, trimmed,
/// non-empty, capped at [`MAX_TEXT_LINES`].
fn creative_lines(section: &str) -> Vec<String> {
    let body = section
        .split_once("Sponsorisé")
        .or_else(|| section.split_once("Sponsored"))
        .map(|(_, rest)| rest)
        .unwrap_or("");

    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_TEXT_LINES)
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const FRENCH_PAGE: &str = "\
À propos de ces résultats
42 résultats
Inactive
ID dans la bibliothèque : 111222333
1 janvier 2025 - 15 mars 2025
Plateformes
Facebook Instagram
Dijo
Sponsorisé
Profitez de -20% sur nos probiotiques indispensables
Votre microbiote vous dira merci
En savoir plus
Active
ID dans la bibliothèque : 444555666
10 février 2025 - 28 février 2025
Plateformes
Facebook Messenger
Dijo
Sponsorisé
DIJO RESET, le programme de 7 jours
Découvrez notre cure
";

    const ENGLISH_PAGE: &str = "\
12 results
Active
Library ID: 987654321
Started running on January 5, 2025
Platforms
Facebook Instagram Audience Network
Sponsored
Say goodbye to bloating with our glutamine blend
Learn More
";

    #[test]
    fn test_expected_total_both_locales() {
        assert_eq!(extract_expected_total(FRENCH_PAGE), 42);
        assert_eq!(extract_expected_total(ENGLISH_PAGE), 12);
        assert_eq!(extract_expected_total("no counter here"), 0);
    }

    #[test]
    fn test_extracts_one_record_per_card() {
        let ads = extract_ads(FRENCH_PAGE);
        assert_eq!(ads.len(), 2);
        assert_eq!(ads[0].id, "111222333");
        assert_eq!(ads[1].id, "444555666");
    }

    #[test]
    fn test_french_date_range() {
        let ads = extract_ads(FRENCH_PAGE);
        assert_eq!(ads[0].date_start_text.as_deref(), Some("1 janvier 2025"));
        assert_eq!(ads[0].date_end_text.as_deref(), Some("15 mars 2025"));
        assert_eq!(
            ads[0].date_start,
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
        assert_eq!(ads[0].date_end, NaiveDate::from_ymd_opt(2025, 3, 15));
    }

    #[test]
    fn test_english_started_running_date() {
        let ads = extract_ads(ENGLISH_PAGE);
        assert_eq!(ads.len(), 1);
        assert_eq!(ads[0].id, "987654321");
        assert_eq!(ads[0].date_start, NaiveDate::from_ymd_opt(2025, 1, 5));
        assert_eq!(ads[0].date_end, None);
    }

    #[test]
    fn test_platforms_per_card() {
        let ads = extract_ads(FRENCH_PAGE);
        assert!(ads[0].platforms.contains(&Platform::Facebook));
        assert!(ads[0].platforms.contains(&Platform::Instagram));
        assert!(!ads[0].platforms.contains(&Platform::Messenger));
        assert!(ads[1].platforms.contains(&Platform::Messenger));
    }

    #[test]
    fn test_creative_lines_follow_sponsored_marker() {
        let ads = extract_ads(FRENCH_PAGE);
        assert_eq!(
            ads[0].text_lines[0],
            "Profitez de -20% sur nos probiotiques indispensables"
        );
        assert_eq!(ads[0].text_lines.len(), 3);
    }

    #[test]
    fn test_card_without_id_label_gets_content_hash() {
        let page = "Active\nLibrary ID unavailable\nSponsored\nHello";
        // The marker matches but no digits follow, so a content id is used.
        let ads = extract_ads(page);
        assert_eq!(ads.len(), 1);
        assert_eq!(ads[0].id.len(), 64);
    }

    #[test]
    fn test_re_extraction_is_deterministic() {
        let first = extract_ads(FRENCH_PAGE);
        let second = extract_ads(FRENCH_PAGE);
        assert_eq!(first, second);
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let long_tail = "x ".repeat(MAX_EXCERPT_CHARS);
        let page = format!("Active\nLibrary ID: 1\nSponsored\n{long_tail}");
        let ads = extract_ads(&page);
        assert!(ads[0].raw_excerpt.chars().count() <= MAX_EXCERPT_CHARS);
    }
}
