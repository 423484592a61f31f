use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Maximum number of text lines kept per ad card.
pub const MAX_TEXT_LINES: usize = 10;

/// Maximum length (in chars) of the diagnostic excerpt kept per card.
pub const MAX_EXCERPT_CHARS: usize = 600;

/// Delivery surfaces an ad can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    Facebook,
    Instagram,
    Messenger,
    #[serde(rename = "Audience Network")]
    AudienceNetwork,
}

impl Platform {
    /// Detect platform mentions in rendered card text.
    pub fn detect(text: &str) -> BTreeSet<Platform> {
        let mut found = BTreeSet::new();
        if text.contains("Audience Network") {
            found.insert(Platform::AudienceNetwork);
        }
        if text.contains("Facebook") {
            found.insert(Platform::Facebook);
        }
        if text.contains("Instagram") {
            found.insert(Platform::Instagram);
        }
        if text.contains("Messenger") {
            found.insert(Platform::Messenger);
        }
        found
    }
}

/// One collected advertisement snapshot. Immutable once accumulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRecord {
    /// Library identifier, or a content hash when the card exposes none.
    /// Deduplication key: unique within a collection run.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_end: Option<NaiveDate>,
    /// Date text exactly as rendered on the card, before parsing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_start_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_end_text: Option<String>,
    pub platforms: BTreeSet<Platform>,
    /// First lines of the creative text, in render order, at most
    /// [`MAX_TEXT_LINES`].
    pub text_lines: Vec<String>,
    /// Bounded sample of the raw card section, for diagnostics only.
    pub raw_excerpt: String,
}

impl AdRecord {
    pub fn new(id: String) -> Self {
        Self {
            id,
            date_start: None,
            date_end: None,
            date_start_text: None,
            date_end_text: None,
            platforms: BTreeSet::new(),
            text_lines: Vec::new(),
            raw_excerpt: String::new(),
        }
    }

    /// Derive a stable identifier from visible card text.
    ///
    /// Cards can re-render with fresh DOM identities while showing the same
    /// content, so the hash covers the leading content only.
    pub fn content_id(card_text: &str) -> String {
        let head: String = card_text.chars().take(200).collect();
        let mut hasher = Sha256::new();
        hasher.update(head.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Lower-cased creative text, joined for keyword matching.
    pub fn joined_text_lower(&self) -> String {
        self.text_lines.join(" ").to_lowercase()
    }

    /// Creative text with original casing, joined.
    pub fn joined_text(&self) -> String {
        self.text_lines.join(" ")
    }

    /// First text line, conventionally the headline.
    pub fn headline(&self) -> Option<&str> {
        self.text_lines.first().map(String::as_str)
    }
}

/// Truncate to a character count without splitting a UTF-8 scalar.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Inclusive calendar-date window requested for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
