//! The persisted run document: one JSON shape, one (de)serialization
//! boundary.
//!
//! Downstream report tooling reads these files, so the top-level field
//! names (`success`, `total_ads`, `ads`, `creative_angles`, `query`,
//! `stats`, `scraped_at`) are a compatibility contract.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::angles::AngleReport;
use crate::app::Result;
use crate::domain::{AdRecord, CollectionResult, Query};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub ads_in_range: usize,
    pub ads_out_of_range: u64,
    pub scrolls_performed: u32,
}

/// Top-level document written after every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDocument {
    pub success: bool,
    pub total_ads: usize,
    pub expected_total: u64,
    pub ads: Vec<AdRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creative_angles: Option<AngleReport>,
    pub query: Query,
    pub stats: RunStats,
    pub scraped_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RunDocument {
    /// Freeze a finished collection run into its persisted form.
    pub fn from_run(result: CollectionResult, angles: AngleReport, query: Query) -> Self {
        let stats = RunStats {
            ads_in_range: result.len(),
            ads_out_of_range: result.out_of_range_count,
            scrolls_performed: result.scrolls_performed,
        };
        let success = result.succeeded();
        let expected_total = result.expected_total;
        let message = result
            .error
            .as_ref()
            .map(|e| format!("Collection aborted: {e}"));
        let error = result.error.clone();
        let ads = result.into_ads();

        Self {
            success,
            total_ads: ads.len(),
            expected_total,
            ads,
            creative_angles: Some(angles),
            query,
            stats,
            scraped_at: Utc::now(),
            error,
            message,
        }
    }
}

/// Write the run document as pretty-printed JSON.
pub fn write_document(path: &Path, document: &RunDocument) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a previously written run document.
pub fn read_document(path: &Path) -> Result<RunDocument> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angles;
    use crate::domain::Platform;
    use chrono::NaiveDate;

    fn sample_document() -> RunDocument {
        let mut result = CollectionResult::new();
        result.expected_total = 42;
        result.scrolls_performed = 7;
        result.out_of_range_count = 3;

        for (id, line) in [
            ("111", "Profitez de -20% sur nos probiotiques indispensables"),
            ("222", "DIJO RESET en cure de 7 jours"),
            ("333", "Un microbiote équilibré, enfin"),
        ] {
            let mut ad = AdRecord::new(id.to_string());
            ad.text_lines = vec![line.to_string()];
            ad.date_start = NaiveDate::from_ymd_opt(2025, 3, 1);
            ad.date_start_text = Some("1 mars 2025".to_string());
            ad.platforms.insert(Platform::Facebook);
            ad.platforms.insert(Platform::AudienceNetwork);
            result.insert(ad);
        }

        let report = angles::classify(result.ads(), &angles::Taxonomy::default());
        let query = Query::new("9", "probiotiques", "2025-01-01", "2025-12-31", "FR");
        RunDocument::from_run(result, report, query)
    }

    #[test]
    fn test_file_round_trip_preserves_ads() {
        let document = sample_document();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");

        write_document(&path, &document).unwrap();
        let restored = read_document(&path).unwrap();

        assert_eq!(restored.ads, document.ads);
        assert_eq!(restored.total_ads, document.total_ads);
        assert_eq!(restored.expected_total, 42);
        assert_eq!(restored.stats.scrolls_performed, 7);
        assert_eq!(restored.stats.ads_out_of_range, 3);
        assert!(restored.success);
    }

    #[test]
    fn test_json_shape_is_the_downstream_contract() {
        let value = serde_json::to_value(sample_document()).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["total_ads"], 3);
        assert!(value["ads"].is_array());
        assert!(value["creative_angles"].is_object());
        assert_eq!(value["query"]["country"], "FR");
        assert_eq!(value["stats"]["ads_in_range"], 3);
        assert!(value["scraped_at"].is_string());
        // Errors are omitted entirely on success, not serialized as null.
        assert!(value.get("error").is_none());
        // Platform names use the library's display form.
        assert_eq!(value["ads"][0]["platforms"][0], "Facebook");
        assert_eq!(value["ads"][0]["platforms"][1], "Audience Network");
    }

    #[test]
    fn test_failed_run_keeps_partial_ads() {
        let mut result = CollectionResult::new();
        result.insert(AdRecord::new("only".to_string()));
        result.error = Some("navigation timeout".to_string());

        let document = RunDocument::from_run(
            result,
            angles::AngleReport::default(),
            Query::new("9", "q", "2025-01-01", "2025-12-31", "FR"),
        );

        assert!(!document.success);
        assert_eq!(document.total_ads, 1);
        assert_eq!(document.error.as_deref(), Some("navigation timeout"));
        assert!(document.message.unwrap().contains("navigation timeout"));
    }
}
