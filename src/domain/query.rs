use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::{AdlensError, Result};

const LIBRARY_BASE_URL: &str = "https://www.facebook.com/ads/library/";

/// One search against the Ads Library: an advertiser page, a term and a
/// start-date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub page_id: String,
    pub search_term: String,
    /// ISO dates (YYYY-MM-DD), bounding `start_date` in the library UI.
    pub start_date: String,
    pub end_date: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Query {
    pub fn new(
        page_id: impl Into<String>,
        search_term: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        let mut query = Self {
            page_id: page_id.into(),
            search_term: search_term.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            country: country.into(),
            url: None,
        };
        query.url = Some(query.build_url());
        query
    }

    /// Extract search parameters from a full Ads Library URL.
    pub fn from_url(raw: &str) -> Result<Self> {
        let parsed = Url::parse(raw)?;
        let get = |key: &str| -> Option<String> {
            parsed
                .query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        };

        let page_id = get("view_all_page_id").unwrap_or_default();
        let search_term = get("q").unwrap_or_default();
        let start_date = get("start_date[min]").unwrap_or_default();
        let end_date = get("start_date[max]").unwrap_or_default();
        let country = get("country").unwrap_or_else(|| "FR".to_string());

        if page_id.is_empty() || search_term.is_empty() {
            return Err(AdlensError::InvalidInput(format!(
                "URL is missing view_all_page_id or q parameters: {raw}"
            )));
        }

        Ok(Self {
            page_id,
            search_term,
            start_date,
            end_date,
            country,
            url: Some(raw.to_string()),
        })
    }

    /// Build the library search URL for these parameters.
    pub fn build_url(&self) -> String {
        let mut url = Url::parse(LIBRARY_BASE_URL).expect("base URL is valid");
        url.query_pairs_mut()
            .append_pair("active_status", "all")
            .append_pair("ad_type", "all")
            .append_pair("country", &self.country)
            .append_pair("is_targeted_country", "false")
            .append_pair("media_type", "all")
            .append_pair("q", &self.search_term)
            .append_pair("search_type", "page")
            .append_pair("start_date[min]", &self.start_date)
            .append_pair("start_date[max]", &self.end_date)
            .append_pair("view_all_page_id", &self.page_id);
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_carries_all_parameters() {
        let q = Query::new("123", "probiotiques", "2025-01-01", "2025-12-31", "FR");
        let url = q.build_url();
        assert!(url.starts_with(LIBRARY_BASE_URL));
        assert!(url.contains("q=probiotiques"));
        assert!(url.contains("view_all_page_id=123"));
        assert!(url.contains("country=FR"));
        assert!(url.contains("start_date%5Bmin%5D=2025-01-01"));
        assert!(url.contains("start_date%5Bmax%5D=2025-12-31"));
    }

    #[test]
    fn test_url_round_trip() {
        let q = Query::new(
            "2179133842361365",
            "l'indispensable probiotiques",
            "2025-01-01",
            "2026-01-01",
            "FR",
        );
        let parsed = Query::from_url(&q.build_url()).unwrap();
        assert_eq!(parsed.page_id, q.page_id);
        assert_eq!(parsed.search_term, q.search_term);
        assert_eq!(parsed.start_date, q.start_date);
        assert_eq!(parsed.end_date, q.end_date);
        assert_eq!(parsed.country, q.country);
    }

    #[test]
    fn test_from_url_requires_page_and_term() {
        let err = Query::from_url("https://www.facebook.com/ads/library/?country=FR");
        assert!(err.is_err());
    }

    #[test]
    fn test_from_url_defaults_country() {
        let q = Query::from_url(
            "https://www.facebook.com/ads/library/?q=reset&view_all_page_id=42",
        )
        .unwrap();
        assert_eq!(q.country, "FR");
    }
}
