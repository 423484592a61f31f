//! Official Ads Archive API client.
//!
//! The API path needs none of the scroll heuristics: pages are followed
//! through `paging.next` links until the endpoint reports no more, and the
//! requested window is enforced server-side by the query parameters.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::app::{AdlensError, Result};
use crate::dates;
use crate::domain::{ad::truncate_chars, AdRecord, Platform, Query, MAX_EXCERPT_CHARS, MAX_TEXT_LINES};

const ADS_ARCHIVE_URL: &str = "https://graph.facebook.com/v18.0/ads_archive";

const API_FIELDS: &str = "id,ad_creation_time,ad_creative_bodies,ad_creative_link_captions,\
ad_creative_link_descriptions,ad_creative_link_titles,ad_delivery_start_time,\
ad_delivery_stop_time,ad_snapshot_url,currency,languages,page_id,page_name,\
publisher_platforms,spend";

pub struct AdsArchiveClient {
    client: Client,
    access_token: String,
    base_url: String,
}

impl AdsArchiveClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("adlens/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            access_token: access_token.into(),
            base_url: ADS_ARCHIVE_URL.to_string(),
        }
    }

    /// Fetch every archived ad matching the query, following pagination
    /// until exhausted.
    pub async fn search(&self, query: &Query, limit: u32) -> Result<Vec<AdRecord>> {
        let mut ads = Vec::new();
        let mut next = Some(self.first_page_url(query, limit)?);

        while let Some(url) = next {
            let response = self.client.get(url).send().await?;
            let body: Value = response.error_for_status()?.json().await?;

            if let Some(error) = body.get("error") {
                let message = error["message"].as_str().unwrap_or("unknown error");
                return Err(AdlensError::Api(message.to_string()));
            }

            let (page_ads, next_url) = parse_page(&body);
            tracing::info!(page_size = page_ads.len(), total = ads.len() + page_ads.len(), "fetched API page");
            ads.extend(page_ads);
            next = next_url;
        }

        Ok(ads)
    }

    fn first_page_url(&self, query: &Query, limit: u32) -> Result<Url> {
        let limit = limit.to_string();
        let url = Url::parse_with_params(
            &self.base_url,
            &[
                ("access_token", self.access_token.as_str()),
                ("search_page_ids", query.page_id.as_str()),
                ("search_terms", query.search_term.as_str()),
                ("ad_reached_countries", query.country.as_str()),
                ("ad_active_status", "ALL"),
                ("ad_delivery_date_min", query.start_date.as_str()),
                ("ad_delivery_date_max", query.end_date.as_str()),
                ("fields", API_FIELDS),
                ("limit", limit.as_str()),
            ],
        )?;
        Ok(url)
    }
}

/// Pull the records and the follow-up link out of one API response page.
fn parse_page(body: &Value) -> (Vec<AdRecord>, Option<Url>) {
    let ads = body["data"]
        .as_array()
        .map(|items| items.iter().map(map_api_ad).collect())
        .unwrap_or_default();

    // `next` already carries every parameter, token included.
    let next = body["paging"]["next"]
        .as_str()
        .and_then(|raw| Url::parse(raw).ok());

    (ads, next)
}

/// Map one API ad object into the common record shape, so classification
/// and reporting behave identically to the scraper path.
fn map_api_ad(value: &Value) -> AdRecord {
    let id = value["id"]
        .as_str()
        .map(String::from)
        .unwrap_or_else(|| AdRecord::content_id(&value.to_string()));

    let mut ad = AdRecord::new(id);

    ad.date_start_text = value["ad_delivery_start_time"].as_str().map(String::from);
    ad.date_end_text = value["ad_delivery_stop_time"].as_str().map(String::from);
    ad.date_start = ad
        .date_start_text
        .as_deref()
        .and_then(|t| dates::parse_ad_date(&truncate_chars(t, 10)));
    ad.date_end = ad
        .date_end_text
        .as_deref()
        .and_then(|t| dates::parse_ad_date(&truncate_chars(t, 10)));

    if let Some(platforms) = value["publisher_platforms"].as_array() {
        for platform in platforms.iter().filter_map(Value::as_str) {
            if let Some(known) = platform_from_api(platform) {
                ad.platforms.insert(known);
            }
        }
    }

    let titles = value["ad_creative_link_titles"].as_array();
    let bodies = value["ad_creative_bodies"].as_array();
    ad.text_lines = titles
        .into_iter()
        .flatten()
        .chain(bodies.into_iter().flatten())
        .filter_map(Value::as_str)
        .map(String::from)
        .take(MAX_TEXT_LINES)
        .collect();

    ad.raw_excerpt = truncate_chars(&value.to_string(), MAX_EXCERPT_CHARS);
    ad
}

fn platform_from_api(name: &str) -> Option<Platform> {
    match name {
        "facebook" => Some(Platform::Facebook),
        "instagram" => Some(Platform::Instagram),
        "messenger" => Some(Platform::Messenger),
        "audience_network" => Some(Platform::AudienceNetwork),
        _ => None,
    }
}
