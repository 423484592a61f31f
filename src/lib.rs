//! # adlens
//!
//! Collects advertisements from the Facebook Ads Library for a given
//! advertiser page and search term, then reports on the creative "angles"
//! being tested: promotional discounts, product focuses, health-benefit
//! claims, call-to-actions, headline diversity and posting timeline.
//!
//! ## Architecture
//!
//! ```text
//! Page (browser) → Extractor → Collector → Classifier → Reporter
//! ```
//!
//! The library feed renders lazily, so the collector alternates extraction
//! with scrolls until a stop heuristic fires (stagnation, over-scroll past
//! the requested window, completion estimate, or the scroll budget). The
//! official API path skips the heuristics and just follows pagination.
//!
//! ## Quick Start
//!
//! ```bash
//! # Scrape a library search and save the run document
//! adlens scrape --url 'https://www.facebook.com/ads/library/?...' \
//!     --output facebook_ads.json
//!
//! # Same through the official API
//! adlens api --token $TOKEN --page-id 42 --search-term probiotiques \
//!     --start-date 2025-01-01 --end-date 2025-12-31
//!
//! # Re-run the angle analysis on a stored document
//! adlens analyze facebook_ads.json --export summary.json
//! ```

/// Error type and result alias.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Core domain models: [`AdRecord`](domain::AdRecord),
/// [`CollectionResult`](domain::CollectionResult),
/// [`Query`](domain::Query) and the date window.
pub mod domain;

/// Ad-card date parsing: strict library format first, locale fallbacks
/// second, `None` on failure — a missing date never aborts a run.
pub mod dates;

/// Page Extractor: rendered page text → raw ad records.
pub mod extract;

/// Incremental collector: the scroll/extract/dedupe loop, its stop policy,
/// and the chromiumoxide-backed [`Page`](collector::Page) implementation.
pub mod collector;

/// Official Ads Archive API client (reqwest, follows `paging.next`).
pub mod api;

/// Angle Classifier: taxonomy-driven bucketing with exemplar retention.
pub mod angles;

/// Reporter: text rendering and the exportable summary.
pub mod report;

/// The persisted run document and its single (de)serialization boundary.
pub mod output;
