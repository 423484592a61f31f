//! Incremental collector: drives extract → dedupe → window-filter →
//! accumulate cycles against a lazily rendered results feed.
//!
//! The feed only materializes cards as the page scrolls, so the collector
//! alternates extraction with scroll requests until one of its stop
//! conditions fires. Stop conditions are an independent policy, checked
//! every cycle; whichever fires first ends the run and none is an error.

mod chrome;
mod config;

pub use chrome::ChromePage;
pub use config::CollectorConfig;

use std::time::Duration;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{CollectionResult, DateWindow};
use crate::extract;

/// Pause between retries of a failed page read.
const RETRY_PAUSE: Duration = Duration::from_millis(500);

/// Rendering collaborator seam. Implemented over a real browser by
/// [`ChromePage`]; tests substitute fakes.
#[async_trait]
pub trait Page: Send + Sync {
    /// Full visible text of the current rendering state.
    async fn inner_text(&self) -> Result<String>;

    /// Advance the feed by roughly two viewport heights.
    async fn scroll_by_viewport(&self) -> Result<()>;
}

/// Why a collection run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    /// Scrolling stopped growing the visible DOM.
    Stagnation,
    /// A single pass surfaced enough before-window records: the requested
    /// window has been scrolled past.
    OverScroll,
    /// Accumulated enough of the advertiser-reported total.
    Completion,
}

/// Counts for one extract/ingest pass.
#[derive(Debug, Default, Clone, Copy)]
struct Pass {
    candidates: usize,
    new_in_window: usize,
    before_window: u64,
}

pub struct Collector {
    config: CollectorConfig,
}

impl Collector {
    pub fn new(config: CollectorConfig) -> Self {
        Self { config }
    }

    /// Run the collection loop against an already-navigated page.
    ///
    /// Never returns `Err`: a collaborator failure (after bounded retries)
    /// is recorded on the result and everything accumulated so far is
    /// returned with it, not discarded.
    pub async fn collect(&self, page: &dyn Page, window: DateWindow) -> CollectionResult {
        let mut result = CollectionResult::new();
        let mut stagnation: u32 = 0;

        // The initial render is already a page of results: extract it
        // before the first scroll, and read the advertiser's total from it.
        let text = match self.read_with_retry(page).await {
            Ok(text) => text,
            Err(e) => {
                result.error = Some(e.to_string());
                return result;
            }
        };
        result.expected_total = extract::extract_expected_total(&text);
        tracing::info!(expected_total = result.expected_total, "collection started");

        let pass = ingest(&text, &window, &mut result);
        let mut previous_candidates = pass.candidates;
        if let Some(reason) = self.check_stop(&pass, &result, stagnation) {
            tracing::info!(?reason, total = result.len(), "stopping before first scroll");
            return result;
        }

        for scroll_num in 0..self.config.max_scrolls {
            if let Err(e) = page.scroll_by_viewport().await {
                tracing::error!(error = %e, "scroll failed, returning partial results");
                result.error = Some(e.to_string());
                return result;
            }
            result.scrolls_performed += 1;
            tokio::time::sleep(self.config.scroll_pause()).await;

            let text = match self.read_with_retry(page).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(error = %e, "page read failed, returning partial results");
                    result.error = Some(e.to_string());
                    return result;
                }
            };

            let pass = ingest(&text, &window, &mut result);
            tracing::info!(
                scroll = scroll_num + 1,
                candidates = pass.candidates,
                new = pass.new_in_window,
                before_window = pass.before_window,
                total = result.len(),
                "scroll cycle"
            );

            // Stagnation tracks the visible candidate count, not the
            // accumulator: cards that stop appearing mean the DOM stopped
            // growing even when nothing new was in window.
            if pass.candidates == previous_candidates {
                stagnation += 1;
            } else {
                stagnation = 0;
            }
            previous_candidates = pass.candidates;

            if let Some(reason) = self.check_stop(&pass, &result, stagnation) {
                tracing::info!(?reason, total = result.len(), "collection stopped");
                return result;
            }
        }

        tracing::info!(total = result.len(), "scroll budget exhausted");
        result
    }

    /// Independent stop heuristics, logical OR.
    fn check_stop(
        &self,
        pass: &Pass,
        result: &CollectionResult,
        stagnation: u32,
    ) -> Option<StopReason> {
        if stagnation >= self.config.stagnation_threshold {
            return Some(StopReason::Stagnation);
        }
        if pass.before_window >= self.config.out_of_range_limit {
            return Some(StopReason::OverScroll);
        }
        if result.expected_total > 0
            && result.len() as f64 >= result.expected_total as f64 * self.config.completion_ratio
        {
            return Some(StopReason::Completion);
        }
        None
    }

    /// Read the page text, retrying transient collaborator failures a
    /// bounded number of times before giving up.
    async fn read_with_retry(&self, page: &dyn Page) -> Result<String> {
        let mut attempt = 0;
        loop {
            match page.inner_text().await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(error = %e, attempt, "page read failed, retrying");
                    tokio::time::sleep(RETRY_PAUSE).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Extract the current rendering state and fold new records into the
/// accumulator.
///
/// Candidates partition into: already-known ids (skipped), new records in
/// or before the window, and new records past the window end (dropped —
/// the feed is newest-first, so those were filtered out by the query and
/// carry no scroll-position signal). Undated records count as in-window:
/// absence of a date is valid and must not shrink the collection.
fn ingest(text: &str, window: &DateWindow, result: &mut CollectionResult) -> Pass {
    let candidates = extract::extract_ads(text);
    let mut pass = Pass {
        candidates: candidates.len(),
        ..Pass::default()
    };

    for ad in candidates {
        if result.is_known(&ad.id) {
            continue;
        }
        match ad.date_start {
            Some(date) if date < window.start => {
                pass.before_window += 1;
            }
            Some(date) if date > window.end => {}
            _ => {
                if result.insert(ad) {
                    pass.new_in_window += 1;
                }
            }
        }
    }

    result.out_of_range_count += pass.before_window;
    pass
}
