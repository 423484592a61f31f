use std::collections::HashSet;

use super::AdRecord;

/// Accumulated output of one collection run.
///
/// Grows monotonically while the collector iterates and is frozen when a
/// stop condition fires. Records are kept in discovery order and never
/// mutated after insertion.
#[derive(Debug, Default)]
pub struct CollectionResult {
    ads: Vec<AdRecord>,
    seen: HashSet<String>,
    /// Advertiser-reported result count, 0 when the page exposes none.
    pub expected_total: u64,
    /// Records observed whose start date precedes the requested window.
    pub out_of_range_count: u64,
    pub scrolls_performed: u32,
    /// Set when the run aborted mid-collection; accumulated records are
    /// preserved alongside it.
    pub error: Option<String>,
}

impl CollectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ads(&self) -> &[AdRecord] {
        &self.ads
    }

    pub fn into_ads(self) -> Vec<AdRecord> {
        self.ads
    }

    pub fn len(&self) -> usize {
        self.ads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ads.is_empty()
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Append a record unless its id was already accumulated.
    ///
    /// Returns true when the record was new.
    pub fn insert(&mut self, ad: AdRecord) -> bool {
        if self.seen.contains(&ad.id) {
            return false;
        }
        self.seen.insert(ad.id.clone());
        self.ads.push(ad);
        true
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}
