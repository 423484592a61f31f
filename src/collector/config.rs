use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the incremental collector and its browser page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Hard iteration budget: maximum scroll/extract cycles (default: 50)
    pub max_scrolls: u32,

    /// Pause between a scroll and the next extraction in milliseconds
    /// (default: 2500)
    pub scroll_pause_ms: u64,

    /// Settle time after initial navigation in milliseconds (default: 4000)
    pub settle_after_load_ms: u64,

    /// Consecutive no-growth extractions before stopping (default: 3)
    pub stagnation_threshold: u32,

    /// Before-window records in a single iteration that end the run
    /// (default: 5)
    pub out_of_range_limit: u64,

    /// Stop once accumulated count reaches this share of the advertiser's
    /// reported total, when a total is known (default: 0.9)
    pub completion_ratio: f64,

    /// Retries per page read before aborting the run (default: 2)
    pub max_retries: u32,

    /// Navigation timeout in seconds (default: 60)
    pub timeout_secs: u64,

    /// Browser viewport, width x height (default: 1920x1080)
    pub viewport: (u32, u32),

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            headless: true,
            max_scrolls: 50,
            scroll_pause_ms: 2500,
            settle_after_load_ms: 4000,
            stagnation_threshold: 3,
            out_of_range_limit: 5,
            completion_ratio: 0.9,
            max_retries: 2,
            timeout_secs: 60,
            viewport: (1920, 1080),
            user_agent: Some(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36".to_string(),
            ),
        }
    }
}

impl CollectorConfig {
    pub fn scroll_pause(&self) -> Duration {
        Duration::from_millis(self.scroll_pause_ms)
    }

    pub fn settle_after_load(&self) -> Duration {
        Duration::from_millis(self.settle_after_load_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Short pauses and a small budget, for quick exploratory runs.
    pub fn fast() -> Self {
        Self {
            max_scrolls: 15,
            scroll_pause_ms: 1000,
            settle_after_load_ms: 2000,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = CollectorConfig::default();
        assert!(config.headless);
        assert_eq!(config.max_scrolls, 50);
        assert_eq!(config.stagnation_threshold, 3);
        assert_eq!(config.out_of_range_limit, 5);
        assert!((config.completion_ratio - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.viewport, (1920, 1080));
    }

    #[test]
    fn test_fast_preset_inherits_defaults() {
        let config = CollectorConfig::fast();
        assert_eq!(config.max_scrolls, 15);
        assert_eq!(config.scroll_pause(), Duration::from_millis(1000));
        // Stop policy is unchanged by the preset.
        assert_eq!(config.stagnation_threshold, 3);
        assert_eq!(config.out_of_range_limit, 5);
    }

    #[test]
    fn test_durations() {
        let config = CollectorConfig::default();
        assert_eq!(config.scroll_pause(), Duration::from_millis(2500));
        assert_eq!(config.settle_after_load(), Duration::from_millis(4000));
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }
}
