//! Timeline Content Store
//!
//! Ten logical tables: one shared warm-up pool plus one table per
//! condition and time window. All of it is loaded at startup and served
//! read-only; requests never touch the filesystem. Selection policy is
//! phase-specific: warm-up content is sampled fresh on every call so
//! repeated warm-ups stay novel, window content is served complete and in
//! file order so every participant in a condition sees the same feed.

use std::path::Path;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::info;

use stressline_common::db::{Condition, TimeWindow};

pub mod clean;
pub mod loader;

pub use clean::clean_text_line;

/// Warm-up responses are capped at this many items per call.
pub const WARMUP_SAMPLE_SIZE: usize = 50;

/// Source file for the shared warm-up pool (legacy `Sentence` column).
pub const WARMUP_SOURCE: &str = "wrime-ver1_converted.csv";

/// Source files per condition, in time-window order.
const CONDITION_SOURCES: [[&str; 3]; 3] = [
    [
        "stress_timeline_weak_0-5min_p50.csv",
        "stress_timeline_weak_5-10min_p69_3.csv",
        "stress_timeline_weak_10-15min_p70.csv",
    ],
    [
        "stress_timeline_mid_0-5min_p30.csv",
        "stress_timeline_mid_5-10min_p38.csv",
        "stress_timeline_mid_10-15min_p52_8.csv",
    ],
    [
        "stress_timeline_strong_0-5min_p10.csv",
        "stress_timeline_strong_5-10min_p16_9.csv",
        "stress_timeline_strong_10-15min_p27_2.csv",
    ],
];

/// One piece of timeline text, immutable once loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub text: String,
}

/// All timeline content, stratified by condition and time window
#[derive(Debug, Default)]
pub struct ContentCatalog {
    warmup: Vec<ContentItem>,
    tables: [[Vec<ContentItem>; 3]; 3],
}

impl ContentCatalog {
    /// Load every table from under `root`. Tables that cannot be loaded
    /// degrade to empty sequences; loading itself never fails.
    pub fn load(root: &Path) -> Self {
        let warmup = loader::load_table(root, WARMUP_SOURCE).into_items(WARMUP_SOURCE);

        let mut tables: [[Vec<ContentItem>; 3]; 3] = Default::default();
        for condition in Condition::ALL {
            for window in TimeWindow::ALL {
                let file = CONDITION_SOURCES[condition.index()][window.index()];
                tables[condition.index()][window.index()] =
                    loader::load_table(root, file).into_items(file);
            }
        }

        let catalog = Self { warmup, tables };
        info!(
            "content catalog ready: warmup={}, weak={}/{}/{}, mid={}/{}/{}, strong={}/{}/{}",
            catalog.warmup.len(),
            catalog.tables[0][0].len(),
            catalog.tables[0][1].len(),
            catalog.tables[0][2].len(),
            catalog.tables[1][0].len(),
            catalog.tables[1][1].len(),
            catalog.tables[1][2].len(),
            catalog.tables[2][0].len(),
            catalog.tables[2][1].len(),
            catalog.tables[2][2].len(),
        );
        catalog
    }

    /// An empty catalog; every lookup returns no content.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve a (condition, phase) pair to content.
    ///
    /// `warmup` ignores the condition and samples the shared pool.
    /// Timeline windows return the full stored sequence in load order.
    /// Anything unknown, including the `pre` checkpoint which has no
    /// timeline, resolves to an empty sequence rather than an error.
    pub fn get_posts(&self, condition: Option<&str>, phase: &str) -> Vec<ContentItem> {
        if phase == "warmup" {
            return self.sample_warmup();
        }

        let Some(condition) = condition.and_then(Condition::from_str) else {
            return Vec::new();
        };
        let Some(window) = TimeWindow::from_str(phase) else {
            return Vec::new();
        };

        self.window_posts(condition, window).to_vec()
    }

    /// The full fixed-order sequence for one condition and window.
    pub fn window_posts(&self, condition: Condition, window: TimeWindow) -> &[ContentItem] {
        &self.tables[condition.index()][window.index()]
    }

    /// Random sample without replacement from the warm-up pool, at most
    /// `WARMUP_SAMPLE_SIZE` items. Intentionally different on every call.
    fn sample_warmup(&self) -> Vec<ContentItem> {
        let amount = WARMUP_SAMPLE_SIZE.min(self.warmup.len());
        let mut rng = rand::thread_rng();
        self.warmup
            .choose_multiple(&mut rng, amount)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(texts: &[&str]) -> Vec<ContentItem> {
        texts
            .iter()
            .map(|t| ContentItem {
                text: t.to_string(),
            })
            .collect()
    }

    fn catalog_with_warmup(count: usize) -> ContentCatalog {
        ContentCatalog {
            warmup: (0..count)
                .map(|i| ContentItem {
                    text: format!("warmup {i}"),
                })
                .collect(),
            tables: Default::default(),
        }
    }

    #[test]
    fn test_window_posts_deterministic_and_ordered() {
        let mut catalog = ContentCatalog::empty();
        catalog.tables[Condition::Weak.index()][TimeWindow::Early.index()] =
            items(&["a", "b", "c"]);

        for _ in 0..5 {
            let posts = catalog.get_posts(Some("weak"), "0-5");
            assert_eq!(posts, items(&["a", "b", "c"]));
        }
    }

    #[test]
    fn test_unknown_condition_or_phase_yields_empty() {
        let mut catalog = ContentCatalog::empty();
        catalog.tables[Condition::Weak.index()][TimeWindow::Early.index()] = items(&["a"]);

        assert!(catalog.get_posts(Some("extreme"), "0-5").is_empty());
        assert!(catalog.get_posts(None, "0-5").is_empty());
        assert!(catalog.get_posts(Some("weak"), "7-12").is_empty());
        // pre has no timeline content
        assert!(catalog.get_posts(Some("weak"), "pre").is_empty());
    }

    #[test]
    fn test_warmup_sample_capped_and_unique() {
        let catalog = catalog_with_warmup(120);

        let sample = catalog.get_posts(None, "warmup");
        assert_eq!(sample.len(), WARMUP_SAMPLE_SIZE);

        let mut texts: Vec<&str> = sample.iter().map(|i| i.text.as_str()).collect();
        texts.sort_unstable();
        texts.dedup();
        assert_eq!(texts.len(), WARMUP_SAMPLE_SIZE, "sample must not repeat items");
    }

    #[test]
    fn test_warmup_sample_smaller_pool_returns_all() {
        let catalog = catalog_with_warmup(7);
        assert_eq!(catalog.get_posts(Some("weak"), "warmup").len(), 7);
    }

    #[test]
    fn test_warmup_sample_empty_pool() {
        let catalog = ContentCatalog::empty();
        assert!(catalog.get_posts(None, "warmup").is_empty());
    }

    #[test]
    fn test_warmup_ignores_condition() {
        let catalog = catalog_with_warmup(3);
        assert_eq!(catalog.get_posts(Some("strong"), "warmup").len(), 3);
        assert_eq!(catalog.get_posts(None, "warmup").len(), 3);
    }
}
