//! Scroll-driven content reveal tracking.
//!
//! Thresholds are precomputed once per content set so the per-frame progress
//! query is a lookup plus two arithmetic ops. Reveal transitions are
//! one-shot: an id enters the revealed set exactly once per session.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a content item, owned by the content supplier.
pub type ContentId = Uuid;

/// A content item as supplied by the upstream content source. Only `id` and
/// `index` are read here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    pub index: usize,
}

/// Card geometry used to derive reveal thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CardLayout {
    pub card_height: f64,
    pub card_spacing: f64,
}

impl Default for CardLayout {
    fn default() -> Self {
        Self {
            card_height: 200.0,
            card_spacing: 16.0,
        }
    }
}

/// The scroll-offset window over which one item's reveal progresses 0 -> 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealThreshold {
    pub content_id: ContentId,
    /// Top of the card in scroll coordinates.
    pub start_offset: f64,
    /// Scroll distance required for full reveal.
    pub reveal_distance: f64,
    /// Offset at which the item is fully revealed.
    pub end_offset: f64,
}

impl RevealThreshold {
    pub fn new(content_id: ContentId, start_offset: f64, reveal_distance: f64) -> Self {
        Self {
            content_id,
            start_offset,
            reveal_distance,
            end_offset: start_offset + reveal_distance,
        }
    }

    /// Reveal progress in [0, 1] for a scroll offset. Offsets may be
    /// negative (hosts that report content offset as negative-y).
    pub fn progress(&self, scroll_offset: f64) -> f64 {
        let scrolled_past = (scroll_offset.abs() - self.start_offset).max(0.0);
        (scrolled_past / self.reveal_distance).clamp(0.0, 1.0)
    }
}

/// Progressive difficulty: early items reveal with less scrolling.
fn reveal_distance_for_index(index: usize) -> f64 {
    match index {
        0..=2 => 50.0,
        3..=5 => 100.0,
        _ => 150.0,
    }
}

/// Maps content items to reveal thresholds and tracks which items have been
/// fully revealed this session.
#[derive(Debug, Clone, Default)]
pub struct RevealTracker {
    layout: CardLayout,
    thresholds: HashMap<ContentId, RevealThreshold>,
    revealed: HashSet<ContentId>,
    progress_by_id: HashMap<ContentId, f64>,
    item_count: usize,
}

impl RevealTracker {
    pub fn new() -> Self {
        Self::with_layout(CardLayout::default())
    }

    pub fn with_layout(layout: CardLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Recompute thresholds wholesale for a new content set. Idempotent:
    /// previous thresholds are discarded, not merged.
    pub fn setup(&mut self, items: &[ContentItem]) {
        self.thresholds.clear();
        self.item_count = items.len();

        for item in items {
            let start = item.index as f64 * (self.layout.card_height + self.layout.card_spacing);
            self.thresholds.insert(
                item.id,
                RevealThreshold::new(item.id, start, reveal_distance_for_index(item.index)),
            );
        }
    }

    /// Compute reveal progress for one item at the given scroll offset and
    /// cache it. Returns the progress plus whether this call crossed the
    /// full-reveal boundary for the first time.
    ///
    /// Unknown ids yield 0.0 with no side effect.
    pub fn progress(&mut self, id: ContentId, scroll_offset: f64) -> (f64, bool) {
        let Some(threshold) = self.thresholds.get(&id) else {
            return (0.0, false);
        };

        let progress = threshold.progress(scroll_offset);
        self.progress_by_id.insert(id, progress);

        let newly_revealed = progress >= 1.0 && self.revealed.insert(id);
        (progress, newly_revealed)
    }

    /// Last computed progress for an item, without recomputing.
    pub fn cached_progress(&self, id: ContentId) -> f64 {
        self.progress_by_id.get(&id).copied().unwrap_or(0.0)
    }

    pub fn is_revealed(&self, id: ContentId) -> bool {
        self.revealed.contains(&id)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    /// Share of the supplied content set revealed so far, 0 when empty.
    pub fn overall_progress(&self) -> f64 {
        if self.item_count == 0 {
            return 0.0;
        }
        self.revealed.len() as f64 / self.item_count as f64
    }

    pub fn threshold(&self, id: ContentId) -> Option<&RevealThreshold> {
        self.thresholds.get(&id)
    }

    /// Clear reveal state and thresholds.
    pub fn reset(&mut self) {
        self.thresholds.clear();
        self.revealed.clear();
        self.progress_by_id.clear();
        self.item_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<ContentItem> {
        (0..n)
            .map(|index| ContentItem {
                id: Uuid::new_v4(),
                index,
            })
            .collect()
    }

    #[test]
    fn test_threshold_geometry() {
        let mut tracker = RevealTracker::new();
        let items = items(8);
        tracker.setup(&items);

        let t0 = tracker.threshold(items[0].id).unwrap();
        assert_eq!(t0.start_offset, 0.0);
        assert_eq!(t0.reveal_distance, 50.0);
        assert_eq!(t0.end_offset, 50.0);

        // index 4: 4 * (200 + 16) = 864, medium difficulty
        let t4 = tracker.threshold(items[4].id).unwrap();
        assert_eq!(t4.start_offset, 864.0);
        assert_eq!(t4.reveal_distance, 100.0);

        let t7 = tracker.threshold(items[7].id).unwrap();
        assert_eq!(t7.reveal_distance, 150.0);
    }

    #[test]
    fn test_progress_clamps_to_unit_interval() {
        let threshold = RevealThreshold::new(Uuid::new_v4(), 100.0, 50.0);
        assert_eq!(threshold.progress(0.0), 0.0);
        assert_eq!(threshold.progress(100.0), 0.0);
        assert_eq!(threshold.progress(125.0), 0.5);
        assert_eq!(threshold.progress(150.0), 1.0);
        assert_eq!(threshold.progress(10_000.0), 1.0);
    }

    #[test]
    fn test_negative_offsets_treated_by_magnitude() {
        let threshold = RevealThreshold::new(Uuid::new_v4(), 100.0, 50.0);
        assert_eq!(threshold.progress(-125.0), 0.5);
    }

    #[test]
    fn test_reveal_fires_exactly_once() {
        let mut tracker = RevealTracker::new();
        let items = items(3);
        tracker.setup(&items);

        let (p, first) = tracker.progress(items[0].id, 60.0);
        assert_eq!(p, 1.0);
        assert!(first);

        let (p, again) = tracker.progress(items[0].id, 60.0);
        assert_eq!(p, 1.0);
        assert!(!again);
        assert!(tracker.is_revealed(items[0].id));
        assert_eq!(tracker.revealed_count(), 1);
    }

    #[test]
    fn test_unknown_id_is_zero_progress_no_side_effect() {
        let mut tracker = RevealTracker::new();
        tracker.setup(&items(2));
        let (p, revealed) = tracker.progress(Uuid::new_v4(), 1_000_000.0);
        assert_eq!(p, 0.0);
        assert!(!revealed);
        assert_eq!(tracker.revealed_count(), 0);
    }

    #[test]
    fn test_setup_replaces_thresholds_wholesale() {
        let mut tracker = RevealTracker::new();
        let first = items(5);
        tracker.setup(&first);
        let second = items(2);
        tracker.setup(&second);

        assert!(tracker.threshold(first[4].id).is_none());
        assert!(tracker.threshold(second[0].id).is_some());
        assert_eq!(tracker.overall_progress(), 0.0);
    }

    #[test]
    fn test_overall_progress() {
        let mut tracker = RevealTracker::new();
        let items = items(4);
        tracker.setup(&items);
        tracker.progress(items[0].id, 60.0);
        tracker.progress(items[1].id, 300.0);
        assert_eq!(tracker.overall_progress(), 0.5);
    }
}
