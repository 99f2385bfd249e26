//! Per-card view counters.
//!
//! Counts only ever move up. Cross-device reconciliation happens through
//! [`ViewCounterStore::set_if_higher`], which accepts a count carried in a
//! share URL or a share record and ignores it unless it beats the local one.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::store::{KvStore, namespaces};

/// Monotonic view counters keyed by card id.
#[derive(Clone)]
pub struct ViewCounterStore {
    store: Arc<dyn KvStore>,
}

fn parse_count(value: Option<&str>) -> u64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

impl ViewCounterStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Current count for `card_id`, or 0 when unknown or unreadable.
    pub fn get(&self, card_id: &str) -> u64 {
        match self.store.get(namespaces::VIEW_COUNTS, card_id) {
            Ok(value) => parse_count(value.as_deref()),
            Err(e) => {
                tracing::warn!(card_id, error = %e, "failed to read view count");
                0
            }
        }
    }

    /// Add one view and return the new count.
    ///
    /// If the write fails the would-be count is still returned so the page
    /// can render; the view is simply not persisted.
    pub fn increment(&self, card_id: &str) -> u64 {
        let result = self
            .store
            .update(namespaces::VIEW_COUNTS, card_id, &mut |current| {
                Some(parse_count(current).saturating_add(1).to_string())
            });

        match result {
            Ok(after) => parse_count(after.as_deref()),
            Err(e) => {
                tracing::warn!(card_id, error = %e, "failed to persist view count");
                self.get(card_id).saturating_add(1)
            }
        }
    }

    /// Raise the stored count to `candidate` if it is strictly higher.
    ///
    /// Returns the count held afterwards.
    pub fn set_if_higher(&self, card_id: &str, candidate: u64) -> u64 {
        let result = self
            .store
            .update(namespaces::VIEW_COUNTS, card_id, &mut |current| {
                (candidate > parse_count(current)).then(|| candidate.to_string())
            });

        match result {
            Ok(after) => parse_count(after.as_deref()),
            Err(e) => {
                tracing::warn!(card_id, candidate, error = %e, "failed to merge view count");
                0
            }
        }
    }

    /// Snapshot of every counter. Advisory only.
    pub fn get_all(&self) -> BTreeMap<String, u64> {
        match self.store.entries(namespaces::VIEW_COUNTS) {
            Ok(entries) => entries
                .into_iter()
                .map(|(id, value)| {
                    let count = parse_count(Some(&value));
                    (id, count)
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to list view counts");
                BTreeMap::new()
            }
        }
    }

    /// Most-viewed cards, highest first. Ties are ordered by card id.
    pub fn leaderboard(&self, limit: usize) -> Vec<(String, u64)> {
        let mut counts: Vec<_> = self.get_all().into_iter().collect();
        counts.sort_by(|(a_id, a), (b_id, b)| b.cmp(a).then_with(|| a_id.cmp(b_id)));
        counts.truncate(limit);
        counts
    }

    /// Sum of all counters.
    pub fn total(&self) -> u64 {
        self.get_all()
            .values()
            .fold(0u64, |acc, n| acc.saturating_add(*n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::store::testing::FailingStore;

    fn counters() -> ViewCounterStore {
        ViewCounterStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_unknown_is_zero() {
        assert_eq!(counters().get("nope"), 0);
    }

    #[test]
    fn test_increment_accuracy() {
        let counters = counters();
        for expected in 1..=25 {
            assert_eq!(counters.increment("c1"), expected);
        }
        assert_eq!(counters.get("c1"), 25);
        assert_eq!(counters.get("c2"), 0);
    }

    #[test]
    fn test_set_if_higher_is_monotonic() {
        let counters = counters();
        assert_eq!(counters.set_if_higher("c1", 5), 5);
        assert_eq!(counters.set_if_higher("c1", 3), 5);
        assert_eq!(counters.set_if_higher("c1", 5), 5);
        assert_eq!(counters.get("c1"), 5);
        assert_eq!(counters.set_if_higher("c1", 9), 9);
        assert_eq!(counters.increment("c1"), 10);
    }

    #[test]
    fn test_set_if_higher_zero_does_not_create() {
        let store = Arc::new(MemoryStore::new());
        let counters = ViewCounterStore::new(store.clone());
        assert_eq!(counters.set_if_higher("c1", 0), 0);
        assert_eq!(store.get(namespaces::VIEW_COUNTS, "c1").unwrap(), None);
    }

    #[test]
    fn test_garbage_value_reads_as_zero() {
        let store = Arc::new(MemoryStore::new());
        store.set(namespaces::VIEW_COUNTS, "c1", "lots").unwrap();
        let counters = ViewCounterStore::new(store);
        assert_eq!(counters.get("c1"), 0);
        assert_eq!(counters.increment("c1"), 1);
    }

    #[test]
    fn test_leaderboard_and_total() {
        let counters = counters();
        counters.set_if_higher("a", 3);
        counters.set_if_higher("b", 7);
        counters.set_if_higher("c", 3);
        counters.set_if_higher("d", 1);

        assert_eq!(
            counters.leaderboard(3),
            vec![
                ("b".to_string(), 7),
                ("a".to_string(), 3),
                ("c".to_string(), 3)
            ]
        );
        assert_eq!(counters.total(), 14);
        assert_eq!(counters.get_all().len(), 4);
    }

    #[test]
    fn test_failing_store_degrades() {
        let counters = ViewCounterStore::new(Arc::new(FailingStore));
        assert_eq!(counters.get("c1"), 0);
        assert_eq!(counters.increment("c1"), 1);
        assert_eq!(counters.set_if_higher("c1", 4), 0);
        assert!(counters.get_all().is_empty());
        assert_eq!(counters.total(), 0);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let counters = counters();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counters = counters.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        counters.increment("hot");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(counters.get("hot"), 400);
    }
}
