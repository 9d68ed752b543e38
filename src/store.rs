// ABOUTME: In-memory per-category store holding cached records and sync bookkeeping
// ABOUTME: Pure data holder; event ordering belongs to the sync manager, never to the store
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::models::{Category, CategoryState, CategorySummary, Record, SyncStatus};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Cached state for every category.
///
/// Reads are synchronous clone snapshots so UI surfaces never await to render.
/// All mutation goes through the sync manager; the store itself publishes
/// nothing.
pub struct CategoryStore {
    states: RwLock<HashMap<Category, CategoryState>>,
}

impl CategoryStore {
    /// Store with an idle, empty state for every known category.
    #[must_use]
    pub fn new() -> Self {
        let states = Category::ALL
            .iter()
            .map(|&category| (category, CategoryState::new(category)))
            .collect();
        Self {
            states: RwLock::new(states),
        }
    }

    /// Snapshot of one category's state. Never fails.
    #[must_use]
    pub fn get(&self, category: Category) -> CategoryState {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&category)
            .cloned()
            .unwrap_or_else(|| CategoryState::new(category))
    }

    /// Atomically swap a category's record set and sync timestamp.
    ///
    /// Status is left to the caller; the sync manager decides when a replace
    /// also means the category is idle again.
    pub fn replace(&self, category: Category, records: Vec<Record>, synced_at: DateTime<Utc>) {
        let mut states = self.states.write().unwrap_or_else(PoisonError::into_inner);
        let state = states
            .entry(category)
            .or_insert_with(|| CategoryState::new(category));
        state.records = records;
        state.last_synced_at = Some(synced_at);
    }

    /// Set a category's sync status.
    ///
    /// Returning to `Idle` marks the last sync attempt as resolved and clears
    /// any recorded error.
    pub fn set_status(&self, category: Category, status: SyncStatus) {
        let mut states = self.states.write().unwrap_or_else(PoisonError::into_inner);
        let state = states
            .entry(category)
            .or_insert_with(|| CategoryState::new(category));
        state.status = status;
        if status == SyncStatus::Idle {
            state.last_error = None;
        }
    }

    /// Record a failed sync attempt without touching cached records.
    pub fn set_error(&self, category: Category, message: String) {
        let mut states = self.states.write().unwrap_or_else(PoisonError::into_inner);
        let state = states
            .entry(category)
            .or_insert_with(|| CategoryState::new(category));
        state.status = SyncStatus::Error;
        state.last_error = Some(message);
    }

    /// When one category last synced successfully, if ever.
    #[must_use]
    pub fn last_synced_at(&self, category: Category) -> Option<DateTime<Utc>> {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&category)
            .and_then(|state| state.last_synced_at)
    }

    /// Oldest successful sync timestamp across all categories.
    ///
    /// `None` when any category has never synced, so a "last verified"
    /// indicator built on this never overstates freshness.
    #[must_use]
    pub fn oldest_synced_at(&self) -> Option<DateTime<Utc>> {
        let states = self.states.read().unwrap_or_else(PoisonError::into_inner);
        let mut oldest: Option<DateTime<Utc>> = None;
        for category in Category::ALL {
            match states.get(&category).and_then(|state| state.last_synced_at) {
                None => return None,
                Some(ts) => {
                    oldest = Some(oldest.map_or(ts, |current| current.min(ts)));
                }
            }
        }
        oldest
    }

    /// Per-category overviews for summary cards, in canonical category order.
    #[must_use]
    pub fn summaries(&self) -> Vec<CategorySummary> {
        let states = self.states.read().unwrap_or_else(PoisonError::into_inner);
        Category::ALL
            .iter()
            .map(|&category| {
                let state = states
                    .get(&category)
                    .cloned()
                    .unwrap_or_else(|| CategoryState::new(category));
                CategorySummary {
                    category,
                    record_count: state.records.len(),
                    status: state.status,
                    last_synced_at: state.last_synced_at,
                }
            })
            .collect()
    }
}

impl Default for CategoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutEntry;

    fn workout(id: &str) -> Record {
        Record::Workout(WorkoutEntry {
            id: id.to_owned(),
            name: "Morning run".to_owned(),
            sport: "run".to_owned(),
            recorded_at: Utc::now(),
            duration_seconds: 1800,
            distance_meters: Some(5000.0),
            calories: Some(320),
            average_heart_rate: None,
        })
    }

    #[test]
    fn test_replace_swaps_records_and_timestamp() {
        let store = CategoryStore::new();
        let synced_at = Utc::now();
        store.replace(Category::Workouts, vec![workout("w1"), workout("w2")], synced_at);

        let state = store.get(Category::Workouts);
        assert_eq!(state.records.len(), 2);
        assert_eq!(state.last_synced_at, Some(synced_at));
    }

    #[test]
    fn test_set_error_keeps_cached_records() {
        let store = CategoryStore::new();
        let synced_at = Utc::now();
        store.replace(Category::Workouts, vec![workout("w1")], synced_at);
        store.set_error(Category::Workouts, "provider unreachable".to_owned());

        let state = store.get(Category::Workouts);
        assert_eq!(state.status, SyncStatus::Error);
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.last_synced_at, Some(synced_at));
        assert_eq!(state.last_error.as_deref(), Some("provider unreachable"));
    }

    #[test]
    fn test_idle_clears_last_error() {
        let store = CategoryStore::new();
        store.set_error(Category::Nutrition, "timeout".to_owned());
        store.set_status(Category::Nutrition, SyncStatus::Idle);

        let state = store.get(Category::Nutrition);
        assert_eq!(state.status, SyncStatus::Idle);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_oldest_synced_at_requires_every_category() {
        let store = CategoryStore::new();
        assert!(store.oldest_synced_at().is_none());

        let now = Utc::now();
        for category in Category::ALL {
            store.replace(category, Vec::new(), now);
        }
        assert_eq!(store.oldest_synced_at(), Some(now));

        let earlier = now - chrono::Duration::minutes(10);
        store.replace(Category::Rewards, Vec::new(), earlier);
        assert_eq!(store.oldest_synced_at(), Some(earlier));
    }
}
