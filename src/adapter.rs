// ABOUTME: Fetch adapter boundary to the remote record provider
// ABOUTME: Includes a deterministic synthetic adapter for demos and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::SyncResult;
use crate::models::{
    AiInteractionEntry, Category, NutritionEntry, Record, RewardEntry, WorkoutEntry,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;

/// Boundary to the remote record provider.
///
/// Given a category, an adapter returns the current full record set; the
/// sync manager never inspects a failure beyond "it failed". Timeouts are a
/// policy the adapter may impose and are indistinguishable from any other
/// failure here.
#[async_trait]
pub trait FetchAdapter: Send + Sync {
    /// Fetch the current full record set for one category.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::FetchFailure` when the provider cannot be reached
    /// or rejects the request.
    async fn fetch_category(&self, category: Category) -> SyncResult<Vec<Record>>;
}

/// Deterministic mock record generator.
///
/// Produces the same records for the same category and count on every fetch,
/// which keeps demo dashboards stable across refreshes and makes test
/// assertions exact.
pub struct SyntheticAdapter {
    counts: HashMap<Category, usize>,
}

impl SyntheticAdapter {
    /// Adapter with the dashboard's default mock volumes
    /// (5 workouts, 3 meals, 2 AI interactions, 4 rewards).
    #[must_use]
    pub fn new() -> Self {
        Self::with_counts([
            (Category::Workouts, 5),
            (Category::Nutrition, 3),
            (Category::AiInteractions, 2),
            (Category::Rewards, 4),
        ])
    }

    /// Adapter producing a fixed record count per category.
    #[must_use]
    pub fn with_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (Category, usize)>,
    {
        Self {
            counts: counts.into_iter().collect(),
        }
    }

    fn generate(category: Category, index: usize) -> Record {
        // Records are spaced one hour apart, newest first, anchored to noon
        // of the current day so repeated fetches stay identical.
        let anchor = Utc::now()
            .date_naive()
            .and_hms_opt(12, 0, 0)
            .map_or_else(Utc::now, |naive| naive.and_utc());
        let recorded_at = anchor - Duration::hours(index as i64);
        let ordinal = index + 1;

        match category {
            Category::Workouts => Record::Workout(WorkoutEntry {
                id: format!("workout-{ordinal}"),
                name: format!("Training session {ordinal}"),
                sport: if index % 2 == 0 { "run" } else { "ride" }.to_owned(),
                recorded_at,
                duration_seconds: 1800 + (index as u64) * 300,
                distance_meters: Some(5000.0 + (index as f64) * 1250.0),
                calories: Some(300 + (index as u32) * 45),
                average_heart_rate: Some(138 + (index as u32) * 3),
            }),
            Category::Nutrition => Record::Nutrition(NutritionEntry {
                id: format!("meal-{ordinal}"),
                description: format!("Meal {ordinal}"),
                recorded_at,
                calories: 420 + (index as u32) * 110,
                protein_grams: Some(24.0 + (index as f64) * 6.0),
                carbs_grams: Some(48.0 + (index as f64) * 9.0),
                fat_grams: Some(14.0 + (index as f64) * 2.5),
            }),
            Category::AiInteractions => Record::AiInteraction(AiInteractionEntry {
                id: format!("interaction-{ordinal}"),
                recorded_at,
                prompt: format!("How was my session {ordinal}?"),
                response: format!(
                    "Session {ordinal} looked solid - keep your recovery day tomorrow."
                ),
                model: Some("wellness-coach-v1".to_owned()),
            }),
            Category::Rewards => Record::Reward(RewardEntry {
                id: format!("reward-{ordinal}"),
                recorded_at,
                title: format!("Milestone {ordinal}"),
                points: 25 * (ordinal as u32),
                reason: Some("Consistency streak".to_owned()),
            }),
        }
    }
}

impl Default for SyntheticAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FetchAdapter for SyntheticAdapter {
    async fn fetch_category(&self, category: Category) -> SyncResult<Vec<Record>> {
        let count = self.counts.get(&category).copied().unwrap_or(0);
        Ok((0..count)
            .map(|index| Self::generate(category, index))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_synthetic_counts_match_configuration() {
        let adapter = SyntheticAdapter::new();
        let workouts = adapter.fetch_category(Category::Workouts).await.unwrap();
        let meals = adapter.fetch_category(Category::Nutrition).await.unwrap();
        assert_eq!(workouts.len(), 5);
        assert_eq!(meals.len(), 3);
    }

    #[tokio::test]
    async fn test_synthetic_records_belong_to_requested_category() {
        let adapter = SyntheticAdapter::new();
        let rewards = adapter.fetch_category(Category::Rewards).await.unwrap();
        assert!(rewards
            .iter()
            .all(|record| record.category() == Category::Rewards));
    }

    #[tokio::test]
    async fn test_synthetic_ids_are_unique_within_category() {
        let adapter = SyntheticAdapter::new();
        let workouts = adapter.fetch_category(Category::Workouts).await.unwrap();
        let mut ids: Vec<&str> = workouts.iter().map(Record::id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), workouts.len());
    }
}
