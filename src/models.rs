// ABOUTME: Domain models for synchronized dashboard data across record categories
// ABOUTME: Defines Category, per-category Record payloads, and the per-category sync state
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed partition of the record space.
///
/// The set of categories is closed and known at compile time; every cached
/// record, sync operation, and update event is scoped to exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Workout and activity logs
    Workouts,
    /// Food and nutrition entries
    Nutrition,
    /// AI coach interactions (prompt/response pairs)
    AiInteractions,
    /// Reward grants earned through app engagement
    Rewards,
}

impl Category {
    /// Every known category, in canonical sync order.
    pub const ALL: [Self; 4] = [
        Self::Workouts,
        Self::Nutrition,
        Self::AiInteractions,
        Self::Rewards,
    ];

    /// Canonical wire name for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Workouts => "workouts",
            Self::Nutrition => "nutrition",
            Self::AiInteractions => "ai-interactions",
            Self::Rewards => "rewards",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single logged workout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEntry {
    /// Stable identifier, unique within the workouts category
    pub id: String,
    /// Human-readable name/title of the workout
    pub name: String,
    /// Sport or activity type (run, ride, yoga, ...)
    pub sport: String,
    /// When the workout was recorded (UTC)
    pub recorded_at: DateTime<Utc>,
    /// Total duration in seconds
    pub duration_seconds: u64,
    /// Distance covered in meters, when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    /// Estimated calories burned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    /// Average heart rate during the session (BPM)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_heart_rate: Option<u32>,
}

/// A single logged food entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionEntry {
    /// Stable identifier, unique within the nutrition category
    pub id: String,
    /// What was eaten
    pub description: String,
    /// When the entry was logged (UTC)
    pub recorded_at: DateTime<Utc>,
    /// Total calories for the entry
    pub calories: u32,
    /// Protein content in grams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_grams: Option<f64>,
    /// Carbohydrate content in grams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs_grams: Option<f64>,
    /// Fat content in grams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat_grams: Option<f64>,
}

/// One exchange with the AI wellness coach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiInteractionEntry {
    /// Stable identifier, unique within the AI interactions category
    pub id: String,
    /// When the interaction happened (UTC)
    pub recorded_at: DateTime<Utc>,
    /// User prompt text
    pub prompt: String,
    /// Coach response text
    pub response: String,
    /// Model that produced the response, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// A reward granted for app engagement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardEntry {
    /// Stable identifier, unique within the rewards category
    pub id: String,
    /// When the reward was granted (UTC)
    pub recorded_at: DateTime<Utc>,
    /// Reward title shown to the user
    pub title: String,
    /// Points awarded
    pub points: u32,
    /// Why the reward was granted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// One immutable entry within a category.
///
/// A sync replaces a category's whole record set rather than patching
/// individual records, so records never change after they are fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    /// Workout log entry
    Workout(WorkoutEntry),
    /// Food log entry
    Nutrition(NutritionEntry),
    /// AI coach interaction
    AiInteraction(AiInteractionEntry),
    /// Reward grant
    Reward(RewardEntry),
}

impl Record {
    /// Stable identifier, unique within the record's category.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Workout(entry) => &entry.id,
            Self::Nutrition(entry) => &entry.id,
            Self::AiInteraction(entry) => &entry.id,
            Self::Reward(entry) => &entry.id,
        }
    }

    /// When the record was produced (UTC).
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        match self {
            Self::Workout(entry) => entry.recorded_at,
            Self::Nutrition(entry) => entry.recorded_at,
            Self::AiInteraction(entry) => entry.recorded_at,
            Self::Reward(entry) => entry.recorded_at,
        }
    }

    /// Category this record belongs to.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Workout(_) => Category::Workouts,
            Self::Nutrition(_) => Category::Nutrition,
            Self::AiInteraction(_) => Category::AiInteractions,
            Self::Reward(_) => Category::Rewards,
        }
    }
}

/// Synchronization status of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// No sync in progress; cached data (if any) is the latest applied
    Idle,
    /// A sync for this category is in flight
    Syncing,
    /// The most recent sync attempt failed; cached data is stale but valid
    Error,
}

/// Cached state for one category.
///
/// Owned exclusively by the sync manager; consumers receive clone snapshots
/// and never mutate it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryState {
    /// Category this state belongs to
    pub category: Category,
    /// Last successfully applied record set
    pub records: Vec<Record>,
    /// When this category last synced successfully, if ever
    pub last_synced_at: Option<DateTime<Utc>>,
    /// Current sync status
    pub status: SyncStatus,
    /// Message from the most recent failed sync, if unresolved
    pub last_error: Option<String>,
}

impl CategoryState {
    /// Empty idle state for a category that has never synced.
    #[must_use]
    pub const fn new(category: Category) -> Self {
        Self {
            category,
            records: Vec::new(),
            last_synced_at: None,
            status: SyncStatus::Idle,
            last_error: None,
        }
    }
}

/// Lightweight per-category overview for summary cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Category being summarized
    pub category: Category,
    /// Number of cached records
    pub record_count: usize,
    /// Current sync status
    pub status: SyncStatus,
    /// When this category last synced successfully, if ever
    pub last_synced_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_names() {
        assert_eq!(Category::Workouts.as_str(), "workouts");
        assert_eq!(Category::AiInteractions.as_str(), "ai-interactions");
        assert_eq!(Category::ALL.len(), 4);
    }

    #[test]
    fn test_record_category_mapping() {
        let record = Record::Reward(RewardEntry {
            id: "reward-1".to_owned(),
            recorded_at: Utc::now(),
            title: "Streak".to_owned(),
            points: 50,
            reason: None,
        });
        assert_eq!(record.category(), Category::Rewards);
        assert_eq!(record.id(), "reward-1");
    }

    #[test]
    fn test_category_serde_kebab_case() {
        let json = serde_json::to_string(&Category::AiInteractions).unwrap();
        assert_eq!(json, "\"ai-interactions\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::AiInteractions);
    }

    #[test]
    fn test_new_category_state_is_idle_and_empty() {
        let state = CategoryState::new(Category::Nutrition);
        assert_eq!(state.status, SyncStatus::Idle);
        assert!(state.records.is_empty());
        assert!(state.last_synced_at.is_none());
        assert!(state.last_error.is_none());
    }
}
