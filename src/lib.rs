// ABOUTME: Data synchronization manager for the Vitals wellness dashboard
// ABOUTME: Multi-category record sync with request coalescing, realtime polling, and a typed event bus
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Vitals Sync
//!
//! In-memory synchronization and caching discipline for a wellness dashboard:
//! four record categories (workouts, nutrition, AI interactions, rewards)
//! kept consistent between on-demand sync and an optional continuous realtime
//! (polling) mode, observed by independent UI surfaces through a typed event
//! bus - no polling by consumers, no coupling between them.
//!
//! The [`manager::SyncManager`] is the orchestrator: it coalesces concurrent
//! sync requests per category, isolates one category's failure from
//! another's success, and owns all externally observable event ordering
//! (`CategoryUpdated` always precedes the matching `SyncCompleted`).
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vitals_sync::adapter::SyntheticAdapter;
//! use vitals_sync::config::SyncConfig;
//! use vitals_sync::events::{EventSelector, SyncEvent};
//! use vitals_sync::manager::SyncManager;
//! use vitals_sync::models::Category;
//!
//! # async fn example() {
//! let manager = SyncManager::new(Arc::new(SyntheticAdapter::new()));
//!
//! // A dashboard tab subscribes at mount and unsubscribes at teardown.
//! let handle = manager.subscribe(
//!     EventSelector::Category(Category::Workouts),
//!     |event| {
//!         if let SyncEvent::CategoryUpdated { category } = event {
//!             println!("refresh the {category} tab");
//!         }
//!         Ok(())
//!     },
//! );
//!
//! // One manual pull across every category...
//! let batch = manager.sync_all().await;
//! assert!(batch.success);
//!
//! // ...or continuous refresh at the configured cadence until the user
//! // turns it off (VITALS_SYNC_REALTIME_INTERVAL_MS overrides the default).
//! let config = SyncConfig::from_env();
//! manager.enable_realtime(config.realtime_interval);
//! manager.disable_realtime();
//!
//! manager.unsubscribe(handle);
//! # }
//! ```

/// Fetch adapter boundary and the synthetic mock adapter
pub mod adapter;
/// Environment-driven configuration
pub mod config;
/// Error taxonomy
pub mod errors;
/// Typed publish/subscribe event bus
pub mod events;
/// Structured logging setup
pub mod logging;
/// Domain models: categories, records, per-category state
pub mod models;
/// Realtime polling scheduler
pub mod scheduler;
/// In-memory per-category store
pub mod store;

/// Core sync orchestrator
pub mod manager;

pub use adapter::{FetchAdapter, SyntheticAdapter};
pub use config::SyncConfig;
pub use errors::{SyncError, SyncResult};
pub use events::{EventBus, EventKind, EventSelector, SubscriptionHandle, SyncEvent};
pub use manager::{BatchOutcome, SyncManager, SyncOutcome};
pub use models::{Category, CategoryState, CategorySummary, Record, SyncStatus};
pub use scheduler::RealtimeScheduler;
pub use store::CategoryStore;
