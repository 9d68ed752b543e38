// ABOUTME: Core sync orchestrator - coalesced per-category syncs, batch fan-out, realtime mode
// ABOUTME: Owns all externally observable event ordering and the per-category sync state machine
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::adapter::FetchAdapter;
use crate::errors::SyncError;
use crate::events::{EventBus, EventSelector, SubscriptionHandle, SyncEvent};
use crate::models::{Category, CategoryState, CategorySummary, SyncStatus};
use crate::scheduler::{RealtimeScheduler, TickFn};
use crate::store::CategoryStore;
use chrono::{DateTime, Utc};
use futures_util::future::{join_all, BoxFuture, Shared};
use futures_util::FutureExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Result summary of one category sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Category that synced
    pub category: Category,
    /// Whether the fetch succeeded and the store was updated
    pub success: bool,
    /// Number of records applied (0 on failure)
    pub records: usize,
    /// Failure description when `success` is false
    pub error: Option<String>,
}

/// Result summary of a batch sync across every category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// False iff any category failed
    pub success: bool,
    /// Per-category outcomes in canonical category order
    pub outcomes: Vec<SyncOutcome>,
}

type InFlightSync = Shared<BoxFuture<'static, SyncOutcome>>;
type InFlightMap = Mutex<HashMap<Category, InFlightSync>>;

/// Orchestrates synchronization between the remote record provider and the
/// in-memory category store.
///
/// Cheap to clone; clones share the same store, bus, scheduler, and in-flight
/// bookkeeping. Construct one per dashboard session and inject it wherever a
/// surface needs data - there is no ambient singleton, so tests can run
/// independent managers side by side.
///
/// Per category the status cycles `Idle -> Syncing -> (Idle | Error) ->
/// Syncing -> ...` with no terminal state; the manager stays usable after any
/// single failure.
#[derive(Clone)]
pub struct SyncManager {
    store: Arc<CategoryStore>,
    bus: Arc<EventBus>,
    adapter: Arc<dyn FetchAdapter>,
    scheduler: Arc<RealtimeScheduler>,
    in_flight: Arc<InFlightMap>,
}

impl SyncManager {
    /// Manager over the given adapter, with every category idle and empty.
    #[must_use]
    pub fn new(adapter: Arc<dyn FetchAdapter>) -> Self {
        Self {
            store: Arc::new(CategoryStore::new()),
            bus: Arc::new(EventBus::new()),
            adapter,
            scheduler: Arc::new(RealtimeScheduler::new()),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Synchronous snapshot of one category's cached state.
    #[must_use]
    pub fn get_state(&self, category: Category) -> CategoryState {
        self.store.get(category)
    }

    /// Per-category overviews for summary cards.
    #[must_use]
    pub fn summaries(&self) -> Vec<CategorySummary> {
        self.store.summaries()
    }

    /// Register a listener for sync events. See [`EventBus::subscribe`].
    pub fn subscribe<F>(&self, selector: EventSelector, callback: F) -> SubscriptionHandle
    where
        F: Fn(&SyncEvent) -> Result<(), SyncError> + Send + Sync + 'static,
    {
        self.bus.subscribe(selector, callback)
    }

    /// Remove a listener registration; no-op when already removed.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.bus.unsubscribe(handle);
    }

    /// Sync one category, coalescing with any operation already in flight.
    ///
    /// Two overlapping calls for the same category await the same operation
    /// and the adapter is invoked exactly once, so an older fetch can never
    /// overwrite a newer one. On success the store is replaced and
    /// `CategoryUpdated` is published before `SyncCompleted{success: true}`.
    /// On failure cached records and timestamp are left untouched
    /// (stale-but-valid beats discarded) and only
    /// `SyncCompleted{success: false}` is published.
    pub async fn sync_category(&self, category: Category) -> SyncOutcome {
        let operation = {
            let mut in_flight = self
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(existing) = in_flight.get(&category) {
                existing.clone()
            } else {
                let fresh = Self::run_sync(
                    Arc::clone(&self.store),
                    Arc::clone(&self.bus),
                    Arc::clone(&self.adapter),
                    Arc::clone(&self.in_flight),
                    category,
                )
                .boxed()
                .shared();
                in_flight.insert(category, fresh.clone());
                fresh
            }
        };
        operation.await
    }

    async fn run_sync(
        store: Arc<CategoryStore>,
        bus: Arc<EventBus>,
        adapter: Arc<dyn FetchAdapter>,
        in_flight: Arc<InFlightMap>,
        category: Category,
    ) -> SyncOutcome {
        store.set_status(category, SyncStatus::Syncing);

        let outcome = match adapter.fetch_category(category).await {
            Ok(records) => {
                let applied = records.len();
                store.replace(category, records, Utc::now());
                store.set_status(category, SyncStatus::Idle);
                tracing::debug!(%category, records = applied, "category synced");
                bus.publish(&SyncEvent::CategoryUpdated { category });
                bus.publish(&SyncEvent::SyncCompleted {
                    success: true,
                    category: Some(category),
                });
                SyncOutcome {
                    category,
                    success: true,
                    records: applied,
                    error: None,
                }
            }
            Err(err) => {
                tracing::warn!(%category, "category sync failed: {err}");
                store.set_error(category, err.to_string());
                bus.publish(&SyncEvent::SyncCompleted {
                    success: false,
                    category: Some(category),
                });
                SyncOutcome {
                    category,
                    success: false,
                    records: 0,
                    error: Some(err.to_string()),
                }
            }
        };

        // Clear the coalescing entry so the next request starts fresh.
        in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&category);
        outcome
    }

    /// Sync every category concurrently.
    ///
    /// Categories are isolated: one failure neither blocks nor rolls back
    /// another's success. After all settle, one batch
    /// `SyncCompleted{category: None}` summary is published, with `success`
    /// false iff any category failed.
    pub async fn sync_all(&self) -> BatchOutcome {
        let outcomes = join_all(
            Category::ALL
                .iter()
                .map(|&category| self.sync_category(category)),
        )
        .await;
        let success = outcomes.iter().all(|outcome| outcome.success);
        self.bus.publish(&SyncEvent::SyncCompleted {
            success,
            category: None,
        });
        BatchOutcome { success, outcomes }
    }

    /// Enable realtime mode: a repeating batch sync every `interval`.
    ///
    /// Idempotent - a redundant call changes nothing and publishes nothing.
    /// On the genuine disabled-to-enabled transition the first pass runs
    /// immediately and `RealtimeStateChanged{enabled: true}` is published.
    pub fn enable_realtime(&self, interval: Duration) {
        let manager = self.clone();
        let tick: TickFn = Arc::new(move || {
            let manager = manager.clone();
            async move {
                let batch = manager.sync_all().await;
                if batch.success {
                    Ok(())
                } else {
                    let failed: Vec<&str> = batch
                        .outcomes
                        .iter()
                        .filter(|outcome| !outcome.success)
                        .map(|outcome| outcome.category.as_str())
                        .collect();
                    Err(SyncError::SchedulerMisfire {
                        message: format!("batch sync failed for: {}", failed.join(", ")),
                    })
                }
            }
            .boxed()
        });

        if self.scheduler.start(interval, tick) {
            tracing::info!(interval_ms = interval.as_millis() as u64, "realtime enabled");
            self.bus
                .publish(&SyncEvent::RealtimeStateChanged { enabled: true });
        }
    }

    /// Disable realtime mode.
    ///
    /// Idempotent; publishes `RealtimeStateChanged{enabled: false}` only on a
    /// genuine transition. A sync already in flight completes and applies
    /// normally - disabling stops future ticks, not the current one.
    pub fn disable_realtime(&self) {
        if self.scheduler.stop() {
            tracing::info!("realtime disabled");
            self.bus
                .publish(&SyncEvent::RealtimeStateChanged { enabled: false });
        }
    }

    /// Whether realtime mode is currently enabled.
    #[must_use]
    pub fn is_realtime_enabled(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Last successful sync timestamp.
    ///
    /// For one category, that category's timestamp. For `None`, the oldest
    /// timestamp across all categories - and `None` overall when any category
    /// has never synced - so a "last verified" indicator built on this never
    /// overstates freshness.
    #[must_use]
    pub fn last_synced_at(&self, category: Option<Category>) -> Option<DateTime<Utc>> {
        match category {
            Some(category) => self.store.last_synced_at(category),
            None => self.store.oldest_synced_at(),
        }
    }
}
