// ABOUTME: Tests for realtime mode - idempotent toggling, tick timing, and stale-accept
// ABOUTME: Runs on tokio's paused clock so interval assertions are deterministic
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use vitals_sync::adapter::{FetchAdapter, SyntheticAdapter};
use vitals_sync::errors::SyncResult;
use vitals_sync::events::{EventKind, EventSelector, SyncEvent};
use vitals_sync::manager::SyncManager;
use vitals_sync::models::{Category, Record, SyncStatus, WorkoutEntry};

/// Counts batch sync passes by counting workout fetches.
struct CountingAdapter {
    fetches: AtomicUsize,
}

impl CountingAdapter {
    fn new() -> Self {
        Self {
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl FetchAdapter for CountingAdapter {
    async fn fetch_category(&self, category: Category) -> SyncResult<Vec<Record>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        SyntheticAdapter::new().fetch_category(category).await
    }
}

fn realtime_events(manager: &SyncManager) -> Arc<Mutex<Vec<bool>>> {
    let toggles = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&toggles);
    manager.subscribe(
        EventSelector::Kind(EventKind::RealtimeStateChanged),
        move |event| {
            if let SyncEvent::RealtimeStateChanged { enabled } = event {
                sink.lock().unwrap().push(*enabled);
            }
            Ok(())
        },
    );
    toggles
}

fn batch_completions(manager: &SyncManager) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&count);
    manager.subscribe(
        EventSelector::Kind(EventKind::SyncCompleted),
        move |event| {
            if matches!(event, SyncEvent::SyncCompleted { category: None, .. }) {
                sink.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        },
    );
    count
}

#[tokio::test(start_paused = true)]
async fn test_enable_realtime_twice_publishes_one_toggle_and_arms_one_timer() {
    let adapter = Arc::new(CountingAdapter::new());
    let manager = SyncManager::new(Arc::clone(&adapter) as Arc<dyn FetchAdapter>);
    let toggles = realtime_events(&manager);

    manager.enable_realtime(Duration::from_secs(1));
    manager.enable_realtime(Duration::from_secs(1));
    assert!(manager.is_realtime_enabled());

    tokio::time::sleep(Duration::from_millis(1)).await;

    // One timer means one immediate batch pass: four fetches, not eight.
    assert_eq!(adapter.fetches.load(Ordering::SeqCst), 4);
    assert_eq!(*toggles.lock().unwrap(), vec![true]);

    manager.disable_realtime();
    manager.disable_realtime();
    assert!(!manager.is_realtime_enabled());
    assert_eq!(*toggles.lock().unwrap(), vec![true, false]);
}

#[tokio::test(start_paused = true)]
async fn test_first_tick_fires_immediately_then_on_interval() {
    let manager = SyncManager::new(Arc::new(SyntheticAdapter::new()));
    let batches = batch_completions(&manager);

    manager.enable_realtime(Duration::from_millis(1000));

    // First refresh lands before the first interval elapses.
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(batches.load(Ordering::SeqCst), 1);
    assert_eq!(manager.get_state(Category::Workouts).records.len(), 5);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(batches.load(Ordering::SeqCst), 2);

    manager.disable_realtime();
}

#[tokio::test(start_paused = true)]
async fn test_disable_between_ticks_prevents_the_second_tick() {
    let manager = SyncManager::new(Arc::new(SyntheticAdapter::new()));
    let batches = batch_completions(&manager);

    manager.enable_realtime(Duration::from_millis(1000));
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(batches.load(Ordering::SeqCst), 1);

    manager.disable_realtime();
    tokio::time::sleep(Duration::from_millis(5000)).await;
    assert_eq!(batches.load(Ordering::SeqCst), 1);
}

/// Holds fetches at a gate so a tick can straddle a disable call.
struct GatedAdapter {
    gate: Notify,
}

#[async_trait]
impl FetchAdapter for GatedAdapter {
    async fn fetch_category(&self, _category: Category) -> SyncResult<Vec<Record>> {
        self.gate.notified().await;
        Ok(vec![Record::Workout(WorkoutEntry {
            id: "w1".to_owned(),
            name: "Recovery spin".to_owned(),
            sport: "ride".to_owned(),
            recorded_at: Utc::now(),
            duration_seconds: 1200,
            distance_meters: None,
            calories: None,
            average_heart_rate: None,
        })])
    }
}

#[tokio::test(start_paused = true)]
async fn test_sync_in_flight_at_disable_completes_and_applies() {
    let adapter = Arc::new(GatedAdapter {
        gate: Notify::new(),
    });
    let manager = SyncManager::new(Arc::clone(&adapter) as Arc<dyn FetchAdapter>);
    let batches = batch_completions(&manager);

    manager.enable_realtime(Duration::from_secs(1));

    // Let the immediate tick start and park every fetch at the gate.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(manager.get_state(Category::Workouts).status, SyncStatus::Syncing);

    // Disabling stops future ticks, not the pass already in flight.
    manager.disable_realtime();
    assert!(!manager.is_realtime_enabled());
    assert_eq!(batches.load(Ordering::SeqCst), 0);

    adapter.gate.notify_waiters();
    tokio::time::sleep(Duration::from_millis(10)).await;

    // The straggler's result is still applied (stale-accept).
    assert_eq!(batches.load(Ordering::SeqCst), 1);
    let state = manager.get_state(Category::Workouts);
    assert_eq!(state.status, SyncStatus::Idle);
    assert_eq!(state.records.len(), 1);
    assert!(state.last_synced_at.is_some());

    // And no further ticks fire after the pass drains.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(batches.load(Ordering::SeqCst), 1);
}
