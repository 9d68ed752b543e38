// ABOUTME: Typed publish/subscribe event bus connecting the sync manager to UI surfaces
// ABOUTME: Synchronous snapshot-then-iterate dispatch tolerant of reentrant subscribe/unsubscribe
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::SyncError;
use crate::models::Category;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// An externally observable synchronization event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A category's cached record set was replaced with fresh data
    CategoryUpdated {
        /// Category that was updated
        category: Category,
    },
    /// A sync operation settled
    SyncCompleted {
        /// Whether the operation succeeded
        success: bool,
        /// Category that synced, or `None` for a batch-wide summary
        category: Option<Category>,
    },
    /// Realtime mode was toggled
    RealtimeStateChanged {
        /// Whether realtime mode is now enabled
        enabled: bool,
    },
}

impl SyncEvent {
    /// Kind discriminant of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::CategoryUpdated { .. } => EventKind::CategoryUpdated,
            Self::SyncCompleted { .. } => EventKind::SyncCompleted,
            Self::RealtimeStateChanged { .. } => EventKind::RealtimeStateChanged,
        }
    }
}

/// Event kind discriminant used for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `SyncEvent::CategoryUpdated`
    CategoryUpdated,
    /// `SyncEvent::SyncCompleted`
    SyncCompleted,
    /// `SyncEvent::RealtimeStateChanged`
    RealtimeStateChanged,
}

/// What a listener wants delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSelector {
    /// Every event
    All,
    /// Every event of one kind, regardless of category
    Kind(EventKind),
    /// Every event scoped to one category, regardless of kind - updates and
    /// per-category completions alike
    Category(Category),
}

impl EventSelector {
    /// Whether an event matches this selector.
    #[must_use]
    pub fn matches(&self, event: &SyncEvent) -> bool {
        match self {
            Self::All => true,
            Self::Kind(kind) => event.kind() == *kind,
            Self::Category(category) => match event {
                SyncEvent::CategoryUpdated { category: c }
                | SyncEvent::SyncCompleted {
                    category: Some(c), ..
                } => c == category,
                _ => false,
            },
        }
    }
}

/// Opaque handle identifying one listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(Uuid);

type ListenerCallback = dyn Fn(&SyncEvent) -> Result<(), SyncError> + Send + Sync;

struct Registration {
    id: Uuid,
    selector: EventSelector,
    callback: Arc<ListenerCallback>,
}

/// Typed publish/subscribe bus.
///
/// `publish` is synchronous and never awaits, so listeners always observe a
/// consistent, non-reentrant-from-publish world. Dispatch iterates a snapshot
/// of the listener list: a listener added during a pass is first invoked on
/// the next publish, while an unsubscribed listener is never invoked again,
/// even when the unsubscribe happens from inside another listener in the same
/// pass.
#[derive(Default)]
pub struct EventBus {
    listeners: Mutex<Vec<Registration>>,
}

impl EventBus {
    /// Empty bus with no registrations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for events matching `selector`.
    ///
    /// Never fails; the returned handle removes this registration.
    pub fn subscribe<F>(&self, selector: EventSelector, callback: F) -> SubscriptionHandle
    where
        F: Fn(&SyncEvent) -> Result<(), SyncError> + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        listeners.push(Registration {
            id,
            selector,
            callback: Arc::new(callback),
        });
        SubscriptionHandle(id)
    }

    /// Remove a registration.
    ///
    /// No-op when the handle was already removed, so UI teardown paths that
    /// run twice stay safe.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) {
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        listeners.retain(|registration| registration.id != handle.0);
    }

    /// Number of live registrations.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Deliver an event to every currently registered matching listener, in
    /// registration order.
    ///
    /// A failing listener is reported to the error sink and skipped; it never
    /// prevents later listeners in the same pass and never propagates out.
    pub fn publish(&self, event: &SyncEvent) {
        // Snapshot before iterating; the lock is not held while callbacks
        // run, so listeners may freely subscribe/unsubscribe reentrantly.
        let snapshot: Vec<(Uuid, Arc<ListenerCallback>)> = {
            let listeners = self
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            listeners
                .iter()
                .filter(|registration| registration.selector.matches(event))
                .map(|registration| (registration.id, Arc::clone(&registration.callback)))
                .collect()
        };

        for (id, callback) in snapshot {
            // A registration removed earlier in this same pass must not be
            // invoked after its unsubscription completed.
            let still_registered = self
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .any(|registration| registration.id == id);
            if !still_registered {
                continue;
            }

            if let Err(err) = callback(event) {
                let failure = SyncError::ListenerFailure {
                    message: err.to_string(),
                };
                tracing::warn!(listener_id = %id, "{failure}");
            }
        }
    }
}
