// ABOUTME: Realtime polling scheduler driving periodic sync passes on a single repeating timer
// ABOUTME: Idempotent start/stop with fail-open ticks; one failed pass never stops the timer
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::SyncError;
use futures_util::future::BoxFuture;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Work executed on every scheduler tick.
pub type TickFn = Arc<dyn Fn() -> BoxFuture<'static, Result<(), SyncError>> + Send + Sync>;

/// One armed realtime session.
struct RealtimeSession {
    shutdown_tx: mpsc::Sender<()>,
    interval: Duration,
}

/// Owns the single repeating timer behind realtime mode.
///
/// At most one session is active at a time: `start` while running is a no-op,
/// `stop` while stopped is a no-op. The first tick fires immediately so
/// enabling realtime does not wait a full interval for the first refresh, and
/// a tick's work runs to completion before the next tick is honored, so
/// passes never overlap or pile up behind a slow fetch.
#[derive(Default)]
pub struct RealtimeScheduler {
    session: Mutex<Option<RealtimeSession>>,
}

impl RealtimeScheduler {
    /// Scheduler with no armed timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the repeating timer.
    ///
    /// Returns `true` when a new session was armed, `false` when one was
    /// already running (in which case nothing changes - no second timer).
    /// A tick whose work fails is logged and the timer keeps running.
    pub fn start(&self, interval: Duration, on_tick: TickFn) -> bool {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        if session.is_some() {
            return false;
        }

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // A pass that outlives the interval delays the next tick instead
            // of bursting to catch up.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // Biased toward shutdown: when a stop lands exactly on an
                // interval boundary, no extra pass fires after disable.
                tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => {
                        tracing::debug!("realtime scheduler received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(err) = on_tick().await {
                            let misfire = SyncError::SchedulerMisfire {
                                message: err.to_string(),
                            };
                            tracing::warn!("{misfire}");
                        }
                    }
                }
            }
        });

        *session = Some(RealtimeSession {
            shutdown_tx,
            interval,
        });
        true
    }

    /// Cancel the timer if armed.
    ///
    /// Returns `true` on a genuine running-to-stopped transition. A tick
    /// already in flight completes normally; stopping only prevents future
    /// ticks.
    pub fn stop(&self) -> bool {
        let taken = self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match taken {
            Some(active) => {
                // The task may have already observed a dropped channel; a
                // failed send means it is gone either way.
                let _ = active.shutdown_tx.try_send(());
                true
            }
            None => false,
        }
    }

    /// Whether a session is currently armed.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Interval of the active session, if any.
    #[must_use]
    pub fn current_interval(&self) -> Option<Duration> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|active| active.interval)
    }
}
