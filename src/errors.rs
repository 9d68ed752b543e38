// ABOUTME: Error taxonomy for the synchronization subsystem
// ABOUTME: Every variant is recovered locally; nothing in this crate is fatal
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::models::Category;
use thiserror::Error;

/// Errors raised inside the synchronization subsystem.
///
/// All three variants are recovered where they occur: a fetch failure leaves
/// cached data intact and is surfaced through a `SyncCompleted` event, a
/// listener failure is reported at the publish boundary without aborting the
/// pass, and a scheduler misfire never stops the realtime timer.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// The fetch adapter rejected - network or provider error.
    ///
    /// The manager never inspects the cause beyond "it failed"; the message
    /// is carried for logging and for `CategoryState::last_error`.
    #[error("fetch failed for category {category}: {message}")]
    FetchFailure {
        /// Category whose fetch failed
        category: Category,
        /// Adapter-provided failure description
        message: String,
    },

    /// A subscriber's callback failed during an event publish pass.
    #[error("listener failed: {message}")]
    ListenerFailure {
        /// Listener-provided failure description
        message: String,
    },

    /// A realtime tick's work failed.
    #[error("realtime tick misfired: {message}")]
    SchedulerMisfire {
        /// Description of the failed tick
        message: String,
    },
}

/// Result alias used across the crate.
pub type SyncResult<T> = Result<T, SyncError>;
