// ABOUTME: Environment-driven configuration for the synchronization subsystem
// ABOUTME: Defaults suit the dashboard; overrides come from VITALS_SYNC_* variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::env;
use std::time::Duration;

/// Default realtime polling interval (5 seconds, the dashboard's refresh cadence).
pub const DEFAULT_REALTIME_INTERVAL_MS: u64 = 5000;

/// Minimum accepted realtime interval; anything lower would hammer the provider.
pub const MIN_REALTIME_INTERVAL_MS: u64 = 250;

/// Tunables for the synchronization subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Interval between realtime sync passes
    pub realtime_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            realtime_interval: Duration::from_millis(DEFAULT_REALTIME_INTERVAL_MS),
        }
    }
}

impl SyncConfig {
    /// Configuration from the environment, falling back to defaults.
    ///
    /// `VITALS_SYNC_REALTIME_INTERVAL_MS` overrides the polling interval;
    /// unparseable or too-small values are logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = env::var("VITALS_SYNC_REALTIME_INTERVAL_MS") {
            match raw.parse::<u64>() {
                Ok(ms) if ms >= MIN_REALTIME_INTERVAL_MS => {
                    config.realtime_interval = Duration::from_millis(ms);
                }
                Ok(ms) => {
                    tracing::warn!(
                        "VITALS_SYNC_REALTIME_INTERVAL_MS={ms} below minimum {MIN_REALTIME_INTERVAL_MS}, using default"
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        "VITALS_SYNC_REALTIME_INTERVAL_MS={raw} is not a number, using default"
                    );
                }
            }
        }
        config
    }
}
