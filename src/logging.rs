// ABOUTME: Structured logging setup for the synchronization subsystem
// ABOUTME: Env-driven level and format selection with pretty, compact, and JSON output
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::Result;
use std::env;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Configuration from the environment.
    ///
    /// `VITALS_SYNC_LOG_LEVEL` sets the default filter;
    /// `VITALS_SYNC_LOG_FORMAT` picks `json`, `pretty`, or `compact`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(level) = env::var("VITALS_SYNC_LOG_LEVEL") {
            config.level = level;
        }
        match env::var("VITALS_SYNC_LOG_FORMAT").as_deref() {
            Ok("json") => config.format = LogFormat::Json,
            Ok("compact") => config.format = LogFormat::Compact,
            _ => {}
        }
        config
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .try_init()?,
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()?,
    }

    Ok(())
}
