//! # Observability & Tracing
//!
//! This module provides the tracing setup for the routing manager.
//!
//! ## Overview
//!
//! [`setup_tracing`] installs a `tracing-subscriber` fmt subscriber. Every
//! component logs with structured fields, so a line can always be tied back to
//! the interest it concerns:
//!
//! - `app_name` - the scheduling key
//! - `event_type` - `INTEREST_CREATED` / `INTEREST_UPDATED` / `INTEREST_DELETED`
//! - `interval` - the job period
//! - `error` - the failure behind a warning or error line
//!
//! ## Configuration
//!
//! `RUST_LOG` wins when it is set. Otherwise the `logging.level` setting is used
//! as the filter directive. `logging.format` picks compact lines (development)
//! or JSON lines (log shippers).
//!
//! ```bash
//! # Scheduler lifecycle only
//! RUST_LOG=info cargo run
//!
//! # Include every notification and observer delivery
//! RUST_LOG=debug cargo run
//!
//! # Only the scheduler in detail
//! RUST_LOG=info,routing_manager::scheduler=debug cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! With `RUST_LOG=info` an interest that is created, moved and deleted reads:
//!
//! ```text
//! INFO create{request=InterestRequest { app_name: "web", service_ip: "10.0.0.1" }}: Creating interest
//! INFO Started task scheduler app_name=web interval=30s
//! INFO Started task scheduler app_name=web interval=30s
//! INFO Replaced task scheduler app_name=web
//! INFO Stopped task scheduler app_name=web
//! ```
//!
//! Tick failures are logged at `ERROR` with the app name and never stop the job:
//!
//! ```text
//! ERROR Failed to execute scheduled task app_name=web error=Task request failed with status code 503: unavailable
//! ```

use crate::config::{LogFormat, LoggingSettings};
use crate::lifecycle::SystemError;
use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn setup_tracing(logging: &LoggingSettings) -> Result<(), SystemError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| SystemError::Tracing(e.to_string()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| SystemError::Tracing(e.to_string()))
}
