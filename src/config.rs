//! Layered configuration: built-in defaults → `config/default.toml` →
//! `config/local.toml` → `ROUTING__*` environment variables.
//!
//! ```bash
//! ROUTING__SCHEDULER__INTERVAL_MS=5000 ROUTING__LOGGING__FORMAT=json cargo run
//! ```

use crate::lifecycle::SystemError;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure containing all configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub scheduler: SchedulerSettings,
    pub monitoring_manager: MonitoringManagerSettings,
    pub logging: LoggingSettings,
    pub shutdown_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerSettings {
    /// Tick interval per interest. Zero falls back to the scheduler default.
    pub interval_ms: u64,
}

/// Where the per-tick routing request is sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringManagerSettings {
    pub host: String,
    pub port: u16,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive, used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Json,
}

impl Settings {
    /// Load configuration from the `config` directory
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from_path<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            .add_source(
                Environment::with_prefix("ROUTING")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Rejects settings the process cannot start with.
    pub fn validate(&self) -> Result<(), SystemError> {
        if self.monitoring_manager.host.trim().is_empty() {
            return Err(SystemError::InvalidConfig(
                "Monitoring manager host is required".to_string(),
            ));
        }
        if self.monitoring_manager.port == 0 {
            return Err(SystemError::InvalidConfig(
                "Monitoring manager port must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn scheduler_interval(&self) -> Duration {
        Duration::from_millis(self.scheduler.interval_ms)
    }

    pub fn executor_timeout(&self) -> Duration {
        Duration::from_millis(self.monitoring_manager.timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    pub fn monitoring_manager_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.monitoring_manager.host, self.monitoring_manager.port
        )
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scheduler: SchedulerSettings { interval_ms: 30_000 },
            monitoring_manager: MonitoringManagerSettings {
                host: "monitoring_manager".to_string(),
                port: 10999,
                timeout_ms: 5_000,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                format: LogFormat::Compact,
            },
            shutdown_timeout_ms: 10_000,
        }
    }
}
