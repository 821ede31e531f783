//! Errors surfaced by process-level wiring (startup, configuration, shutdown).

use crate::scheduler::ExecutorError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to initialise tracing: {0}")]
    Tracing(String),

    #[error("Failed to build task executor: {0}")]
    Executor(#[from] ExecutorError),

    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(#[from] std::io::Error),

    #[error("Shutdown did not complete within {0:?}")]
    ShutdownTimeout(Duration),
}
