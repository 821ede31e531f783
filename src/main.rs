//! # Routing Manager
//!
//! Starts the interest scheduling engine, resyncs jobs from the persisted
//! interests, and runs until SIGINT/SIGTERM.

use routing_manager::config::Settings;
use routing_manager::lifecycle::{setup_tracing, RoutingSystem, SystemError};
use routing_manager::scheduler::HttpTaskExecutor;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    let settings = Settings::load()?;
    settings.validate()?;

    setup_tracing(&settings.logging)?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting routing manager");

    let executor = Arc::new(HttpTaskExecutor::new(
        settings.monitoring_manager_url(),
        settings.executor_timeout(),
    )?);
    info!(endpoint = %executor.endpoint(), "Task executor configured");

    let system = RoutingSystem::new(&settings, executor);
    system.restart().await;

    shutdown_signal().await?;
    info!("Received shutdown signal");

    system.shutdown().await?;
    info!("Shutdown complete");
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() -> Result<(), SystemError> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result?,
        _ = terminate.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<(), SystemError> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
