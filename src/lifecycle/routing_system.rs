use crate::config::Settings;
use crate::domain::InterestEvent;
use crate::lifecycle::SystemError;
use crate::observer::{InterestSubject, Subject};
use crate::scheduler::{TaskExecutor, TaskSchedulerObserver};
use crate::service::{InMemoryInterestRepository, InterestRepository, InterestService};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// The runtime orchestrator for the interest → scheduler pipeline.
///
/// `RoutingSystem` is responsible for:
/// - **Dependency Wiring**: repository → subject → service, scheduler registered with the subject
/// - **Recovery**: the one-shot [`restart`](Self::restart) resync after a crash
/// - **Graceful Shutdown**: stopping every job before the process exits
///
/// Every component is constructed here and passed in explicitly, so each test
/// gets an isolated instance.
///
/// # Example
///
/// ```ignore
/// let system = RoutingSystem::new(&settings, executor);
/// system.restart().await;
///
/// let service = system.interest_service.as_ref().unwrap();
/// service.create(InterestRequest::new("web", "10.0.0.1")).await?;
///
/// system.shutdown().await?;
/// ```
pub struct RoutingSystem {
    /// Entry point for interest mutations (and the resync listing)
    pub interest_service: Option<Arc<InterestService>>,

    /// Registry + notifier for lifecycle events
    pub subject: Option<Arc<InterestSubject>>,

    /// The observer running one job per interest
    pub scheduler: Option<Arc<TaskSchedulerObserver>>,

    restarted: AtomicBool,
    shutdown_timeout: Duration,
}

impl RoutingSystem {
    /// Wires a complete system on top of an in-memory repository.
    pub fn new(settings: &Settings, executor: Arc<dyn TaskExecutor>) -> Self {
        Self::with_repository(
            settings,
            Arc::new(InMemoryInterestRepository::new()),
            executor,
        )
    }

    /// Wires a complete system on top of `repo`.
    ///
    /// This method:
    /// 1. Creates the subject
    /// 2. Creates the interest service publishing to that subject
    /// 3. Creates the scheduler with the configured interval and registers it
    pub fn with_repository(
        settings: &Settings,
        repo: Arc<dyn InterestRepository>,
        executor: Arc<dyn TaskExecutor>,
    ) -> Self {
        let subject = Arc::new(InterestSubject::new());
        let interest_service = Arc::new(InterestService::new(
            repo,
            Some(subject.clone() as Arc<dyn Subject>),
        ));

        let scheduler = Arc::new(TaskSchedulerObserver::new(
            executor,
            settings.scheduler_interval(),
        ));
        subject.register(scheduler.clone());
        info!(interval = ?scheduler.interval(), "Interest observers registered");

        Self::from_parts(
            Some(interest_service),
            Some(subject),
            Some(scheduler),
            settings.shutdown_timeout(),
        )
    }

    /// Assembles a system from already-built (possibly missing) components.
    pub fn from_parts(
        interest_service: Option<Arc<InterestService>>,
        subject: Option<Arc<InterestSubject>>,
        scheduler: Option<Arc<TaskSchedulerObserver>>,
        shutdown_timeout: Duration,
    ) -> Self {
        Self {
            interest_service,
            subject,
            scheduler,
            restarted: AtomicBool::new(false),
            shutdown_timeout,
        }
    }

    /// Rebuilds the scheduler's jobs from the persisted interests.
    ///
    /// Runs at most once per `RoutingSystem`; the first call consumes the latch
    /// even if it aborts. It:
    /// 1. Stops every job that might already be running
    /// 2. Lists all interests
    /// 3. Notifies a synthetic `Created` event for each one
    ///
    /// Returns the number of interests replayed. The jobs appear once the
    /// scheduler has processed the notifications, which happens asynchronously.
    pub async fn restart(&self) -> usize {
        if self.restarted.swap(true, Ordering::SeqCst) {
            debug!("Restart procedure already ran, skipping");
            return 0;
        }

        info!("Starting service restart procedure");

        let (Some(service), Some(subject), Some(scheduler)) =
            (&self.interest_service, &self.subject, &self.scheduler)
        else {
            error!("Cannot restart services: required components are missing");
            return 0;
        };

        let stopped = scheduler.stop_all().await;
        if stopped > 0 {
            warn!(stopped, "Stopped jobs that were running before resync");
        }

        let interests = match service.list().await {
            Ok(interests) => interests,
            Err(e) => {
                error!(error = %e, "Failed to retrieve interests during restart");
                return 0;
            }
        };
        info!(count = interests.len(), "Retrieved interests from repository");

        for interest in &interests {
            subject.notify(InterestEvent::created(interest.clone()));
            debug!(
                app_name = %interest.app_name,
                service_ip = %interest.service_ip,
                "Reinitialized interest"
            );
        }

        info!(
            interests_reinitialized = interests.len(),
            "Service restart procedure completed"
        );
        interests.len()
    }

    /// Gracefully shuts down the scheduler.
    ///
    /// Once this returns `Ok`, every job has acknowledged cancellation and no
    /// further task is executed. Returns an error if that takes longer than the
    /// configured shutdown timeout.
    pub async fn shutdown(&self) -> Result<(), SystemError> {
        info!("Starting graceful shutdown of services");

        if let Some(scheduler) = &self.scheduler {
            tokio::time::timeout(self.shutdown_timeout, scheduler.shutdown())
                .await
                .map_err(|_| SystemError::ShutdownTimeout(self.shutdown_timeout))?;
            info!("Task scheduler observer shut down successfully");
        }

        info!("All services shut down successfully");
        Ok(())
    }
}
