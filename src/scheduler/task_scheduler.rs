use crate::domain::{EventKind, Interest, InterestEvent};
use crate::observer::{BaseObserver, Observer};
use crate::scheduler::{ScheduledJob, TaskExecutor};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Interval substituted when the configured one is zero.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

const OBSERVER_NAME: &str = "TaskSchedulerObserver";

#[derive(Default)]
struct SchedulerState {
    jobs: HashMap<String, ScheduledJob>,
    closed: bool,
}

/// Observer that keeps one periodic [`ScheduledJob`] running per live interest.
///
/// # Architecture Note
/// The scheduler exclusively owns the job map and every job's cancellation.
/// The map lives behind a `std::sync::Mutex` that is held only to insert,
/// remove or drain entries and to spawn/signal loops, which never block. It is
/// never held while waiting for a loop to acknowledge cancellation, nor while
/// a tick runs.
///
/// Replacing a job (an `Updated` event, or a `Created` event for a key that
/// is already running) swaps the map entry under the lock, so there is never
/// more than one job per key in the map, then waits for the old loop to exit.
///
/// A job taken out of the map by `start_job` or `stop_job` is *retiring* until
/// its loop has acknowledged cancellation. The retiring count is bumped under
/// the same lock that removes the job, and [`shutdown`](Self::shutdown) waits
/// for it to drop to zero, so it also covers jobs it never saw in the map.
pub struct TaskSchedulerObserver {
    base: BaseObserver,
    executor: Arc<dyn TaskExecutor>,
    interval: Duration,
    state: Mutex<SchedulerState>,
    retiring: watch::Sender<usize>,
}

impl TaskSchedulerObserver {
    /// Creates a scheduler ticking every `interval`. Zero means [`DEFAULT_INTERVAL`].
    pub fn new(executor: Arc<dyn TaskExecutor>, interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            DEFAULT_INTERVAL
        } else {
            interval
        };

        Self {
            base: BaseObserver::new(OBSERVER_NAME),
            executor,
            interval,
            state: Mutex::new(SchedulerState::default()),
            retiring: watch::channel(0).0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a job is currently running for `app_name`.
    pub fn has_job(&self, app_name: &str) -> bool {
        self.state().jobs.contains_key(app_name)
    }

    /// Number of running jobs.
    pub fn active_jobs(&self) -> usize {
        self.state().jobs.len()
    }

    /// The interest snapshot the running job for `app_name` ticks with.
    pub fn snapshot(&self, app_name: &str) -> Option<Arc<Interest>> {
        self.state()
            .jobs
            .get(app_name)
            .map(|job| job.snapshot().clone())
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    /// Number of cancelled jobs whose loops have not yet acknowledged.
    pub fn retiring_jobs(&self) -> usize {
        *self.retiring.borrow()
    }

    /// Starts a job for the interest, replacing (and awaiting) any job already
    /// running under the same app name.
    ///
    /// Returns `false` if the scheduler has been shut down.
    pub async fn start_job(&self, interest: &Interest) -> bool {
        let app_name = interest.app_name.clone();
        // The job owns its own copy; nothing the producer does later can reach it.
        let snapshot = Arc::new(interest.clone());

        let replaced = {
            let mut state = self.state();
            if state.closed {
                warn!(app_name = %app_name, "Scheduler is shut down, ignoring start request");
                return false;
            }
            let job = ScheduledJob::spawn(snapshot, self.interval, self.executor.clone());
            let replaced = state.jobs.insert(app_name.clone(), job).map(ScheduledJob::cancel);
            if replaced.is_some() {
                self.retiring.send_modify(|n| *n += 1);
            }
            replaced
        };

        info!(app_name = %app_name, interval = ?self.interval, "Started task scheduler");

        if let Some(handle) = replaced {
            self.retire(&app_name, handle).await;
            info!(app_name = %app_name, "Replaced task scheduler");
        }
        true
    }

    /// Stops the job for `app_name` and waits for its loop to exit.
    ///
    /// Returns `false` if no job was running.
    pub async fn stop_job(&self, app_name: &str) -> bool {
        let handle = {
            let mut state = self.state();
            let handle = state.jobs.remove(app_name).map(ScheduledJob::cancel);
            if handle.is_some() {
                self.retiring.send_modify(|n| *n += 1);
            }
            handle
        };

        match handle {
            Some(handle) => {
                self.retire(app_name, handle).await;
                info!(app_name, "Stopped task scheduler");
                true
            }
            None => {
                debug!(app_name, "No task scheduler to stop");
                false
            }
        }
    }

    /// Stops every running job and waits for all of them to exit.
    ///
    /// The scheduler stays usable afterwards. Returns the number of jobs stopped.
    pub async fn stop_all(&self) -> usize {
        self.drain(false).await
    }

    /// Stops every running job, waits for all of them to exit and refuses any
    /// job started afterwards.
    ///
    /// Once this returns, no executor call is made by this scheduler again.
    pub async fn shutdown(&self) {
        let stopped = self.drain(true).await;
        info!(stopped, "All task schedulers stopped");
    }

    async fn drain(&self, close: bool) -> usize {
        let cancelled: Vec<(String, JoinHandle<()>)> = {
            let mut state = self.state();
            state.closed |= close;
            state
                .jobs
                .drain()
                .map(|(app_name, job)| (app_name, job.cancel()))
                .collect()
        };

        let stopped = cancelled.len();
        for (app_name, handle) in cancelled {
            acknowledge(&app_name, handle).await;
            info!(app_name = %app_name, "Stopped task scheduler during shutdown");
        }

        // Jobs cancelled by a concurrent start_job/stop_job before the drain.
        let mut retiring = self.retiring.subscribe();
        if retiring.wait_for(|n| *n == 0).await.is_err() {
            warn!("Retiring job counter closed while draining");
        }
        stopped
    }

    async fn retire(&self, app_name: &str, handle: JoinHandle<()>) {
        let _retired = Retired(&self.retiring);
        acknowledge(app_name, handle).await;
    }

    fn state(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Decrements the retiring count when dropped, even if the wait was abandoned.
struct Retired<'a>(&'a watch::Sender<usize>);

impl Drop for Retired<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

async fn acknowledge(app_name: &str, handle: JoinHandle<()>) {
    if let Err(e) = handle.await {
        warn!(app_name, error = %e, "Job loop ended abnormally");
    }
}

#[async_trait]
impl Observer for TaskSchedulerObserver {
    fn id(&self) -> &str {
        self.base.id()
    }

    async fn update(&self, event: InterestEvent) {
        self.base.log_received(&event);

        match event.kind {
            EventKind::Created | EventKind::Updated => {
                self.start_job(&event.interest).await;
            }
            EventKind::Deleted => {
                self.stop_job(event.key()).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockExecutor;
    use crate::scheduler::ExecutorError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::time;

    /// Executor whose calls never finish; records when a call is dropped.
    #[derive(Default)]
    struct HangingExecutor {
        dropped: Arc<AtomicBool>,
    }

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl TaskExecutor for HangingExecutor {
        async fn execute_task(&self, _interest: &Interest) -> Result<(), ExecutorError> {
            let _flag = DropFlag(self.dropped.clone());
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    fn scheduler(executor: &Arc<MockExecutor>, interval_ms: u64) -> TaskSchedulerObserver {
        TaskSchedulerObserver::new(executor.clone(), Duration::from_millis(interval_ms))
    }

    #[tokio::test]
    async fn test_zero_interval_uses_default() {
        let executor = Arc::new(MockExecutor::new());
        let scheduler = scheduler(&executor, 0);
        assert_eq!(scheduler.interval(), DEFAULT_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transition_table() {
        let executor = Arc::new(MockExecutor::new());
        let scheduler = scheduler(&executor, 100);
        let web = Interest::new("web", "10.0.0.1");

        // Absent + Deleted
        scheduler.update(InterestEvent::deleted(web.clone())).await;
        assert_eq!(scheduler.active_jobs(), 0);

        // Absent + Created
        scheduler.update(InterestEvent::created(web.clone())).await;
        assert!(scheduler.has_job("web"));

        // Running + Created
        scheduler.update(InterestEvent::created(web.clone())).await;
        assert_eq!(scheduler.active_jobs(), 1);

        // Running + Updated
        let moved = Interest::new("web", "10.0.0.2");
        scheduler.update(InterestEvent::updated(moved)).await;
        assert_eq!(scheduler.active_jobs(), 1);
        assert_eq!(scheduler.snapshot("web").unwrap().service_ip, "10.0.0.2");

        // Running + Deleted
        scheduler.update(InterestEvent::deleted(web.clone())).await;
        assert!(!scheduler.has_job("web"));

        // Absent + Updated
        scheduler.update(InterestEvent::updated(web)).await;
        assert!(scheduler.has_job("web"));

        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_after_shutdown_is_refused() {
        let executor = Arc::new(MockExecutor::new());
        let scheduler = scheduler(&executor, 100);

        scheduler.shutdown().await;
        assert!(scheduler.is_closed());
        assert!(!scheduler.start_job(&Interest::new("web", "10.0.0.1")).await);

        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_all_keeps_scheduler_open() {
        let executor = Arc::new(MockExecutor::new());
        let scheduler = scheduler(&executor, 100);

        scheduler.start_job(&Interest::new("a", "10.0.0.1")).await;
        scheduler.start_job(&Interest::new("b", "10.0.0.2")).await;
        assert_eq!(scheduler.stop_all().await, 2);
        assert_eq!(scheduler.active_jobs(), 0);

        assert!(scheduler.start_job(&Interest::new("a", "10.0.0.1")).await);
        assert_eq!(scheduler.active_jobs(), 1);
        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_waits_for_job_replaced_concurrently() {
        let executor = Arc::new(HangingExecutor::default());
        let dropped = executor.dropped.clone();
        let scheduler = Arc::new(TaskSchedulerObserver::new(
            executor,
            Duration::from_millis(100),
        ));

        scheduler.start_job(&Interest::new("web", "10.0.0.1")).await;
        // First call is in flight and never completes.
        time::sleep(Duration::from_millis(150)).await;

        let replacing = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move {
                scheduler.start_job(&Interest::new("web", "10.0.0.2")).await;
            })
        };
        tokio::task::yield_now().await;

        scheduler.shutdown().await;
        assert_eq!(scheduler.active_jobs(), 0);
        assert_eq!(scheduler.retiring_jobs(), 0);
        assert!(dropped.load(Ordering::SeqCst), "old loop still running");

        replacing.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_job_leaves_nothing_retiring() {
        let executor = Arc::new(MockExecutor::new().with_delay(Duration::from_millis(30)));
        let scheduler = scheduler(&executor, 100);

        scheduler.start_job(&Interest::new("web", "10.0.0.1")).await;
        time::sleep(Duration::from_millis(110)).await;

        assert!(scheduler.stop_job("web").await);
        assert_eq!(scheduler.retiring_jobs(), 0);
        assert!(!scheduler.stop_job("web").await);
    }
}
