//! # Scheduled Job
//!
//! A [`ScheduledJob`] is one independent timer loop for one app name. It owns:
//!
//! - the immutable interest snapshot handed to every tick,
//! - the sending half of a one-shot cancellation channel,
//! - the `JoinHandle` of the loop task.
//!
//! ## Cancellation
//!
//! [`ScheduledJob::cancel`] consumes the job, so the signal can be sent at most
//! once and only by whoever removed the job from the scheduler's map. It
//! returns the loop's `JoinHandle`; awaiting it is the acknowledgement that no
//! further executor call will be made.
//!
//! The loop polls the cancellation signal first (`biased`) both while waiting
//! for the next tick and while an executor call is in flight, so a cancelled
//! job never starts a new call and drops the one in progress. Dropping a
//! `ScheduledJob` without calling `cancel` closes the channel, which the loop
//! treats the same way.

use crate::domain::Interest;
use crate::scheduler::TaskExecutor;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error};

pub struct ScheduledJob {
    snapshot: Arc<Interest>,
    cancel: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl ScheduledJob {
    /// Spawns the timer loop. The first tick fires one full `period` from now.
    pub fn spawn(
        snapshot: Arc<Interest>,
        period: Duration,
        executor: Arc<dyn TaskExecutor>,
    ) -> Self {
        let (cancel, cancelled) = oneshot::channel();
        let first_tick = Instant::now() + period;
        let handle = tokio::spawn(run(
            snapshot.clone(),
            first_tick,
            period,
            executor,
            cancelled,
        ));

        Self {
            snapshot,
            cancel,
            handle,
        }
    }

    pub fn snapshot(&self) -> &Arc<Interest> {
        &self.snapshot
    }

    /// Signals the loop to stop and hands back its handle for acknowledgement.
    pub fn cancel(self) -> JoinHandle<()> {
        // Err only means the loop already exited.
        let _ = self.cancel.send(());
        self.handle
    }
}

async fn run(
    snapshot: Arc<Interest>,
    first_tick: Instant,
    period: Duration,
    executor: Arc<dyn TaskExecutor>,
    mut cancelled: oneshot::Receiver<()>,
) {
    let app_name = snapshot.app_name.as_str();
    let mut ticker = time::interval_at(first_tick, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = &mut cancelled => break,
            _ = ticker.tick() => {}
        }

        tokio::select! {
            biased;
            _ = &mut cancelled => break,
            result = executor.execute_task(&snapshot) => {
                if let Err(e) = result {
                    error!(app_name, error = %e, "Failed to execute scheduled task");
                }
            }
        }
    }

    debug!(app_name, "Job loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockExecutor;

    #[tokio::test(start_paused = true)]
    async fn test_no_tick_before_first_period() {
        let executor = Arc::new(MockExecutor::new());
        let job = ScheduledJob::spawn(
            Arc::new(Interest::new("web", "10.0.0.1")),
            Duration::from_millis(100),
            executor.clone(),
        );

        time::sleep(Duration::from_millis(99)).await;
        assert_eq!(executor.call_count(), 0);

        time::sleep(Duration::from_millis(2)).await;
        assert_eq!(executor.call_count(), 1);

        job.cancel().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_in_flight_call() {
        let executor = Arc::new(MockExecutor::new().with_delay(Duration::from_secs(5)));
        let job = ScheduledJob::spawn(
            Arc::new(Interest::new("web", "10.0.0.1")),
            Duration::from_millis(100),
            executor.clone(),
        );

        // First call starts at 100ms and would run until 5.1s.
        time::sleep(Duration::from_millis(150)).await;
        assert_eq!(executor.call_count(), 1);

        job.cancel().await.unwrap();
        assert_eq!(executor.completed_count(), 0);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(executor.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_job_stops_loop() {
        let executor = Arc::new(MockExecutor::new());
        let job = ScheduledJob::spawn(
            Arc::new(Interest::new("web", "10.0.0.1")),
            Duration::from_millis(100),
            executor.clone(),
        );
        drop(job);

        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(executor.call_count(), 0);
    }
}
