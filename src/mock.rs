//! # Test Doubles
//!
//! In-memory stand-ins for the two seams of the engine, so tests can observe
//! the scheduler and the subject without any network:
//!
//! | Double | Stands in for | Records |
//! |--------|---------------|---------|
//! | [`MockExecutor`] | [`TaskExecutor`] | every call (app name, service IP, time), completions |
//! | [`RecordingObserver`] | any [`Observer`] | every event delivered |
//!
//! Both are meant to be shared behind an `Arc` and inspected after the code
//! under test ran. Pair them with `#[tokio::test(start_paused = true)]` so tick
//! counts are deterministic.
//!
//! ```ignore
//! let executor = Arc::new(MockExecutor::new().fail_on("billing", 2));
//! let scheduler = TaskSchedulerObserver::new(executor.clone(), Duration::from_millis(100));
//! scheduler.start_job(&Interest::new("billing", "10.0.0.9")).await;
//! tokio::time::sleep(Duration::from_millis(550)).await;
//! assert_eq!(executor.calls_for("billing").len(), 5);
//! ```

use crate::domain::{Interest, InterestEvent};
use crate::observer::Observer;
use crate::scheduler::{ExecutorError, TaskExecutor};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// One recorded [`TaskExecutor::execute_task`] call.
#[derive(Debug, Clone)]
pub struct ExecutorCall {
    pub app_name: String,
    pub service_ip: String,
    pub at: Instant,
}

/// A [`TaskExecutor`] that counts calls and can be told to be slow or to fail.
///
/// A call is recorded as soon as it starts; [`MockExecutor::completed_count`]
/// only counts calls that ran to the end (including the configured delay).
#[derive(Default)]
pub struct MockExecutor {
    calls: Mutex<Vec<ExecutorCall>>,
    completed: AtomicUsize,
    delay: Option<Duration>,
    failures: HashSet<(String, usize)>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `delay` before returning.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The `nth` call (1-based) for `app_name` returns an error.
    pub fn fail_on(mut self, app_name: impl Into<String>, nth: usize) -> Self {
        self.failures.insert((app_name.into(), nth));
        self
    }

    /// Number of calls started.
    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    /// Number of calls that ran to completion.
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<ExecutorCall> {
        self.lock_calls().clone()
    }

    pub fn calls_for(&self, app_name: &str) -> Vec<ExecutorCall> {
        self.lock_calls()
            .iter()
            .filter(|call| call.app_name == app_name)
            .cloned()
            .collect()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<ExecutorCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TaskExecutor for MockExecutor {
    async fn execute_task(&self, interest: &Interest) -> Result<(), ExecutorError> {
        let nth = {
            let mut calls = self.lock_calls();
            calls.push(ExecutorCall {
                app_name: interest.app_name.clone(),
                service_ip: interest.service_ip.clone(),
                at: Instant::now(),
            });
            calls
                .iter()
                .filter(|call| call.app_name == interest.app_name)
                .count()
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);

        if self.failures.contains(&(interest.app_name.clone(), nth)) {
            return Err(ExecutorError::Failed(format!(
                "injected failure on call {} for {}",
                nth, interest.app_name
            )));
        }
        Ok(())
    }
}

/// An [`Observer`] that remembers every event delivered to it.
pub struct RecordingObserver {
    id: String,
    events: Mutex<Vec<InterestEvent>>,
}

impl RecordingObserver {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn received(&self) -> Vec<InterestEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl Observer for RecordingObserver {
    fn id(&self) -> &str {
        &self.id
    }

    async fn update(&self, event: InterestEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
