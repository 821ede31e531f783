//! Per-key periodic task scheduling driven by interest lifecycle events.
//!
//! # Main Components
//!
//! - [`TaskExecutor`] - The pluggable per-tick task (e.g. [`HttpTaskExecutor`])
//! - [`ScheduledJob`] - One running timer loop, its cancellation handle and snapshot
//! - [`TaskSchedulerObserver`] - The observer owning the map of active jobs
//!
//! # State Machine
//!
//! Per app name a job is either absent or running:
//!
//! | Current | Event   | Action                          | Next    |
//! |---------|---------|---------------------------------|---------|
//! | Absent  | Created | start job                       | Running |
//! | Running | Created | replace job (same as Updated)   | Running |
//! | Absent  | Updated | start job                       | Running |
//! | Running | Updated | cancel old, start with snapshot | Running |
//! | Running | Deleted | cancel, remove                  | Absent  |
//! | Absent  | Deleted | nothing                         | Absent  |

pub mod executor;
pub mod http;
pub mod job;
pub mod task_scheduler;

pub use executor::{ExecutorError, TaskExecutor};
pub use http::{HttpTaskExecutor, TaskPayload};
pub use job::ScheduledJob;
pub use task_scheduler::{TaskSchedulerObserver, DEFAULT_INTERVAL};
