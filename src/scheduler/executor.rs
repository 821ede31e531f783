//! # Task Executor
//!
//! The scheduler does not know what a "task" is. Every tick it hands the job's
//! interest snapshot to a [`TaskExecutor`] and logs whatever error comes back.

use crate::domain::Interest;
use async_trait::async_trait;

/// Errors a task execution can report. All of them are soft failures for the
/// scheduler: they are logged and the job keeps ticking.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to encode task payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Task request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Task request failed with status code {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Task failed: {0}")]
    Failed(String),
}

/// Executes one tick of work for an interest.
///
/// Implementations must be safe to call repeatedly and concurrently for
/// different interests. A call should be bounded in time (for example by a
/// client-side timeout); the scheduler drops an in-flight call when the job is
/// cancelled.
#[async_trait]
pub trait TaskExecutor: Send + Sync + 'static {
    async fn execute_task(&self, interest: &Interest) -> Result<(), ExecutorError>;
}
