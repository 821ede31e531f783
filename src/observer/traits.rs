use crate::domain::InterestEvent;
use async_trait::async_trait;
use std::sync::Arc;

/// Anything that reacts to interest lifecycle events.
///
/// # Identity
/// [`Observer::id`] must be stable for the lifetime of the observer and unique
/// within a process. The [`Subject`] keys its registry by it, so registering two
/// observers under the same id keeps only the last one.
#[async_trait]
pub trait Observer: Send + Sync + 'static {
    /// The registry key for this observer.
    fn id(&self) -> &str;

    /// Called once per [`Subject::notify`], from this observer's delivery task.
    ///
    /// Calls never overlap and arrive in notify order.
    async fn update(&self, event: InterestEvent);
}

/// A registry of observers and the notifier that fans events out to them.
pub trait Subject: Send + Sync {
    /// Inserts the observer under its id, replacing any previous registration.
    fn register(&self, observer: Arc<dyn Observer>);

    /// Removes the observer registered under the same id. Unknown ids are ignored.
    fn deregister(&self, observer: &dyn Observer);

    /// Dispatches `event` to every registered observer without waiting for them.
    fn notify(&self, event: InterestEvent);
}
