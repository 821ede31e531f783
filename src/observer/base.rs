use crate::domain::InterestEvent;
use crate::observer::Observer;
use async_trait::async_trait;
use tracing::debug;

/// Shared scaffolding for concrete observers.
///
/// It carries the observer's name (its registry id) and logs what it
/// receives. It performs no work of its own; concrete observers hold one and
/// delegate [`Observer::id`] to it.
#[derive(Debug, Clone)]
pub struct BaseObserver {
    name: String,
}

impl BaseObserver {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logs receipt of `event` under this observer's name.
    pub fn log_received(&self, event: &InterestEvent) {
        debug!(
            observer = %self.name,
            event_type = %event.kind,
            app_name = %event.key(),
            "Observer received event"
        );
    }
}

#[async_trait]
impl Observer for BaseObserver {
    fn id(&self) -> &str {
        &self.name
    }

    async fn update(&self, event: InterestEvent) {
        self.log_received(&event);
    }
}
