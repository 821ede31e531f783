use crate::domain::{Interest, InterestEvent};
use crate::observer::{Observer, Subject};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// The process's registry of interest observers.
///
/// # Delivery
/// Each registered observer gets a mailbox (an unbounded `mpsc` channel) and
/// one long-lived task that drains it, calling [`Observer::update`] for one
/// event at a time. `notify` only pushes into the mailboxes, so it never waits
/// on an observer, yet every observer sees events in the order they were
/// notified. A slow observer only delays its own mailbox.
///
/// # Concurrency
/// The mailbox map is guarded by a `RwLock`. `register`/`deregister` take the
/// write lock; `notify` holds the read lock while enqueueing, which never
/// blocks.
///
/// Constructed explicitly and handed to whoever needs it; there is no global
/// instance. `register` must be called from within a tokio runtime.
#[derive(Default)]
pub struct InterestSubject {
    mailboxes: RwLock<HashMap<String, mpsc::UnboundedSender<InterestEvent>>>,
}

impl InterestSubject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.mailboxes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn interest_created(&self, interest: impl Into<Arc<Interest>>) {
        self.notify(InterestEvent::created(interest));
    }

    pub fn interest_updated(&self, interest: impl Into<Arc<Interest>>) {
        self.notify(InterestEvent::updated(interest));
    }

    pub fn interest_deleted(&self, interest: impl Into<Arc<Interest>>) {
        self.notify(InterestEvent::deleted(interest));
    }
}

/// Delivers queued events to `observer` until its mailbox is closed.
///
/// Events already queued when the sender is dropped are still delivered.
async fn deliver(
    observer: Arc<dyn Observer>,
    mut mailbox: mpsc::UnboundedReceiver<InterestEvent>,
) {
    while let Some(event) = mailbox.recv().await {
        observer.update(event).await;
    }
    debug!(observer = %observer.id(), "Observer mailbox closed");
}

impl Subject for InterestSubject {
    fn register(&self, observer: Arc<dyn Observer>) {
        let id = observer.id().to_string();
        let (sender, mailbox) = mpsc::unbounded_channel();
        tokio::spawn(deliver(observer, mailbox));

        // Dropping a replaced sender lets its delivery task finish and exit.
        let replaced = self
            .mailboxes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), sender)
            .is_some();
        debug!(observer = %id, replaced, "Observer registered");
    }

    fn deregister(&self, observer: &dyn Observer) {
        let removed = self
            .mailboxes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(observer.id())
            .is_some();
        if removed {
            debug!(observer = %observer.id(), "Observer deregistered");
        }
    }

    fn notify(&self, event: InterestEvent) {
        let mailboxes = self
            .mailboxes
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        debug!(
            event_type = %event.kind,
            app_name = %event.key(),
            observer_count = mailboxes.len(),
            "Notifying observers"
        );

        for (id, mailbox) in mailboxes.iter() {
            if mailbox.send(event.clone()).is_err() {
                warn!(observer = %id, "Observer delivery task has stopped, dropping event");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingObserver;
    use crate::observer::BaseObserver;
    use std::time::Duration;

    #[tokio::test]
    async fn test_register_overwrites_same_id() {
        let subject = InterestSubject::new();
        subject.register(Arc::new(BaseObserver::new("audit")));
        subject.register(Arc::new(BaseObserver::new("audit")));
        assert_eq!(subject.len(), 1);

        subject.register(Arc::new(BaseObserver::new("scheduler")));
        assert_eq!(subject.len(), 2);
    }

    #[tokio::test]
    async fn test_deregister_unknown_is_noop() {
        let subject = InterestSubject::new();
        subject.register(Arc::new(BaseObserver::new("audit")));

        subject.deregister(&BaseObserver::new("missing"));
        assert_eq!(subject.len(), 1);

        subject.deregister(&BaseObserver::new("audit"));
        assert!(subject.is_empty());
    }

    /// Events reach an observer in notify order even when the runtime has
    /// several worker threads.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_delivery_preserves_notify_order() {
        let subject = InterestSubject::new();
        let recorder = Arc::new(RecordingObserver::new("recorder"));
        subject.register(recorder.clone());

        for i in 0..1_000 {
            let interest = Interest::new("web", format!("10.0.{}.{}", i / 256, i % 256));
            match i % 3 {
                0 => subject.interest_created(interest),
                1 => subject.interest_updated(interest),
                _ => subject.interest_deleted(interest),
            }
        }

        for _ in 0..100 {
            if recorder.count() == 1_000 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let received = recorder.received();
        assert_eq!(received.len(), 1_000);
        for (i, event) in received.iter().enumerate() {
            assert_eq!(
                event.interest.service_ip,
                format!("10.0.{}.{}", i / 256, i % 256),
                "event {} delivered out of order",
                i
            );
        }
    }

    #[tokio::test]
    async fn test_notify_without_observers_does_nothing() {
        let subject = InterestSubject::new();
        subject.interest_created(Interest::new("web", "10.0.0.1"));
        assert!(subject.is_empty());
    }
}
