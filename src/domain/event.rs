use crate::domain::Interest;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The lifecycle transition an [`InterestEvent`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "INTEREST_CREATED")]
    Created,
    #[serde(rename = "INTEREST_UPDATED")]
    Updated,
    #[serde(rename = "INTEREST_DELETED")]
    Deleted,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "INTEREST_CREATED",
            EventKind::Updated => "INTEREST_UPDATED",
            EventKind::Deleted => "INTEREST_DELETED",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle notification: what happened, and to which interest.
///
/// The interest is a shared, immutable snapshot. Cloning an event is cheap
/// and every observer sees the same data the producer saw when it called
/// [`notify`](crate::observer::Subject::notify).
#[derive(Debug, Clone, PartialEq)]
pub struct InterestEvent {
    pub kind: EventKind,
    pub interest: Arc<Interest>,
}

impl InterestEvent {
    pub fn new(kind: EventKind, interest: impl Into<Arc<Interest>>) -> Self {
        Self {
            kind,
            interest: interest.into(),
        }
    }

    pub fn created(interest: impl Into<Arc<Interest>>) -> Self {
        Self::new(EventKind::Created, interest)
    }

    pub fn updated(interest: impl Into<Arc<Interest>>) -> Self {
        Self::new(EventKind::Updated, interest)
    }

    pub fn deleted(interest: impl Into<Arc<Interest>>) -> Self {
        Self::new(EventKind::Deleted, interest)
    }

    /// The scheduling key of the interest this event is about.
    pub fn key(&self) -> &str {
        &self.interest.app_name
    }
}
