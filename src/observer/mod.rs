//! Publish/subscribe plumbing for interest lifecycle events.
//!
//! # Main Components
//!
//! - [`Observer`] - Capability implemented by anything that wants lifecycle events
//! - [`BaseObserver`] - Identity + logging scaffolding that concrete observers compose with
//! - [`Subject`] / [`InterestSubject`] - The registry and fan-out notifier
//!
//! # Delivery Model
//!
//! [`Subject::notify`] never waits. The observer set is copied under a read
//! lock, the lock is released, and every observer gets its own detached tokio
//! task. Callers must not assume an observer has seen the event when `notify`
//! returns.

pub mod base;
pub mod subject;
pub mod traits;

pub use base::BaseObserver;
pub use subject::InterestSubject;
pub use traits::{Observer, Subject};
