//! # System Lifecycle & Orchestration
//!
//! This module manages the runtime lifecycle of the routing manager: wiring
//! the components together, recovering scheduler state after a restart, and
//! shutting everything down deterministically.
//!
//! ## The RoutingSystem Pattern
//!
//! The [`RoutingSystem`] is the only place components are constructed. Nothing
//! is global; the subject, the scheduler and the interest service are passed
//! to each other explicitly:
//!
//! ```rust,ignore
//! let subject = Arc::new(InterestSubject::new());
//! let service = Arc::new(InterestService::new(repo, Some(subject.clone())));
//! let scheduler = Arc::new(TaskSchedulerObserver::new(executor, interval));
//! subject.register(scheduler.clone());
//! ```
//!
//! ## Recovery
//!
//! The scheduler keeps no durable record of its jobs. After a crash the job map
//! is rebuilt from the persisted interests by [`RoutingSystem::restart`], which
//! replays each one as a `Created` event. It runs once per system; later calls
//! are no-ops.
//!
//! ## Graceful Shutdown
//!
//! [`RoutingSystem::shutdown`]:
//!
//! 1. **Closes the scheduler** - later events can no longer start jobs
//! 2. **Cancels every job** - under the scheduler's lock, in one pass
//! 3. **Awaits acknowledgement** - each job loop has exited before it returns
//!
//! ## Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging. See the [`tracing`]
//! module for the fields and formats.

pub mod error;
pub mod routing_system;
pub mod tracing;

pub use self::error::*;
pub use self::routing_system::*;
pub use self::tracing::*;
