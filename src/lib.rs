//! # Routing Manager
//!
//! > **Interest lifecycle notifications and per-key periodic scheduling.**
//!
//! An *interest* binds an application name to a service IP. For every live
//! interest the routing manager must run a routing health task at a fixed
//! cadence, starting, replacing and stopping those timers as interests are
//! created, updated and deleted.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### 1. Publish/Subscribe
//! The component that owns interests never talks to the scheduler directly.
//! It publishes an [`InterestEvent`](domain::InterestEvent) to a
//! [`Subject`](observer::Subject), which fans it out to every registered
//! [`Observer`](observer::Observer) through that observer's own mailbox, in the
//! order events were published. Publishing never blocks the caller.
//!
//! ### 2. One Job per Key
//! The [`TaskSchedulerObserver`](scheduler::TaskSchedulerObserver) owns a map
//! from app name to [`ScheduledJob`](scheduler::ScheduledJob). Only the
//! scheduler inserts into, removes from, or cancels jobs in that map, and it
//! never holds the map's lock across anything that can wait.
//!
//! ### 3. Acknowledged Cancellation
//! Stopping a job sends a one-shot signal and then awaits the job's task. When
//! `stop_job` or `shutdown` returns, the loop has exited and no further task
//! call will be made for it.
//!
//! ### 4. Explicit Wiring
//! No globals. [`RoutingSystem`](lifecycle::RoutingSystem) builds every
//! component and hands them to each other, so tests get fresh instances.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Model ([`domain`])
//! - **Key items**: [`Interest`](domain::Interest), [`InterestEvent`](domain::InterestEvent), [`EventKind`](domain::EventKind).
//!
//! ### 2. The Notifier ([`observer`])
//! - **Role**: Registry of observers and best-effort fan-out.
//! - **Key items**: [`InterestSubject`](observer::InterestSubject), [`BaseObserver`](observer::BaseObserver).
//!
//! ### 3. The Engine ([`scheduler`])
//! - **Role**: Turns lifecycle events into started, replaced and stopped timers.
//! - **Key items**: [`TaskSchedulerObserver`](scheduler::TaskSchedulerObserver), [`TaskExecutor`](scheduler::TaskExecutor), [`HttpTaskExecutor`](scheduler::HttpTaskExecutor).
//!
//! ### 4. The Owner ([`service`])
//! - **Role**: Stores interests and announces every successful mutation.
//! - **Key items**: [`InterestService`](service::InterestService), [`InterestRepository`](service::InterestRepository).
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! - **Role**: Wiring, restart resync, graceful shutdown, tracing setup.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run with info logs
//! RUST_LOG=info cargo run
//!
//! # Tick every 5 seconds against a local monitoring manager
//! ROUTING__SCHEDULER__INTERVAL_MS=5000 ROUTING__MONITORING_MANAGER__HOST=localhost cargo run
//! ```
//!
//! ## 🧪 Testing
//!
//! See [`mock`] for the recording executor and observer used throughout the tests.

pub mod config;
pub mod domain;
pub mod lifecycle;
pub mod mock;
pub mod observer;
pub mod scheduler;
pub mod service;
