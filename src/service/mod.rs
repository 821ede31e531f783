//! The entity-owning side: storage of interests and the service that turns
//! every successful mutation into a lifecycle notification.

pub mod error;
pub mod interest_service;
pub mod repository;

pub use error::*;
pub use interest_service::InterestService;
pub use repository::{InMemoryInterestRepository, InterestRepository};
