//! Pure data structures: the [`Interest`] entity and its lifecycle [`InterestEvent`]s.

pub mod event;
pub mod interest;

pub use event::*;
pub use interest::*;
