//! Unit of Work: staging and coordinated flush of domain objects.
//!
//! # Responsibility
//! - Stage objects as new, dirty or deleted between request boundaries.
//! - Flush staged objects through the mapper registry on `commit`.
//!
//! # Invariants
//! - An object is held by at most one staging set at any time.
//! - `commit` is a best-effort flush, not a database transaction: every
//!   mapper write is already durable, and one failure never skips the rest.
//! - After a commit attempt the three staging sets are empty.

mod entity_state;
mod staging;
mod unit_of_work;

pub use entity_state::EntityState;
pub use staging::{StagedAs, StagedObject, StagingSet};
pub use unit_of_work::{
    CommitError, CommitFailure, CommitSummary, UnitOfWork, UowContext, UowError, UowResult,
};
