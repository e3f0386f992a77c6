//! In-memory domain model for the showbill catalog.
//!
//! # Responsibility
//! - Define the persistable object contract shared by mappers and the unit of work.
//! - Define posters, persons of interest and the category tree.
//!
//! # Invariants
//! - Relationships (poster <-> person, category <-> poster) live only in
//!   memory; no relational column mirrors them.
//! - Back-references are weak; owners are the service-level collections.

pub mod category;
pub mod domain_object;
pub mod person;
pub mod poster;
