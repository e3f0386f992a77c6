//! Request-level use cases over the persistence core.
//!
//! # Responsibility
//! - Orchestrate categories, posters and persons for request handlers.
//! - Stage and commit person changes at request boundaries.

pub mod showbill_service;
