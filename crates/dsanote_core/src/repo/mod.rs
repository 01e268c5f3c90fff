//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the persistence contract the organizer and services depend on.
//! - Isolate SQLite query details from ordering logic.
//!
//! # Invariants
//! - Writes validate model records before any SQL mutation.
//! - Missing records surface as semantic errors, not transport errors.

pub mod order_repo;
