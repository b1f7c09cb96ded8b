//! Domain model for named text notes.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - A note is identified by its `name`; names never repeat in a collection.
//! - Deletion removes the record; there are no tombstones.

pub mod note;
