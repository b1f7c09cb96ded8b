//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the whole-collection load/save contract used by the store.
//! - Isolate file format and atomic-write details from the store.
//!
//! # Invariants
//! - Repository reads reject corrupt persisted state instead of masking it.
//! - Repository writes replace the persisted collection all-or-nothing.

pub mod note_repo;
