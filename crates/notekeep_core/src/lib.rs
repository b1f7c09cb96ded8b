//! Core domain logic for notekeep.
//! This crate is the single source of truth for note invariants.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::note::{Note, NoteCollection, NoteValidationError};
pub use repo::note_repo::{
    InMemoryNoteRepository, JsonFileNoteRepository, NoteRepository, RepoError, RepoResult,
};
pub use service::note_store::{NoteStore, NoteStoreError, NoteStoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
