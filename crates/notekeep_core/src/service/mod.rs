//! Core use-case services.
//!
//! # Responsibility
//! - Guard shared note state and orchestrate repository persistence.
//! - Keep HTTP/CLI layers decoupled from storage details.

pub mod note_store;
