//! Note store: the single point of truth for note state.
//!
//! # Responsibility
//! - Own the in-memory `NoteCollection` loaded at startup.
//! - Provide get/list/create/update/delete with race-free check-then-act.
//! - Persist every mutation before acknowledging it.
//!
//! # Invariants
//! - Mutations hold the write lock across lookup, staging and `save`, so two
//!   concurrent mutations are strictly ordered.
//! - Mutations are applied to a staged copy; memory only changes after the
//!   staged copy was saved. A failed save leaves memory untouched.
//! - Reads take the read lock and never see a partially applied mutation.
//!
//! # See also
//! - crates/notekeep_core/src/repo/note_repo.rs

use crate::model::note::{Note, NoteCollection, NoteValidationError};
use crate::repo::note_repo::{NoteRepository, RepoError};
use log::{error, info};
use parking_lot::RwLock;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type NoteStoreResult<T> = Result<T, NoteStoreError>;

/// Store error for note use-cases.
#[derive(Debug)]
pub enum NoteStoreError {
    /// No note with this name exists.
    NotFound(String),
    /// A note with this name already exists.
    AlreadyExists(String),
    /// Input would break a note invariant.
    Validation(NoteValidationError),
    /// Persisted state is unreadable; operators must intervene.
    CorruptStore(RepoError),
    /// Filesystem failure while loading or saving.
    StorageIo(RepoError),
}

impl NoteStoreError {
    /// Stable short code for logs and API bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::AlreadyExists(_) => "already_exists",
            Self::Validation(_) => "invalid_note",
            Self::CorruptStore(_) => "corrupt_store",
            Self::StorageIo(_) => "storage_io",
        }
    }
}

impl Display for NoteStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "note not found: `{name}`"),
            Self::AlreadyExists(name) => write!(f, "note already exists: `{name}`"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::CorruptStore(err) => write!(f, "{err}"),
            Self::StorageIo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::CorruptStore(err) | Self::StorageIo(err) => Some(err),
            Self::NotFound(_) | Self::AlreadyExists(_) => None,
        }
    }
}

impl From<RepoError> for NoteStoreError {
    fn from(value: RepoError) -> Self {
        if value.is_corrupt() {
            Self::CorruptStore(value)
        } else {
            Self::StorageIo(value)
        }
    }
}

impl From<NoteValidationError> for NoteStoreError {
    fn from(value: NoteValidationError) -> Self {
        match value {
            NoteValidationError::DuplicateName(name) => Self::AlreadyExists(name),
            other => Self::Validation(other),
        }
    }
}

/// Thread-safe note store over a whole-collection repository.
///
/// Construct one per backing file and share it (e.g. behind `Arc`).
pub struct NoteStore<R: NoteRepository> {
    repo: R,
    notes: RwLock<NoteCollection>,
}

impl<R: NoteRepository> NoteStore<R> {
    /// Loads the persisted collection and returns a ready store.
    ///
    /// # Errors
    /// - `CorruptStore` when persisted content cannot be trusted.
    /// - `StorageIo` when the backing storage cannot be read or created.
    pub fn open(repo: R) -> NoteStoreResult<Self> {
        let notes = repo.load()?;
        info!(
            "event=store_open module=store status=ok count={}",
            notes.len()
        );
        Ok(Self {
            repo,
            notes: RwLock::new(notes),
        })
    }

    /// Returns a snapshot of all notes in insertion order.
    pub fn get_all(&self) -> Vec<Note> {
        self.notes.read().notes().to_vec()
    }

    /// Gets one note by exact name.
    pub fn get_by_name(&self, name: &str) -> NoteStoreResult<Note> {
        self.notes
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| NoteStoreError::NotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.notes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.read().is_empty()
    }

    /// Creates a note; fails if the name is taken.
    ///
    /// The existence check and the append run under one write lock, so of
    /// several concurrent creates for one name exactly one succeeds.
    pub fn create(
        &self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> NoteStoreResult<Note> {
        let note = Note::new(name, text);
        note.validate()?;

        let mut guard = self.notes.write();
        if guard.contains(&note.name) {
            info!(
                "event=note_create module=store status=rejected error_code=already_exists name={:?}",
                note.name
            );
            return Err(NoteStoreError::AlreadyExists(note.name));
        }

        let mut staged = guard.clone();
        staged.insert(note.clone())?;
        self.commit(&mut guard, staged, "note_create", &note.name)?;
        Ok(note)
    }

    /// Replaces the text of an existing note.
    pub fn update(&self, name: &str, text: impl Into<String>) -> NoteStoreResult<Note> {
        let mut guard = self.notes.write();
        if !guard.contains(name) {
            return Err(NoteStoreError::NotFound(name.to_string()));
        }

        let mut staged = guard.clone();
        let updated = staged
            .set_text(name, text)
            .cloned()
            .ok_or_else(|| NoteStoreError::NotFound(name.to_string()))?;
        self.commit(&mut guard, staged, "note_update", name)?;
        Ok(updated)
    }

    /// Removes a note and returns it.
    pub fn delete(&self, name: &str) -> NoteStoreResult<Note> {
        let mut guard = self.notes.write();
        if !guard.contains(name) {
            return Err(NoteStoreError::NotFound(name.to_string()));
        }

        let mut staged = guard.clone();
        let removed = staged
            .remove(name)
            .ok_or_else(|| NoteStoreError::NotFound(name.to_string()))?;
        self.commit(&mut guard, staged, "note_delete", name)?;
        Ok(removed)
    }

    /// Persists `staged`, then swaps it in. Caller must hold the write lock.
    fn commit(
        &self,
        current: &mut NoteCollection,
        staged: NoteCollection,
        event: &'static str,
        name: &str,
    ) -> NoteStoreResult<()> {
        if let Err(err) = self.repo.save(&staged) {
            error!(
                "event={} module=store status=error error_code=save_failed name={:?} error={}",
                event, name, err
            );
            return Err(err.into());
        }

        *current = staged;
        info!(
            "event={} module=store status=ok name={:?} count={}",
            event,
            name,
            current.len()
        );
        Ok(())
    }
}
