//! Note collection repository contracts and file-backed implementation.
//!
//! # Responsibility
//! - Load the whole note collection from durable storage.
//! - Replace the whole persisted collection atomically on save.
//!
//! # Invariants
//! - `save` never leaves the target file half-written: content goes to a
//!   temp file in the same directory, is synced, then renamed over the target.
//! - `load` never masks malformed content as an empty collection.
//! - A missing file is not an error; it is created holding `[]`.
//!
//! # See also
//! - crates/notekeep_core/src/service/note_store.rs

use crate::model::note::{NoteCollection, NoteValidationError};
use log::{error, info, warn};
use parking_lot::Mutex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for note collection load/save.
#[derive(Debug)]
pub enum RepoError {
    /// Filesystem failure. `op` names the step that failed.
    Io {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },
    /// Persisted content is not a JSON array of note records.
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Persisted content decodes but breaks collection invariants.
    InvalidData {
        path: PathBuf,
        source: NoteValidationError,
    },
    /// Collection could not be encoded.
    Encode(serde_json::Error),
}

impl RepoError {
    /// Whether this error means the persisted state cannot be trusted.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Malformed { .. } | Self::InvalidData { .. })
    }

    fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { op, path, source } => {
                write!(f, "note store {op} failed at `{}`: {source}", path.display())
            }
            Self::Malformed { path, source } => write!(
                f,
                "note store `{}` is not a list of notes: {source}",
                path.display()
            ),
            Self::InvalidData { path, source } => write!(
                f,
                "note store `{}` holds invalid notes: {source}",
                path.display()
            ),
            Self::Encode(err) => write!(f, "failed to encode notes: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
            Self::InvalidData { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

/// Whole-collection persistence contract.
///
/// Implementations must be safe to call from multiple threads; the store
/// serializes calls itself, so no internal locking order is assumed.
pub trait NoteRepository: Send + Sync {
    /// Reads the persisted collection.
    fn load(&self) -> RepoResult<NoteCollection>;
    /// Durably replaces the persisted collection.
    fn save(&self, notes: &NoteCollection) -> RepoResult<()>;
}

/// JSON file repository with atomic replace-on-save.
#[derive(Debug, Clone)]
pub struct JsonFileNoteRepository {
    path: PathBuf,
}

impl JsonFileNoteRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn create_empty(&self) -> RepoResult<NoteCollection> {
        let parent = self.parent_dir();
        fs::create_dir_all(parent).map_err(|err| RepoError::io("create_dir", parent, err))?;

        let empty = NoteCollection::new();
        self.save(&empty)?;
        info!(
            "event=store_load module=repo status=ok created=true path={}",
            self.path.display()
        );
        Ok(empty)
    }

    fn decode(&self, bytes: &[u8]) -> RepoResult<NoteCollection> {
        let notes: NoteCollection =
            serde_json::from_slice(bytes).map_err(|source| RepoError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        notes.validate().map_err(|source| RepoError::InvalidData {
            path: self.path.clone(),
            source,
        })?;
        Ok(notes)
    }
}

impl NoteRepository for JsonFileNoteRepository {
    fn load(&self) -> RepoResult<NoteCollection> {
        let started_at = Instant::now();
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return self.create_empty(),
            Err(err) => {
                error!(
                    "event=store_load module=repo status=error error_code=read_failed path={} error={}",
                    self.path.display(),
                    err
                );
                return Err(RepoError::io("read", &self.path, err));
            }
        };

        match self.decode(&bytes) {
            Ok(notes) => {
                info!(
                    "event=store_load module=repo status=ok created=false path={} count={} duration_ms={}",
                    self.path.display(),
                    notes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(notes)
            }
            Err(err) => {
                error!(
                    "event=store_load module=repo status=error error_code=corrupt_store path={} error={}",
                    self.path.display(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save(&self, notes: &NoteCollection) -> RepoResult<()> {
        let started_at = Instant::now();
        let mut bytes = serde_json::to_vec_pretty(notes).map_err(RepoError::Encode)?;
        bytes.push(b'\n');

        let dir = self.parent_dir();
        let mut temp =
            NamedTempFile::new_in(dir).map_err(|err| RepoError::io("create_temp", dir, err))?;
        temp.write_all(&bytes)
            .map_err(|err| RepoError::io("write", temp.path(), err))?;
        temp.as_file()
            .sync_all()
            .map_err(|err| RepoError::io("sync", temp.path(), err))?;
        temp.persist(&self.path)
            .map_err(|err| RepoError::io("rename", &self.path, err.error))?;

        #[cfg(unix)]
        {
            match fs::File::open(dir) {
                Ok(handle) => {
                    if let Err(err) = handle.sync_all() {
                        warn!(
                            "event=store_save module=repo status=warn error_code=dir_sync_failed dir={} error={}",
                            dir.display(),
                            err
                        );
                    }
                }
                Err(err) => warn!(
                    "event=store_save module=repo status=warn error_code=dir_open_failed dir={} error={}",
                    dir.display(),
                    err
                ),
            }
        }

        info!(
            "event=store_save module=repo status=ok path={} count={} bytes={} duration_ms={}",
            self.path.display(),
            notes.len(),
            bytes.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

/// Volatile repository holding the "persisted" collection in memory.
///
/// Useful for embedding the store without a backing file.
#[derive(Debug, Default)]
pub struct InMemoryNoteRepository {
    saved: Mutex<NoteCollection>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing collection, as if it had been persisted.
    pub fn with_notes(notes: NoteCollection) -> Self {
        Self {
            saved: Mutex::new(notes),
        }
    }

    /// Copy of the last saved collection.
    pub fn snapshot(&self) -> NoteCollection {
        self.saved.lock().clone()
    }
}

impl NoteRepository for InMemoryNoteRepository {
    fn load(&self) -> RepoResult<NoteCollection> {
        Ok(self.snapshot())
    }

    fn save(&self, notes: &NoteCollection) -> RepoResult<()> {
        *self.saved.lock() = notes.clone();
        Ok(())
    }
}
