//! Note domain model.
//!
//! # Responsibility
//! - Define the `Note` record and the ordered `NoteCollection` around it.
//! - Provide name-keyed lookup/mutation helpers used by the store.
//!
//! # Invariants
//! - `name` is non-empty and unique within one collection.
//! - Collection order is insertion order; updates never move a note.
//! - Serialized form is a plain JSON array of `{ "name", "text" }` records.
//!
//! # See also
//! - crates/notekeep_core/src/service/note_store.rs

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One named text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Primary key. Compared byte-exact, case-sensitive.
    pub name: String,
    /// Note body. May be empty.
    ///
    /// Missing in some legacy files where the body was never submitted.
    #[serde(default)]
    pub text: String,
}

impl Note {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Validates single-record invariants.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is empty.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.name.is_empty() {
            return Err(NoteValidationError::EmptyName);
        }
        Ok(())
    }
}

/// Invariant violation for notes or note collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// A note name is the empty string.
    EmptyName,
    /// Two notes in one collection share a name.
    DuplicateName(String),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "note name must not be empty"),
            Self::DuplicateName(name) => write!(f, "duplicate note name `{name}`"),
        }
    }
}

impl Error for NoteValidationError {}

/// Ordered set of notes keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteCollection {
    notes: Vec<Note>,
}

impl NoteCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from notes in the given order, enforcing invariants.
    pub fn from_notes(notes: Vec<Note>) -> Result<Self, NoteValidationError> {
        let collection = Self { notes };
        collection.validate()?;
        Ok(collection)
    }

    /// Checks every note and name uniqueness.
    ///
    /// Deserialization does not run this; decoded input must be validated
    /// before it is trusted.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        let mut seen = HashSet::with_capacity(self.notes.len());
        for note in &self.notes {
            note.validate()?;
            if !seen.insert(note.name.as_str()) {
                return Err(NoteValidationError::DuplicateName(note.name.clone()));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes in insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.notes.iter()
    }

    pub fn into_notes(self) -> Vec<Note> {
        self.notes
    }

    pub fn get(&self, name: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Appends a note at the end.
    ///
    /// # Errors
    /// - `EmptyName` for an invalid note.
    /// - `DuplicateName` when the name is already present.
    pub fn insert(&mut self, note: Note) -> Result<(), NoteValidationError> {
        note.validate()?;
        if self.contains(&note.name) {
            return Err(NoteValidationError::DuplicateName(note.name));
        }
        self.notes.push(note);
        Ok(())
    }

    /// Replaces the text of an existing note in place.
    ///
    /// Returns the updated note, or `None` when `name` is absent.
    pub fn set_text(&mut self, name: &str, text: impl Into<String>) -> Option<&Note> {
        let index = self.position(name)?;
        let note = &mut self.notes[index];
        note.text = text.into();
        Some(note)
    }

    /// Removes a note, keeping the relative order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<Note> {
        let index = self.position(name)?;
        Some(self.notes.remove(index))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.notes.iter().position(|note| note.name == name)
    }
}

impl<'a> IntoIterator for &'a NoteCollection {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
