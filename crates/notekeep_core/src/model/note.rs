//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record shared by storage, projection and UI.
//! - Provide display helpers used by list rows and detail views.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `modification_date` is never earlier than `creation_date`.
//! - `creation_date` is set once and never changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a note.
pub type NoteId = Uuid;

/// Title shown for notes whose title is still empty.
pub const UNTITLED_NOTE_TITLE: &str = "New Note";

/// Number of content lines shown under the title in list rows.
pub const LIST_PREVIEW_LINES: usize = 2;

/// Canonical note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub creation_date: DateTime<Utc>,
    /// Bumped on every committed title/content change.
    pub modification_date: DateTime<Utc>,
}

/// Invariant violation detected before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    ModifiedBeforeCreated {
        creation_date: DateTime<Utc>,
        modification_date: DateTime<Utc>,
    },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ModifiedBeforeCreated {
                creation_date,
                modification_date,
            } => write!(
                f,
                "modification_date {} is earlier than creation_date {}",
                modification_date.to_rfc3339(),
                creation_date.to_rfc3339()
            ),
        }
    }
}

impl Error for NoteValidationError {}

impl Note {
    /// Creates an empty note with a generated id, stamped at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4(), now)
    }

    /// Creates an empty note with a caller-provided id.
    pub fn with_id(id: NoteId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: String::new(),
            content: String::new(),
            creation_date: now,
            modification_date: now,
        }
    }

    /// Builder-style helper for seeding title and content.
    pub fn with_text(mut self, title: impl Into<String>, content: impl Into<String>) -> Self {
        self.title = title.into();
        self.content = content.into();
        self
    }

    /// Checks record invariants.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.modification_date < self.creation_date {
            return Err(NoteValidationError::ModifiedBeforeCreated {
                creation_date: self.creation_date,
                modification_date: self.modification_date,
            });
        }
        Ok(())
    }

    /// Sets `modification_date` to `now`, clamped so it never precedes creation.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.modification_date = now.max(self.creation_date);
    }

    /// Title used in list rows and headers.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED_NOTE_TITLE
        } else {
            &self.title
        }
    }

    /// First `max_lines` lines of content, or `None` for empty content.
    pub fn preview(&self, max_lines: usize) -> Option<String> {
        if self.content.is_empty() || max_lines == 0 {
            return None;
        }
        let lines: Vec<&str> = self.content.lines().take(max_lines).collect();
        Some(lines.join("\n"))
    }

    /// First eight characters of the id, enough to address a note by hand.
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}
