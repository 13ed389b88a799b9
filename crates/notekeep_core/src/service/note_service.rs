//! Note use-case service.
//!
//! # Responsibility
//! - Provide create/edit/delete/get/list entry points for frontends.
//! - Stamp timestamps from an injected clock.
//! - Snapshot storage and run the list projection for display.
//!
//! # Invariants
//! - All mutations go through `NoteRepository::commit`/`insert`/`delete`.
//! - `modification_date` only moves when title or content actually changed.
//! - Storage failures surface as `StorageUnavailable` (reads) or
//!   `WriteFailed` (mutations).

use crate::model::note::{Note, NoteId};
use crate::projection::{NoteListProjection, NoteSection, OwnedNoteSection};
use crate::repo::note_repo::{NoteRepository, RepoError, StorageErrorKind};
use crate::service::clock::{Clock, SystemClock};
use chrono::{Local, TimeZone};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, NoteServiceError>;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// No note id starts with the given text.
    UnknownId(String),
    /// More than one note id starts with the given text.
    AmbiguousId { prefix: String, matches: usize },
    /// Storage could not be opened or read.
    StorageUnavailable(RepoError),
    /// Storage rejected a mutation.
    WriteFailed(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl NoteServiceError {
    fn from_read(err: RepoError) -> Self {
        Self::classify(err, false)
    }

    fn from_write(err: RepoError) -> Self {
        Self::classify(err, true)
    }

    fn classify(err: RepoError, for_write: bool) -> Self {
        match (err.kind(for_write), err) {
            (_, RepoError::NotFound(id)) => Self::NoteNotFound(id),
            (StorageErrorKind::WriteFailed | StorageErrorKind::InvalidNote, err) => {
                Self::WriteFailed(err)
            }
            (_, err) => Self::StorageUnavailable(err),
        }
    }
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::UnknownId(prefix) => write!(f, "no note id starts with `{prefix}`"),
            Self::AmbiguousId { prefix, matches } => {
                write!(f, "note id prefix `{prefix}` matches {matches} notes")
            }
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
            Self::WriteFailed(err) => write!(f, "write failed: {err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable(err) | Self::WriteFailed(err) => Some(err),
            _ => None,
        }
    }
}

/// Field replacements for one edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteEdit {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// Note service facade over a repository and a clock.
pub struct NoteService<R: NoteRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: NoteRepository> NoteService<R, SystemClock> {
    /// Creates a service stamping notes with the wall clock.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: NoteRepository, C: Clock> NoteService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Creates an empty note stamped with the current time.
    pub fn create_note(&self) -> ServiceResult<Note> {
        let note = Note::new(self.clock.now());
        self.repo.insert(&note).map_err(NoteServiceError::from_write)?;
        info!("event=note_create module=service status=ok note_id={}", note.id);
        self.read_back(note.id, "created note not found in read-back")
    }

    /// Applies `edit` and commits when title or content changed.
    ///
    /// Unchanged edits return the stored note without touching storage.
    pub fn edit_note(&self, id: NoteId, edit: NoteEdit) -> ServiceResult<Note> {
        let mut note = self
            .repo
            .get(id)
            .map_err(NoteServiceError::from_read)?
            .ok_or(NoteServiceError::NoteNotFound(id))?;

        let mut changed = false;
        if let Some(title) = edit.title {
            changed |= note.title != title;
            note.title = title;
        }
        if let Some(content) = edit.content {
            changed |= note.content != content;
            note.content = content;
        }
        if !changed {
            return Ok(note);
        }

        note.touch(self.clock.now());
        self.repo.commit(&note).map_err(NoteServiceError::from_write)?;
        info!(
            "event=note_commit module=service status=ok note_id={} title_chars={} content_chars={}",
            id,
            note.title.chars().count(),
            note.content.chars().count()
        );
        self.read_back(id, "edited note not found in read-back")
    }

    /// Deletes a note. Returns whether anything was removed.
    pub fn delete_note(&self, id: NoteId) -> ServiceResult<bool> {
        let removed = self.repo.delete(id).map_err(NoteServiceError::from_write)?;
        info!("event=note_delete module=service status=ok note_id={id} removed={removed}");
        Ok(removed)
    }

    pub fn get_note(&self, id: NoteId) -> ServiceResult<Option<Note>> {
        self.repo.get(id).map_err(NoteServiceError::from_read)
    }

    /// All notes, most recently modified first.
    pub fn list_notes(&self) -> ServiceResult<Vec<Note>> {
        self.repo.query_all().map_err(NoteServiceError::from_read)
    }

    /// Resolves a full id or a unique id prefix (hyphens ignored).
    pub fn resolve_id(&self, input: &str) -> ServiceResult<NoteId> {
        let trimmed = input.trim();
        if let Ok(id) = Uuid::parse_str(trimmed) {
            return match self.get_note(id)? {
                Some(_) => Ok(id),
                None => Err(NoteServiceError::NoteNotFound(id)),
            };
        }

        let prefix = trimmed.replace('-', "").to_ascii_lowercase();
        if prefix.is_empty() {
            return Err(NoteServiceError::UnknownId(input.to_string()));
        }

        let matches: Vec<NoteId> = self
            .list_notes()?
            .into_iter()
            .map(|note| note.id)
            .filter(|id| id.simple().to_string().starts_with(&prefix))
            .collect();
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(NoteServiceError::UnknownId(trimmed.to_string())),
            _ => Err(NoteServiceError::AmbiguousId {
                prefix: trimmed.to_string(),
                matches: matches.len(),
            }),
        }
    }

    /// Snapshots storage and projects it for display in the host timezone.
    pub fn sections(
        &self,
        query: &str,
        projection: &NoteListProjection,
    ) -> ServiceResult<Vec<OwnedNoteSection>> {
        let snapshot = self.list_notes()?;
        let now = self.clock.now().with_timezone(&Local);
        let filtered = projection.filter(&snapshot, query);
        let sections = projection.group_local(filtered, &now);
        Ok(finish_sections(snapshot.len(), query, &sections))
    }

    /// Snapshots storage and projects it with calendar days taken in `tz`.
    pub fn sections_in<Tz: TimeZone>(
        &self,
        query: &str,
        projection: &NoteListProjection,
        tz: &Tz,
    ) -> ServiceResult<Vec<OwnedNoteSection>> {
        let snapshot = self.list_notes()?;
        let now = self.clock.now().with_timezone(tz);
        let sections = projection.project(&snapshot, query, &now);
        Ok(finish_sections(snapshot.len(), query, &sections))
    }

    fn read_back(&self, id: NoteId, details: &'static str) -> ServiceResult<Note> {
        self.get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(details))
    }
}

fn finish_sections(
    total: usize,
    query: &str,
    sections: &[NoteSection<'_>],
) -> Vec<OwnedNoteSection> {
    info!(
        "event=notes_project module=service status=ok total={} sections={} query_chars={}",
        total,
        sections.len(),
        query.chars().count()
    );
    sections
        .iter()
        .map(|section| section.to_owned_section())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{NoteEdit, NoteServiceError};
    use crate::db::DbError;
    use crate::repo::note_repo::RepoError;

    #[test]
    fn note_edit_is_empty_only_without_fields() {
        assert!(NoteEdit::default().is_empty());
        assert!(!NoteEdit {
            title: Some(String::new()),
            content: None,
        }
        .is_empty());
    }

    #[test]
    fn repo_errors_map_to_read_and_write_kinds() {
        let sqlite = || RepoError::Db(DbError::Sqlite(rusqlite::Error::InvalidQuery));
        assert!(matches!(
            NoteServiceError::from_read(sqlite()),
            NoteServiceError::StorageUnavailable(_)
        ));
        assert!(matches!(
            NoteServiceError::from_write(sqlite()),
            NoteServiceError::WriteFailed(_)
        ));
        assert!(matches!(
            NoteServiceError::from_write(RepoError::NotFound(uuid::Uuid::nil())),
            NoteServiceError::NoteNotFound(_)
        ));
    }
}
