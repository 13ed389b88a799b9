//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Own the canonical note collection: insert, commit, delete, query.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Note::validate()` before SQL mutations.
//! - `query_all` is ordered by `modified_at DESC, id ASC`.
//! - `delete` is idempotent; deleting a missing note is not an error.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::DbError;
use crate::model::note::{Note, NoteId, NoteValidationError};
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    created_at,
    modified_at
FROM notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

/// Coarse failure classes surfaced to callers that decide on recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// Storage cannot be reached or read (open/schema/read failures).
    StorageUnavailable,
    /// A mutation was rejected by storage.
    WriteFailed,
    NotFound,
    CorruptRecord,
    InvalidNote,
}

impl RepoError {
    /// Classifies this error. `for_write` marks errors raised by a mutation.
    pub fn kind(&self, for_write: bool) -> StorageErrorKind {
        match self {
            Self::Validation(_) => StorageErrorKind::InvalidNote,
            Self::NotFound(_) => StorageErrorKind::NotFound,
            Self::InvalidData(_) => StorageErrorKind::CorruptRecord,
            Self::MissingRequiredTable(_) | Self::MissingRequiredColumn { .. } => {
                StorageErrorKind::StorageUnavailable
            }
            Self::Db(DbError::Sqlite(_)) if for_write => StorageErrorKind::WriteFailed,
            Self::Db(_) => StorageErrorKind::StorageUnavailable,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for the note collection.
pub trait NoteRepository {
    /// Adds a new note. The next read reflects it.
    fn insert(&self, note: &Note) -> RepoResult<()>;
    /// Persists title, content and modification date of an existing note.
    fn commit(&self, note: &Note) -> RepoResult<()>;
    /// Removes a note by id. Returns whether a row was removed.
    fn delete(&self, id: NoteId) -> RepoResult<bool>;
    /// Gets one note by id.
    fn get(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Returns every note, most recently modified first.
    fn query_all(&self) -> RepoResult<Vec<Note>>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Fails fast when the schema does not carry the `notes` table shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_note_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert(&self, note: &Note) -> RepoResult<()> {
        note.validate()?;

        self.conn.execute(
            "INSERT INTO notes (
                id,
                title,
                content,
                created_at,
                modified_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                note.id.to_string(),
                note.title.as_str(),
                note.content.as_str(),
                note.creation_date.timestamp_millis(),
                note.modification_date.timestamp_millis(),
            ],
        )?;

        debug!("event=note_insert module=repo status=ok note_id={}", note.id);
        Ok(())
    }

    fn commit(&self, note: &Note) -> RepoResult<()> {
        note.validate()?;

        // created_at is never rewritten; the CHECK constraint guards ordering.
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?2,
                content = ?3,
                modified_at = ?4
             WHERE id = ?1;",
            params![
                note.id.to_string(),
                note.title.as_str(),
                note.content.as_str(),
                note.modification_date.timestamp_millis(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(note.id));
        }

        debug!("event=note_commit module=repo status=ok note_id={}", note.id);
        Ok(())
    }

    fn delete(&self, id: NoteId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id.to_string()])?;
        let status = if changed == 0 { "noop" } else { "ok" };
        debug!("event=note_delete module=repo status={status} note_id={id}");
        Ok(changed > 0)
    }

    fn get(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn query_all(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} ORDER BY modified_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in notes.id"))
    })?;
    let note = Note {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        creation_date: millis_to_datetime(row.get("created_at")?, "created_at")?,
        modification_date: millis_to_datetime(row.get("modified_at")?, "modified_at")?,
    };
    note.validate()
        .map_err(|err| RepoError::InvalidData(format!("note {id}: {err}")))?;
    Ok(note)
}

fn millis_to_datetime(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!("timestamp {value} out of range in notes.{column}"))
    })
}

fn ensure_note_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    for column in ["id", "title", "content", "created_at", "modified_at"] {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{RepoError, StorageErrorKind};
    use crate::db::DbError;
    use uuid::Uuid;

    #[test]
    fn sqlite_failures_classify_by_direction() {
        let read = RepoError::Db(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows));
        assert_eq!(read.kind(false), StorageErrorKind::StorageUnavailable);
        assert_eq!(read.kind(true), StorageErrorKind::WriteFailed);
    }

    #[test]
    fn semantic_errors_keep_their_kind() {
        assert_eq!(
            RepoError::NotFound(Uuid::nil()).kind(true),
            StorageErrorKind::NotFound
        );
        assert_eq!(
            RepoError::InvalidData("bad".to_string()).kind(false),
            StorageErrorKind::CorruptRecord
        );
        assert_eq!(
            RepoError::MissingRequiredTable("notes").kind(true),
            StorageErrorKind::StorageUnavailable
        );
    }
}
