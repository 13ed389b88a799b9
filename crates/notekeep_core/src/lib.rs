//! Core domain logic for notekeep.
//! This crate is the single source of truth for note invariants, storage
//! and the list projection shown by frontends.

pub mod db;
pub mod logging;
pub mod model;
pub mod projection;
pub mod repo;
pub mod service;

pub use logging::{init_logging, logging_status, LogLevel, LogSettings, LoggingError};
pub use model::note::{Note, NoteId, NoteValidationError, LIST_PREVIEW_LINES, UNTITLED_NOTE_TITLE};
pub use projection::{
    Bucket, NoteListProjection, NoteSection, OwnedNoteSection, ProjectionOptions, SectionOrder,
};
pub use repo::note_repo::{
    NoteRepository, RepoError, RepoResult, SqliteNoteRepository, StorageErrorKind,
};
pub use service::clock::{Clock, FixedClock, SystemClock};
pub use service::note_service::{NoteEdit, NoteService, NoteServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
