//! Domain model for notes.
//!
//! # Responsibility
//! - Define canonical data structures used by storage, projection and UI.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard delete owned by storage; there are no tombstones.

pub mod note;
