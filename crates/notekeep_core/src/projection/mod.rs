//! Read-only note list projection: search filtering and date sectioning.
//!
//! # Responsibility
//! - Turn the stored note collection plus a search string into ordered,
//!   labeled sections ready for display.
//!
//! # Invariants
//! - Pure: no clock reads, no storage access, no mutation of inputs.
//! - Input is expected pre-sorted by `modification_date` descending; every
//!   step preserves relative order.
//! - Total over its input domain; empty input yields empty output.

pub mod filter;
pub mod group;

use crate::model::note::Note;
use chrono::{DateTime, Local, TimeZone, Weekday};

pub use filter::{filter_notes, fold_case, SearchQuery};
pub use group::{bucket_for, group_notes, Bucket, NoteSection, OwnedNoteSection, SectionOrder};

/// Calendar and ordering knobs for sectioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// First day of the calendar week used by the `Past Week` rule.
    pub week_start: Weekday,
    pub section_order: SectionOrder,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            week_start: Weekday::Mon,
            section_order: SectionOrder::Label,
        }
    }
}

/// Filter + group pipeline over borrowed notes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteListProjection {
    options: ProjectionOptions,
}

impl NoteListProjection {
    pub fn new(options: ProjectionOptions) -> Self {
        Self { options }
    }

    /// Keeps notes whose title or content contains `query`, case-insensitively.
    ///
    /// An empty `query` returns every note in input order.
    pub fn filter<'a, I>(&self, notes: I, query: &str) -> Vec<&'a Note>
    where
        I: IntoIterator<Item = &'a Note>,
    {
        filter_notes(notes, query)
    }

    /// Buckets notes into `Today`/`Yesterday`/`Past Week`/`Earlier` relative
    /// to `now`, using `now`'s timezone for calendar days.
    pub fn group<'a, I, Tz>(&self, notes: I, now: &DateTime<Tz>) -> Vec<NoteSection<'a>>
    where
        I: IntoIterator<Item = &'a Note>,
        Tz: TimeZone,
    {
        group_notes(
            notes,
            now,
            self.options.week_start,
            self.options.section_order,
        )
    }

    /// [`Self::group`] in the host timezone.
    pub fn group_local<'a, I>(&self, notes: I, now: &DateTime<Local>) -> Vec<NoteSection<'a>>
    where
        I: IntoIterator<Item = &'a Note>,
    {
        self.group(notes, now)
    }

    /// Filters then groups.
    pub fn project<'a, I, Tz>(
        &self,
        notes: I,
        query: &str,
        now: &DateTime<Tz>,
    ) -> Vec<NoteSection<'a>>
    where
        I: IntoIterator<Item = &'a Note>,
        Tz: TimeZone,
    {
        let filtered = self.filter(notes, query);
        self.group(filtered, now)
    }
}
