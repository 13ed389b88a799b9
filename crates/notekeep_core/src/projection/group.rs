//! Calendar bucketing of notes by modification date.
//!
//! # Invariants
//! - Every input note lands in exactly one bucket; first matching rule wins.
//! - Notes keep their input order within a bucket.
//! - Empty buckets are never emitted.
//! - Calendar days are evaluated in the timezone of the injected `now`.

use crate::model::note::Note;
use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Time-relative group a note is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Today,
    Yesterday,
    PastWeek,
    Earlier,
}

impl Bucket {
    /// All buckets, most recent first.
    pub const ALL: [Bucket; 4] = [
        Bucket::Today,
        Bucket::Yesterday,
        Bucket::PastWeek,
        Bucket::Earlier,
    ];

    /// Section header text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::PastWeek => "Past Week",
            Self::Earlier => "Earlier",
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::Today => 0,
            Self::Yesterday => 1,
            Self::PastWeek => 2,
            Self::Earlier => 3,
        }
    }
}

/// Order in which non-empty sections are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionOrder {
    /// Ascending by label text: `Earlier, Past Week, Today, Yesterday`.
    #[default]
    Label,
    /// `Today, Yesterday, Past Week, Earlier`.
    Recency,
}

impl SectionOrder {
    /// Buckets in emission order.
    pub fn buckets(self) -> [Bucket; 4] {
        let mut order = Bucket::ALL;
        if self == Self::Label {
            order.sort_by_key(|bucket| bucket.label());
        }
        order
    }
}

/// One non-empty bucket with borrowed notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSection<'a> {
    pub bucket: Bucket,
    pub notes: Vec<&'a Note>,
}

impl NoteSection<'_> {
    pub fn label(&self) -> &'static str {
        self.bucket.label()
    }

    /// Clones the notes so the section can outlive the source collection.
    pub fn to_owned_section(&self) -> OwnedNoteSection {
        OwnedNoteSection {
            bucket: self.bucket,
            label: self.bucket.label(),
            notes: self.notes.iter().map(|note| (*note).clone()).collect(),
        }
    }
}

/// Owning counterpart of [`NoteSection`] handed to frontends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnedNoteSection {
    pub bucket: Bucket,
    pub label: &'static str,
    pub notes: Vec<Note>,
}

/// Classifies `modified` relative to `now`, in `now`'s timezone.
pub fn bucket_for<Tz: TimeZone>(
    modified: &DateTime<Utc>,
    now: &DateTime<Tz>,
    week_start: Weekday,
) -> Bucket {
    let today = now.date_naive();
    let day = modified.with_timezone(&now.timezone()).date_naive();

    if day == today {
        Bucket::Today
    } else if today.pred_opt() == Some(day) {
        Bucket::Yesterday
    } else if start_of_week(day, week_start) == start_of_week(today, week_start) {
        Bucket::PastWeek
    } else {
        Bucket::Earlier
    }
}

/// Partitions `notes` into sections emitted in `order`.
pub fn group_notes<'a, I, Tz>(
    notes: I,
    now: &DateTime<Tz>,
    week_start: Weekday,
    order: SectionOrder,
) -> Vec<NoteSection<'a>>
where
    I: IntoIterator<Item = &'a Note>,
    Tz: TimeZone,
{
    let mut slots: [Vec<&'a Note>; 4] = Default::default();
    for note in notes {
        let bucket = bucket_for(&note.modification_date, now, week_start);
        slots[bucket.slot()].push(note);
    }

    order
        .buckets()
        .into_iter()
        .filter_map(|bucket| {
            let notes = std::mem::take(&mut slots[bucket.slot()]);
            (!notes.is_empty()).then_some(NoteSection { bucket, notes })
        })
        .collect()
}

fn start_of_week(day: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (7 + day.weekday().num_days_from_monday() - week_start.num_days_from_monday()) % 7;
    day.checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(day)
}
